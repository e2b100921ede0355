use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::repo::NutritionGrade;

/// A user's saved substitution pairing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Substitute {
    pub id: Uuid,
    pub origin_id: i64,
    pub replacement_id: i64,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// One row of the saved list, both products joined in.
#[derive(Debug, FromRow)]
pub struct SavedRow {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub origin_id: i64,
    pub origin_name: String,
    pub origin_category: String,
    pub origin_grade: NutritionGrade,
    pub origin_image_url: Option<String>,
    pub replacement_id: i64,
    pub replacement_name: String,
    pub replacement_category: String,
    pub replacement_grade: NutritionGrade,
    pub replacement_image_url: Option<String>,
}

/// Replacement ids the user has already saved for this origin.
pub async fn saved_replacement_ids(
    db: &PgPool,
    origin_id: i64,
    user_id: Uuid,
) -> anyhow::Result<HashSet<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        r#"
        SELECT replacement_id
        FROM substitutes
        WHERE origin_id = $1 AND user_id = $2
        "#,
    )
    .bind(origin_id)
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn insert(
    db: &PgPool,
    origin_id: i64,
    replacement_id: i64,
    user_id: Uuid,
) -> anyhow::Result<Substitute> {
    sqlx::query(
        r#"
        INSERT INTO substitutes (origin_id, replacement_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (origin_id, replacement_id, user_id) DO NOTHING
        "#,
    )
    .bind(origin_id)
    .bind(replacement_id)
    .bind(user_id)
    .execute(db)
    .await?;

    // Fetch instead of RETURNING: a conflicting insert returns no row.
    let substitute = sqlx::query_as::<_, Substitute>(
        r#"
        SELECT id, origin_id, replacement_id, user_id, created_at
        FROM substitutes
        WHERE origin_id = $1 AND replacement_id = $2 AND user_id = $3
        "#,
    )
    .bind(origin_id)
    .bind(replacement_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(substitute)
}

/// Returns whether a row was deleted.
pub async fn delete(
    db: &PgPool,
    origin_id: i64,
    replacement_id: i64,
    user_id: Uuid,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM substitutes
        WHERE origin_id = $1 AND replacement_id = $2 AND user_id = $3
        "#,
    )
    .bind(origin_id)
    .bind(replacement_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn saved_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<SavedRow>> {
    let rows = sqlx::query_as::<_, SavedRow>(
        r#"
        SELECT s.id, s.created_at,
               o.id AS origin_id, o.name AS origin_name,
               oc.name AS origin_category, o.nutrition_grade AS origin_grade,
               o.image_url AS origin_image_url,
               r.id AS replacement_id, r.name AS replacement_name,
               rc.name AS replacement_category, r.nutrition_grade AS replacement_grade,
               r.image_url AS replacement_image_url
        FROM substitutes s
        JOIN products o ON o.id = s.origin_id
        JOIN categories oc ON oc.id = o.category_id
        JOIN products r ON r.id = s.replacement_id
        JOIN categories rc ON rc.id = r.category_id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Nutrition grade, ordered best ('a') to worst ('e'). The Postgres
/// enum declares its variants in the same order, so SQL and Rust
/// comparisons agree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "nutrition_grade", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
}

/// A catalog product, joined with its category name. Nutrient
/// quantities are grams per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: String,
    pub nutrition_grade: NutritionGrade,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub salt: Option<f64>,
    pub sugar: Option<f64>,
    pub image_url: Option<String>,
    pub external_url: Option<String>,
}

impl Product {
    pub async fn by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.nutrition_grade,
                   p.fat, p.saturated_fat, p.salt, p.sugar, p.image_url, p.external_url
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn in_category(db: &PgPool, category_id: i64) -> anyhow::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.nutrition_grade,
                   p.fat, p.saturated_fat, p.salt, p.sugar, p.image_url, p.external_url
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.category_id = $1
            "#,
        )
        .bind(category_id)
        .fetch_all(db)
        .await?;
        Ok(products)
    }

    /// Case-insensitive substring search on the product name, best
    /// grades first.
    pub async fn search_by_name(db: &PgPool, query: &str) -> anyhow::Result<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(query));
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.category_id, c.name AS category_name, p.nutrition_grade,
                   p.fat, p.saturated_fat, p.salt, p.sugar, p.image_url, p.external_url
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.name ILIKE $1
            ORDER BY p.nutrition_grade ASC
            "#,
        )
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(products)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grades_order_best_to_worst() {
        assert!(NutritionGrade::A < NutritionGrade::B);
        assert!(NutritionGrade::A < NutritionGrade::E);
        assert!(NutritionGrade::D <= NutritionGrade::D);
        assert_eq!(
            [NutritionGrade::E, NutritionGrade::A, NutritionGrade::C]
                .iter()
                .min(),
            Some(&NutritionGrade::A)
        );
    }

    #[test]
    fn grades_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&NutritionGrade::A).unwrap(), "\"a\"");
        assert_eq!(
            serde_json::from_str::<NutritionGrade>("\"e\"").unwrap(),
            NutritionGrade::E
        );
    }

    #[test]
    fn like_escaping() {
        assert_eq!(escape_like("nutella"), "nutella");
        assert_eq!(escape_like("100% choc"), "100\\% choc");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}

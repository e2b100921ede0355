use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::catalog::repo::Product;
use crate::error::AppError;

use super::repo;

/// Find every product eligible to replace `origin_id` for the acting
/// user: same category, nutrition grade no worse than the origin's,
/// not the origin itself, and not already saved by the user for this
/// origin. Best grades come first.
pub async fn find_substitutes(
    db: &PgPool,
    origin_id: i64,
    acting_user: Option<Uuid>,
) -> Result<(Product, Vec<Product>), AppError> {
    let origin = Product::by_id(db, origin_id)
        .await?
        .ok_or(AppError::NotFound("product"))?;

    let candidates = Product::in_category(db, origin.category_id).await?;

    let saved = match acting_user {
        Some(user_id) => repo::saved_replacement_ids(db, origin_id, user_id).await?,
        None => HashSet::new(),
    };

    let substitutes = shortlist(&origin, candidates, &saved);
    Ok((origin, substitutes))
}

/// Filter and rank candidates for `origin`. Pure: the caller supplies
/// every product in the origin's category plus the replacement ids the
/// user has already saved for that origin.
pub fn shortlist(origin: &Product, candidates: Vec<Product>, saved: &HashSet<i64>) -> Vec<Product> {
    let mut substitutes: Vec<Product> = candidates
        .into_iter()
        .filter(|p| {
            p.category_id == origin.category_id
                && p.nutrition_grade <= origin.nutrition_grade
                && p.id != origin.id
                && !saved.contains(&p.id)
        })
        .collect();
    substitutes.sort_by_key(|p| p.nutrition_grade);
    substitutes
}

/// Save `replacement_id` as a substitute for `origin_id`. Both must
/// reference existing products. Saving the same pairing twice is a
/// no-op that returns the existing record.
pub async fn save_substitute(
    db: &PgPool,
    origin_id: i64,
    replacement_id: i64,
    acting_user: Uuid,
) -> Result<repo::Substitute, AppError> {
    if Product::by_id(db, origin_id).await?.is_none() {
        return Err(AppError::NotFound("origin product"));
    }
    if Product::by_id(db, replacement_id).await?.is_none() {
        return Err(AppError::NotFound("replacement product"));
    }

    let substitute = repo::insert(db, origin_id, replacement_id, acting_user).await?;
    Ok(substitute)
}

/// Remove a saved substitution. NotFound if the user never saved this
/// pairing.
pub async fn remove_substitute(
    db: &PgPool,
    origin_id: i64,
    replacement_id: i64,
    acting_user: Uuid,
) -> Result<(), AppError> {
    let deleted = repo::delete(db, origin_id, replacement_id, acting_user).await?;
    if !deleted {
        return Err(AppError::NotFound("saved substitution"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repo::NutritionGrade;

    fn product(id: i64, name: &str, category_id: i64, grade: NutritionGrade) -> Product {
        Product {
            id,
            name: name.into(),
            category_id,
            category_name: format!("category-{category_id}"),
            nutrition_grade: grade,
            fat: None,
            saturated_fat: None,
            salt: None,
            sugar: None,
            image_url: None,
            external_url: None,
        }
    }

    fn no_saved() -> HashSet<i64> {
        HashSet::new()
    }

    #[test]
    fn better_graded_same_category_product_is_returned() {
        let nutella = product(1, "nutella", 1, NutritionGrade::E);
        let nocciolata = product(2, "Nocciolata", 1, NutritionGrade::A);

        let subs = shortlist(&nutella, vec![nutella.clone(), nocciolata], &no_saved());
        let names: Vec<&str> = subs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Nocciolata"]);
    }

    #[test]
    fn origin_is_never_its_own_substitute() {
        let nutella = product(1, "nutella", 1, NutritionGrade::E);
        let subs = shortlist(&nutella, vec![nutella.clone()], &no_saved());
        assert!(subs.is_empty());
    }

    #[test]
    fn equal_grade_counts_as_substitute() {
        let origin = product(1, "brand A muesli", 3, NutritionGrade::C);
        let same = product(2, "brand B muesli", 3, NutritionGrade::C);
        let subs = shortlist(&origin, vec![origin.clone(), same], &no_saved());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id, 2);
    }

    #[test]
    fn worse_grades_and_other_categories_are_excluded() {
        let origin = product(1, "origin", 1, NutritionGrade::B);
        let worse = product(2, "worse", 1, NutritionGrade::D);
        let elsewhere = product(3, "elsewhere", 2, NutritionGrade::A);

        let subs = shortlist(&origin, vec![worse, elsewhere], &no_saved());
        assert!(subs.is_empty());
    }

    #[test]
    fn already_saved_replacement_is_excluded() {
        let nutella = product(1, "nutella", 1, NutritionGrade::E);
        let nocciolata = product(2, "Nocciolata", 1, NutritionGrade::A);
        let other = product(3, "other spread", 1, NutritionGrade::B);

        let saved: HashSet<i64> = [2].into_iter().collect();
        let subs = shortlist(&nutella, vec![nocciolata, other], &saved);
        let ids: Vec<i64> = subs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn saving_everything_empties_the_list() {
        let nutella = product(1, "nutella", 1, NutritionGrade::E);
        let nocciolata = product(2, "Nocciolata", 1, NutritionGrade::A);

        let saved: HashSet<i64> = [2].into_iter().collect();
        let subs = shortlist(&nutella, vec![nutella.clone(), nocciolata], &saved);
        assert!(subs.is_empty());
    }

    #[test]
    fn results_are_ordered_best_grade_first() {
        let origin = product(1, "origin", 1, NutritionGrade::E);
        let c = product(2, "c-graded", 1, NutritionGrade::C);
        let a = product(3, "a-graded", 1, NutritionGrade::A);
        let e = product(4, "e-graded", 1, NutritionGrade::E);
        let b = product(5, "b-graded", 1, NutritionGrade::B);

        let subs = shortlist(&origin, vec![c, a, e, b], &no_saved());
        let grades: Vec<NutritionGrade> = subs.iter().map(|p| p.nutrition_grade).collect();
        assert_eq!(
            grades,
            vec![
                NutritionGrade::A,
                NutritionGrade::B,
                NutritionGrade::C,
                NutritionGrade::E
            ]
        );
    }

    #[test]
    fn every_result_upholds_the_substitution_rules() {
        let origin = product(10, "origin", 7, NutritionGrade::C);
        let pool = vec![
            product(11, "good", 7, NutritionGrade::A),
            product(12, "equal", 7, NutritionGrade::C),
            product(13, "worse", 7, NutritionGrade::E),
            product(14, "foreign", 8, NutritionGrade::A),
            product(10, "origin", 7, NutritionGrade::C),
            product(15, "saved", 7, NutritionGrade::B),
        ];
        let saved: HashSet<i64> = [15].into_iter().collect();

        for candidate in shortlist(&origin, pool, &saved) {
            assert_eq!(candidate.category_id, origin.category_id);
            assert!(candidate.nutrition_grade <= origin.nutrition_grade);
            assert_ne!(candidate.id, origin.id);
            assert!(!saved.contains(&candidate.id));
        }
    }
}

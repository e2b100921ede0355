use serde::Serialize;

use super::repo::{NutritionGrade, Product};

/// Quantity indicator for one nutrient, per 100 g.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Moderate,
    High,
}

/// Compact product representation used in result lists.
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub nutrition_grade: NutritionGrade,
    pub image_url: Option<String>,
}

impl From<Product> for ProductSummary {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category_name,
            nutrition_grade: p.nutrition_grade,
            image_url: p.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub categories: Vec<String>,
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct NutrientLevels {
    pub fat: Option<NutrientLevel>,
    pub saturated_fat: Option<NutrientLevel>,
    pub salt: Option<NutrientLevel>,
    pub sugar: Option<NutrientLevel>,
}

impl NutrientLevels {
    /// Thresholds follow the openfoodfacts reference quantities per
    /// 100 g; a missing quantity gets no indicator.
    pub fn of(product: &Product) -> Self {
        Self {
            fat: level(product.fat, 3.0, 20.0),
            saturated_fat: level(product.saturated_fat, 1.5, 5.0),
            salt: level(product.salt, 0.3, 1.5),
            sugar: level(product.sugar, 5.0, 12.5),
        }
    }
}

fn level(value: Option<f64>, low_below: f64, high_above: f64) -> Option<NutrientLevel> {
    let v = value?;
    Some(if v < low_below {
        NutrientLevel::Low
    } else if v <= high_above {
        NutrientLevel::Moderate
    } else {
        NutrientLevel::High
    })
}

#[derive(Debug, Serialize)]
pub struct ProductDetails {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub nutrition_grade: NutritionGrade,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub salt: Option<f64>,
    pub sugar: Option<f64>,
    pub levels: NutrientLevels,
    pub image_url: Option<String>,
    pub external_url: Option<String>,
}

impl From<Product> for ProductDetails {
    fn from(p: Product) -> Self {
        let levels = NutrientLevels::of(&p);
        Self {
            id: p.id,
            name: p.name,
            category: p.category_name,
            nutrition_grade: p.nutrition_grade,
            fat: p.fat,
            saturated_fat: p.saturated_fat,
            salt: p.salt,
            sugar: p.sugar,
            levels,
            image_url: p.image_url,
            external_url: p.external_url,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::catalog::dto::ProductSummary;
use crate::pagination::Page;

use super::repo::SavedRow;

/// Raw `page` query parameter; clamped by the pager, never rejected.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub origin_id: i64,
    pub replacement_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub origin_id: i64,
    pub replacement_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SubstituteSearchResponse {
    pub origin: ProductSummary,
    pub results: Page<ProductSummary>,
}

/// A saved pairing shown in the user's list.
#[derive(Debug, Serialize)]
pub struct SavedSubstitute {
    pub origin: ProductSummary,
    pub replacement: ProductSummary,
}

impl From<SavedRow> for SavedSubstitute {
    fn from(row: SavedRow) -> Self {
        Self {
            origin: ProductSummary {
                id: row.origin_id,
                name: row.origin_name,
                category: row.origin_category,
                nutrition_grade: row.origin_grade,
                image_url: row.origin_image_url,
            },
            replacement: ProductSummary {
                id: row.replacement_id,
                name: row.replacement_name,
                category: row.replacement_category,
                nutrition_grade: row.replacement_grade,
                image_url: row.replacement_image_url,
            },
        }
    }
}

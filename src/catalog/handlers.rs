use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

use super::dto::{ProductDetails, ProductSummary, SearchResponse};
use super::repo::Product;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(search_products))
        .route("/products/:id", get(product_detail))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".into()));
    }

    let products = Product::search_by_name(&state.db, query).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("product"));
    }

    // Distinct category names, first-seen order.
    let mut categories: Vec<String> = Vec::new();
    for product in &products {
        if !categories.contains(&product.category_name) {
            categories.push(product.category_name.clone());
        }
    }

    Ok(Json(SearchResponse {
        query: query.to_string(),
        categories,
        products: products.into_iter().map(ProductSummary::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDetails>, AppError> {
    let product = Product::by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("product"))?;
    Ok(Json(ProductDetails::from(product)))
}

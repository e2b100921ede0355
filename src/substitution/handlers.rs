use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::{AuthUser, MaybeUser},
    catalog::dto::ProductSummary,
    error::AppError,
    pagination::{paginate, Page},
    state::AppState,
};

use super::dto::{
    PageParams, RemoveRequest, SaveRequest, SavedSubstitute, SubstituteSearchResponse,
};
use super::{engine, repo};

/// Substitute search results per page.
const SEARCH_PAGE_SIZE: usize = 9;
/// Saved-list entries per page.
const SAVED_PAGE_SIZE: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/:id/substitutes", get(search_substitutes))
        .route(
            "/substitutes",
            get(saved_list).post(save_substitute).delete(remove_substitute),
        )
}

#[instrument(skip(state))]
pub async fn search_substitutes(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<SubstituteSearchResponse>, AppError> {
    let (origin, substitutes) = engine::find_substitutes(&state.db, id, user).await?;

    let items: Vec<ProductSummary> = substitutes.into_iter().map(ProductSummary::from).collect();
    Ok(Json(SubstituteSearchResponse {
        origin: ProductSummary::from(origin),
        results: paginate(items, SEARCH_PAGE_SIZE, params.page.as_deref()),
    }))
}

#[instrument(skip(state))]
pub async fn saved_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<SavedSubstitute>>, AppError> {
    let rows = repo::saved_by_user(&state.db, user_id).await?;
    let items: Vec<SavedSubstitute> = rows.into_iter().map(SavedSubstitute::from).collect();
    Ok(Json(paginate(items, SAVED_PAGE_SIZE, params.page.as_deref())))
}

#[instrument(skip(state, payload))]
pub async fn save_substitute(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SaveRequest>,
) -> Result<(StatusCode, Json<repo::Substitute>), AppError> {
    let substitute =
        engine::save_substitute(&state.db, payload.origin_id, payload.replacement_id, user_id)
            .await?;
    info!(
        user_id = %user_id,
        origin_id = payload.origin_id,
        replacement_id = payload.replacement_id,
        "substitution saved"
    );
    Ok((StatusCode::CREATED, Json(substitute)))
}

#[instrument(skip(state, payload))]
pub async fn remove_substitute(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RemoveRequest>,
) -> Result<StatusCode, AppError> {
    engine::remove_substitute(&state.db, payload.origin_id, payload.replacement_id, user_id)
        .await?;
    info!(
        user_id = %user_id,
        origin_id = payload.origin_id,
        replacement_id = payload.replacement_id,
        "substitution removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

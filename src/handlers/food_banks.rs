use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::Result,
    models::{food_bank::FoodBank, item::Item, visit::Visit},
    repositories::food_bank as food_bank_repo,
    services::pantry,
    state::AppState,
};

/// Creates or updates a food bank.
#[axum::debug_handler]
pub async fn save_food_bank(
    State(state): State<AppState>,
    Json(food_bank): Json<FoodBank>,
) -> Result<Response> {
    let food_bank = pantry::save_food_bank(&state, food_bank).await?;
    Ok((StatusCode::OK, Json(food_bank)).into_response())
}

#[axum::debug_handler]
pub async fn list_food_banks(State(state): State<AppState>) -> Result<Response> {
    let food_banks = food_bank_repo::list_all(state.store.as_ref()).await?;
    Ok((StatusCode::OK, Json(food_banks)).into_response())
}

/// Creates or updates an item of an existing food bank.
#[axum::debug_handler]
pub async fn save_item(
    State(state): State<AppState>,
    Json(item): Json<Item>,
) -> Result<Response> {
    let item = pantry::save_item(&state, item).await?;
    Ok((StatusCode::OK, Json(item)).into_response())
}

#[axum::debug_handler]
pub async fn food_bank_items(
    State(state): State<AppState>,
    Path(food_bank_id): Path<String>,
) -> Result<Response> {
    let items = pantry::items_of_food_bank(&state, &food_bank_id).await?;
    Ok((StatusCode::OK, Json(items)).into_response())
}

/// Records a household's visit.
#[axum::debug_handler]
pub async fn record_visit(
    State(state): State<AppState>,
    Json(visit): Json<Visit>,
) -> Result<Response> {
    let visit = pantry::record_visit(&state, visit).await?;
    Ok((StatusCode::CREATED, Json(visit)).into_response())
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::Result,
    models::household::{Household, HouseholdSummary},
    repositories::household as household_repo,
    services::pantry,
    state::AppState,
};

/// Registers a household. Open to anyone.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(household): Json<Household>,
) -> Result<Response> {
    let household = pantry::register_household(&state, household).await?;

    let response = serde_json::json!({
        "id": household.id,
        "message": "Household registered"
    });

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Lists household summaries, newest first.
#[axum::debug_handler]
pub async fn list_households(State(state): State<AppState>) -> Result<Response> {
    let summaries: Vec<HouseholdSummary> = household_repo::list_newest_first(state.store.as_ref())
        .await?
        .iter()
        .map(HouseholdSummary::from)
        .collect();

    Ok((StatusCode::OK, Json(summaries)).into_response())
}

#[axum::debug_handler]
pub async fn get_household(
    State(state): State<AppState>,
    Path(household_id): Path<String>,
) -> Result<Response> {
    let household = pantry::get_household(&state, &household_id).await?;
    Ok((StatusCode::OK, Json(household)).into_response())
}

/// The head of a household followed by its members.
#[axum::debug_handler]
pub async fn household_persons(
    State(state): State<AppState>,
    Path(household_id): Path<String>,
) -> Result<Response> {
    let household = pantry::get_household(&state, &household_id).await?;
    Ok((StatusCode::OK, Json(household.everyone())).into_response())
}

#[axum::debug_handler]
pub async fn household_visits(
    State(state): State<AppState>,
    Path(household_id): Path<String>,
) -> Result<Response> {
    let visits = pantry::visits_of_household(&state, &household_id).await?;
    Ok((StatusCode::OK, Json(visits)).into_response())
}

#[axum::debug_handler]
pub async fn delete_household(
    State(state): State<AppState>,
    Path(household_id): Path<String>,
) -> Result<Response> {
    pantry::delete_household(&state, &household_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::person::{PersonFields, PersonInput},
    services::persons as person_service,
    state::AppState,
};

/// The query parameters for searching persons.
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Creates or updates a person.
#[axum::debug_handler]
pub async fn save_person(
    State(state): State<AppState>,
    Json(input): Json<PersonInput>,
) -> Result<Response> {
    let person = person_service::save_person(&state, input).await?;
    Ok((StatusCode::OK, Json(person.fields)).into_response())
}

/// Lists persons, optionally filtered by name or email.
#[axum::debug_handler]
pub async fn search_persons(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let persons: Vec<PersonFields> = person_service::search_persons(&state, query.q.as_deref())
        .await?
        .into_iter()
        .map(|p| p.fields)
        .collect();

    Ok((StatusCode::OK, Json(persons)).into_response())
}

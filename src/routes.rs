use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

const MAX_BODY_BYTES: usize = 1024 * 1024;

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!("⚠️  Ignoring unparsable CORS origin {:?}", origin);
            cors
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let mut public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route("/signup", post(handlers::households::signup));

    if state.config.rate_limit_enabled {
        match GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .use_headers()
            .finish()
        {
            Some(conf) => {
                public_routes =
                    public_routes.layer(tower_governor::GovernorLayer::new(Arc::new(conf)));
                tracing::info!("✅ Rate limiting enabled on public routes");
            }
            None => tracing::warn!("⚠️  Invalid rate limit configuration, limiting disabled"),
        }
    }

    let public_routes = public_routes
        .route("/logout", post(handlers::auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/me", get(handlers::auth::me))
        .route("/person", post(handlers::persons::save_person))
        .route("/persons/search", get(handlers::persons::search_persons))
        .route("/households", get(handlers::households::list_households))
        .route(
            "/household/{household_id}",
            get(handlers::households::get_household),
        )
        .route(
            "/household/{household_id}",
            delete(handlers::households::delete_household),
        )
        .route(
            "/household/{household_id}/persons",
            get(handlers::households::household_persons),
        )
        .route(
            "/household/{household_id}/visits",
            get(handlers::households::household_visits),
        )
        .route("/foodbank", post(handlers::food_banks::save_food_bank))
        .route("/foodbanks", get(handlers::food_banks::list_food_banks))
        .route(
            "/foodbank/{food_bank_id}/items",
            get(handlers::food_banks::food_bank_items),
        )
        .route("/item", post(handlers::food_banks::save_item))
        .route("/visit", post(handlers::food_banks::record_visit))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&state.config.cors_origin))
}

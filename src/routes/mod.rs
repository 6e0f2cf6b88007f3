//! Rutas HTTP de la API
//!
//! Cada recurso expone su router y `create_app` los monta bajo `/api`.
//! Todo salvo `/health` y el login pasa por `auth_middleware`.

pub mod appointment_routes;
pub mod auth_routes;
pub mod client_routes;
pub mod inventory_routes;
pub mod material_routes;
pub mod punch_routes;
pub mod report_routes;
pub mod user_routes;
pub mod vacation_routes;
pub mod vehicle_routes;
pub mod work_order_routes;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_middleware, cors_layer};
use crate::state::AppState;

/// Construir la aplicación completa con sus capas
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(auth_routes::me))
        .nest("/api/users", user_routes::create_user_router())
        .nest("/api/clients", client_routes::create_client_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/work-orders", work_order_routes::create_work_order_router())
        .nest("/api/materials", material_routes::create_material_router())
        .nest("/api/punches", punch_routes::create_punch_router())
        .nest("/api/appointments", appointment_routes::create_appointment_router())
        .nest("/api/vacations", vacation_routes::create_vacation_router())
        .nest("/api/inventory", inventory_routes::create_inventory_router())
        .nest("/api/reports", report_routes::create_report_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(auth_routes::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.store.mode.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

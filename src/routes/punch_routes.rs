use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::punch_controller::PunchController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::punch::{NewPunch, Punch, PunchFilters, UpdatePunchRequest};
use crate::services::punch_service::PresenceStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_punch_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_punches).post(create_punch))
        .route("/clock-in", post(clock_in))
        .route("/clock-out", post(clock_out))
        .route("/status", get(presence_status))
        .route("/:id", put(update_punch).delete(delete_punch))
}

async fn clock_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Punch>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.clock_in(&user).await?;
    Ok(Json(response))
}

async fn clock_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Punch>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.clock_out(&user).await?;
    Ok(Json(response))
}

async fn presence_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PresenceStatus>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.status(&user).await?;
    Ok(Json(response))
}

async fn list_punches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<PunchFilters>,
) -> Result<Json<Vec<Punch>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.list(&user, filters).await?;
    Ok(Json(response))
}

async fn create_punch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<NewPunch>,
) -> Result<Json<ApiResponse<Punch>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_punch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePunchRequest>,
) -> Result<Json<ApiResponse<Punch>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_punch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PunchController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Fichaje eliminado".to_string())))
}

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::vacation_controller::VacationController;
use crate::dto::query_dto::VacationQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vacation::{CreateVacationRequest, VacationRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vacation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vacations).post(request_vacation))
        .route("/:id", delete(delete_vacation))
        .route("/:id/approve", post(approve_vacation))
        .route("/:id/reject", post(reject_vacation))
}

async fn list_vacations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<VacationQuery>,
) -> Result<Json<Vec<VacationRequest>>, AppError> {
    let controller = VacationController::new(state.store.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn request_vacation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVacationRequest>,
) -> Result<Json<ApiResponse<VacationRequest>>, AppError> {
    let controller = VacationController::new(state.store.clone());
    let response = controller.request(&user, request).await?;
    Ok(Json(response))
}

async fn approve_vacation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VacationRequest>>, AppError> {
    let controller = VacationController::new(state.store.clone());
    let response = controller.approve(&user, id).await?;
    Ok(Json(response))
}

async fn reject_vacation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VacationRequest>>, AppError> {
    let controller = VacationController::new(state.store.clone());
    let response = controller.reject(&user, id).await?;
    Ok(Json(response))
}

async fn delete_vacation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VacationController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Solicitud eliminada".to_string())))
}

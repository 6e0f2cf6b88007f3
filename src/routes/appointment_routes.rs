use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::appointment_controller::AppointmentController;
use crate::dto::query_dto::AppointmentQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{
    AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/:id",
            get(get_appointment).put(update_appointment).delete(delete_appointment),
        )
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let controller = AppointmentController::new(state.store.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let controller = AppointmentController::new(state.store.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, AppError> {
    let controller = AppointmentController::new(state.store.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, AppError> {
    let controller = AppointmentController::new(state.store.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AppointmentController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Cita eliminada exitosamente".to_string())))
}

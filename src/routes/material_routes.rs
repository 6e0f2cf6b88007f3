//! Líneas de material sueltas, fuera del parte que las contiene

use axum::{
    extract::{Path, State},
    routing::put,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::material::{MaterialUsed, UpdateMaterialRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_material_router() -> Router<AppState> {
    Router::new().route("/:id", put(update_material).delete(remove_material))
}

async fn update_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMaterialRequest>,
) -> Result<Json<ApiResponse<MaterialUsed>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.update_material(&user, id, request).await?;
    Ok(Json(response))
}

async fn remove_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    controller.remove_material(&user, id).await?;
    Ok(Json(ApiResponse::message("Material eliminado".to_string())))
}

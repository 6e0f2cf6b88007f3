use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::inventory_controller::InventoryController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::inventory::{
    CreateInventoryItemRequest, InventoryItem, UpdateInventoryItemRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn low_stock(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    let response = controller.low_stock(&user).await?;
    Ok(Json(response))
}

async fn get_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryItem>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItem>>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = InventoryController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Artículo eliminado exitosamente".to_string())))
}

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_order_controller::{WorkOrderController, WorkSessionResponse};
use crate::dto::query_dto::WorkOrderQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::material::{CreateMaterialRequest, MaterialUsed};
use crate::models::punch::Punch;
use crate::models::work_order::{
    CloseWorkOrderRequest, CreateWorkOrderRequest, UpdateWorkOrderRequest, WorkOrder,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_work_orders).post(create_work_order))
        .route(
            "/:id",
            get(get_work_order).put(update_work_order).delete(delete_work_order),
        )
        .route("/:id/start", post(start_work))
        .route("/:id/stop", post(stop_work))
        .route("/:id/close", post(close_work_order))
        .route("/:id/cancel", post(cancel_work_order))
        .route("/:id/reconcile", post(reconcile_work_order))
        .route("/:id/punches", get(work_order_punches))
        .route("/:id/materials", get(list_materials).post(add_material))
}

async fn list_work_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<WorkOrderQuery>,
) -> Result<Json<Vec<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn get_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkOrder>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn create_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Parte eliminado exitosamente".to_string())))
}

async fn start_work(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkSessionResponse>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.start(&user, id).await?;
    Ok(Json(response))
}

async fn stop_work(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkSessionResponse>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.stop(&user, id).await?;
    Ok(Json(response))
}

async fn close_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CloseWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.close(&user, id, request).await?;
    Ok(Json(response))
}

async fn cancel_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.cancel(&user, id).await?;
    Ok(Json(response))
}

async fn reconcile_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkOrder>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.reconcile(&user, id).await?;
    Ok(Json(response))
}

async fn work_order_punches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Punch>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.punches(&user, id).await?;
    Ok(Json(response))
}

async fn list_materials(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MaterialUsed>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.materials(&user, id).await?;
    Ok(Json(response))
}

async fn add_material(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<Json<ApiResponse<MaterialUsed>>, AppError> {
    let controller = WorkOrderController::new(state.store.clone());
    let response = controller.add_material(&user, id, request).await?;
    Ok(Json(response))
}

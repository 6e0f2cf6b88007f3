use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::client_controller::ClientController;
use crate::dto::import_dto::ImportResult;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, CreateClientRequest, UpdateClientRequest};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/import", post(import_clients))
        .route("/export", get(export_clients))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
        .route("/:id/vehicles", get(client_vehicles))
}

async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Client>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn client_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.vehicles(&user, id).await?;
    Ok(Json(response))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateClientRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Cliente eliminado exitosamente".to_string())))
}

/// El cuerpo es el CSV en texto plano
async fn import_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: String,
) -> Result<Json<ApiResponse<ImportResult>>, AppError> {
    let controller = ClientController::new(state.store.clone());
    let response = controller.import(&user, &body).await?;
    Ok(Json(response))
}

async fn export_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ClientController::new(state.store.clone());
    let csv = controller.export(&user).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"clientes.csv\""),
        ],
        csv,
    ))
}

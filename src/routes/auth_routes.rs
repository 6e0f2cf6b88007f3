use axum::{extract::State, Extension, Json};

use crate::controllers::auth_controller::AuthController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(state.store.clone());
    let response = controller.login(request, &state.config).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserInfo>, AppError> {
    let controller = AuthController::new(state.store.clone());
    let response = controller.me(&user).await?;
    Ok(Json(response))
}

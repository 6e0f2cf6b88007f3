use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::repositories::Store;
use crate::services::auth_service::AuthService;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtConfig;

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(store: Store) -> Self {
        Self {
            service: AuthService::new(store),
        }
    }

    pub async fn login(
        &self,
        request: LoginRequest,
        config: &EnvironmentConfig,
    ) -> Result<ApiResponse<LoginResponse>, AppError> {
        request.validate()?;

        let response = self.service.login(&request, &JwtConfig::from(config)).await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Login exitoso".to_string(),
        ))
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserInfo, AppError> {
        self.service.me(user.user_id).await
    }
}

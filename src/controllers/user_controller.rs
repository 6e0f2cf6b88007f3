use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserPatch};
use crate::repositories::Store;
use crate::services::auth_service::{hash_password, normalize_email};
use crate::services::authorization_service::Capability;
use crate::services::cascade_service::CascadeService;
use crate::utils::errors::AppError;

pub struct UserController {
    store: Store,
}

impl UserController {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<User>, AppError> {
        user.require(Capability::ManageUsers)?;

        let mut users = self.store.users.get_all().await?;
        users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(users)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<User, AppError> {
        user.require_self_or(id, Capability::ManageUsers)?;
        self.store.users.get_by_id(id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<User>, AppError> {
        user.require(Capability::ManageUsers)?;
        request.validate()?;

        let created = self
            .store
            .users
            .create(NewUser {
                email: normalize_email(&request.email),
                name: request.name.trim().to_string(),
                role: request.role,
                active: request.active.unwrap_or(true),
                password_hash: hash_password(&request.password)?,
            })
            .await?;

        tracing::info!("👤 Usuario {} creado con rol {}", created.email, created.role);
        Ok(ApiResponse::success_with_message(
            created,
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<User>, AppError> {
        user.require(Capability::ManageUsers)?;
        request.validate()?;

        // Un administrador no puede quitarse a sí mismo el acceso
        if id == user.user_id
            && (request.active == Some(false) || request.role.is_some_and(|role| role != user.role))
        {
            return Err(AppError::Conflict(
                "No puedes desactivarte ni cambiar tu propio rol".to_string(),
            ));
        }

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let patch = UserPatch {
            email: request.email.as_deref().map(normalize_email),
            name: request.name.map(|name| name.trim().to_string()),
            role: request.role,
            active: request.active,
            password_hash,
        };
        let updated = self.store.users.update(id, patch).await?;

        Ok(ApiResponse::success_with_message(
            updated,
            "Usuario actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::ManageUsers)?;
        if id == user.user_id {
            return Err(AppError::Conflict("No puedes eliminar tu propio usuario".to_string()));
        }
        CascadeService::new(self.store.clone()).delete_user(id).await
    }
}

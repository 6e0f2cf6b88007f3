use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::punch::{NewPunch, Punch, PunchFilters, UpdatePunchRequest};
use crate::repositories::Store;
use crate::services::authorization_service::Capability;
use crate::services::punch_service::{PresenceStatus, PunchService};
use crate::utils::errors::AppError;

pub struct PunchController {
    service: PunchService,
}

impl PunchController {
    pub fn new(store: Store) -> Self {
        Self {
            service: PunchService::new(store),
        }
    }

    pub async fn clock_in(&self, user: &AuthenticatedUser) -> Result<ApiResponse<Punch>, AppError> {
        let punch = self.service.clock_in(user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            punch,
            "Entrada registrada".to_string(),
        ))
    }

    pub async fn clock_out(&self, user: &AuthenticatedUser) -> Result<ApiResponse<Punch>, AppError> {
        let punch = self.service.clock_out(user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            punch,
            "Salida registrada".to_string(),
        ))
    }

    pub async fn status(&self, user: &AuthenticatedUser) -> Result<PresenceStatus, AppError> {
        self.service.presence_status(user.user_id).await
    }

    /// Sin `edit_punches` el listado se limita a los fichajes propios
    pub async fn list(&self, user: &AuthenticatedUser, mut filters: PunchFilters) -> Result<Vec<Punch>, AppError> {
        if !user.can(Capability::EditPunches) {
            if filters.user_id.is_some_and(|id| id != user.user_id) {
                user.require(Capability::EditPunches)?;
            }
            filters.user_id = Some(user.user_id);
        }
        self.service.list(&filters).await
    }

    pub async fn create(&self, user: &AuthenticatedUser, request: NewPunch) -> Result<ApiResponse<Punch>, AppError> {
        user.require(Capability::EditPunches)?;

        let punch = self.service.create_manual(request).await?;
        Ok(ApiResponse::success_with_message(
            punch,
            "Fichaje creado".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdatePunchRequest,
    ) -> Result<ApiResponse<Punch>, AppError> {
        user.require(Capability::EditPunches)?;

        let punch = self.service.update_manual(id, request).await?;
        tracing::info!("✏️ Fichaje {} corregido por {}", id, user.email);
        Ok(ApiResponse::success_with_message(
            punch,
            "Fichaje actualizado".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::EditPunches)?;
        self.service.delete_manual(id).await?;
        tracing::info!("🗑️ Fichaje {} eliminado por {}", id, user.email);
        Ok(())
    }
}

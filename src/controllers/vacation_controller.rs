use uuid::Uuid;
use validator::Validate;

use crate::dto::query_dto::VacationQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vacation::{CreateVacationRequest, VacationRequest};
use crate::repositories::Store;
use crate::services::authorization_service::Capability;
use crate::services::vacation_service::VacationService;
use crate::utils::errors::AppError;

pub struct VacationController {
    service: VacationService,
}

impl VacationController {
    pub fn new(store: Store) -> Self {
        Self {
            service: VacationService::new(store),
        }
    }

    /// Quien aprueba ve todas (o las de un usuario); el resto, solo las suyas
    pub async fn list(&self, user: &AuthenticatedUser, query: VacationQuery) -> Result<Vec<VacationRequest>, AppError> {
        if user.can(Capability::ApproveVacations) {
            return self.service.list(query.user_id).await;
        }

        if let Some(user_id) = query.user_id {
            user.require_self_or(user_id, Capability::ApproveVacations)?;
        }
        self.service.list(Some(user.user_id)).await
    }

    pub async fn request(
        &self,
        user: &AuthenticatedUser,
        request: CreateVacationRequest,
    ) -> Result<ApiResponse<VacationRequest>, AppError> {
        user.require(Capability::RequestVacations)?;
        request.validate()?;

        let created = self.service.request(user.user_id, request).await?;
        Ok(ApiResponse::success_with_message(
            created,
            "Solicitud de vacaciones registrada".to_string(),
        ))
    }

    pub async fn approve(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<VacationRequest>, AppError> {
        user.require(Capability::ApproveVacations)?;

        let approved = self.service.approve(id, user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            approved,
            "Vacaciones aprobadas".to_string(),
        ))
    }

    pub async fn reject(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<VacationRequest>, AppError> {
        user.require(Capability::ApproveVacations)?;

        let rejected = self.service.reject(id, user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            rejected,
            "Vacaciones rechazadas".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        self.service
            .delete(id, user.user_id, user.can(Capability::ApproveVacations))
            .await
    }
}

use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::inventory::{
    CreateInventoryItemRequest, InventoryItem, UpdateInventoryItemRequest,
};
use crate::repositories::Store;
use crate::services::authorization_service::Capability;
use crate::services::inventory_service::InventoryService;
use crate::utils::errors::AppError;

pub struct InventoryController {
    service: InventoryService,
}

impl InventoryController {
    pub fn new(store: Store) -> Self {
        Self {
            service: InventoryService::new(store),
        }
    }

    /// Consultar stock: quien gestiona el almacén o quien trabaja en partes
    fn require_read(user: &AuthenticatedUser) -> Result<(), AppError> {
        if user.can(Capability::WorkOnOrders) {
            Ok(())
        } else {
            user.require(Capability::ManageInventory)
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<InventoryItem>, AppError> {
        Self::require_read(user)?;
        self.service.list_items().await
    }

    pub async fn low_stock(&self, user: &AuthenticatedUser) -> Result<Vec<InventoryItem>, AppError> {
        Self::require_read(user)?;
        self.service.low_stock().await
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<InventoryItem, AppError> {
        Self::require_read(user)?;
        self.service.get_item(id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateInventoryItemRequest,
    ) -> Result<ApiResponse<InventoryItem>, AppError> {
        user.require(Capability::ManageInventory)?;
        request.validate()?;

        let item = self.service.create_item(request).await?;
        tracing::info!("📦 Artículo {} dado de alta", item.reference);
        Ok(ApiResponse::success_with_message(
            item,
            "Artículo creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateInventoryItemRequest,
    ) -> Result<ApiResponse<InventoryItem>, AppError> {
        user.require(Capability::ManageInventory)?;
        request.validate()?;

        let item = self.service.update_item(id, request).await?;
        Ok(ApiResponse::success_with_message(
            item,
            "Artículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::ManageInventory)?;
        self.service.delete_item(id).await
    }
}

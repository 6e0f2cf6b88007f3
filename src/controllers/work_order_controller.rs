use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::query_dto::WorkOrderQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::material::{CreateMaterialRequest, MaterialUsed, UpdateMaterialRequest};
use crate::models::punch::Punch;
use crate::models::work_order::{
    CloseWorkOrderRequest, CreateWorkOrderRequest, UpdateWorkOrderRequest, WorkOrder,
};
use crate::repositories::Store;
use crate::services::authorization_service::Capability;
use crate::services::{InventoryService, WorkOrderService};
use crate::utils::errors::{forbidden_error, AppError};

/// Respuesta de start/stop: el parte y el fichaje generado
#[derive(Debug, Serialize)]
pub struct WorkSessionResponse {
    pub work_order: WorkOrder,
    pub punch: Punch,
}

pub struct WorkOrderController {
    store: Store,
    service: WorkOrderService,
}

impl WorkOrderController {
    pub fn new(store: Store) -> Self {
        Self {
            service: WorkOrderService::new(store.clone()),
            store,
        }
    }

    /// Sin `view_all_work_orders` solo se ven los partes propios o sin asignar
    fn ensure_visible(user: &AuthenticatedUser, order: &WorkOrder) -> Result<(), AppError> {
        if user.can(Capability::ViewAllWorkOrders)
            || order.technician_id.map_or(true, |technician| technician == user.user_id)
        {
            Ok(())
        } else {
            Err(forbidden_error(
                "access work order",
                "el parte está asignado a otro técnico",
            ))
        }
    }

    async fn visible_order(&self, user: &AuthenticatedUser, id: Uuid) -> Result<WorkOrder, AppError> {
        let order = self.service.get(id).await?;
        Self::ensure_visible(user, &order)?;
        Ok(order)
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: WorkOrderQuery) -> Result<Vec<WorkOrder>, AppError> {
        if user.can(Capability::ViewAllWorkOrders) {
            return self.service.list(query.technician_id, query.client_id).await;
        }

        user.require(Capability::WorkOnOrders)?;
        let orders = self.service.list(None, query.client_id).await?;
        Ok(orders
            .into_iter()
            .filter(|order| Self::ensure_visible(user, order).is_ok())
            .filter(|order| query.technician_id.map_or(true, |id| order.technician_id == Some(id)))
            .collect())
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<WorkOrder, AppError> {
        self.visible_order(user, id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateWorkOrderRequest,
    ) -> Result<ApiResponse<WorkOrder>, AppError> {
        user.require(Capability::CreateWorkOrders)?;
        request.validate()?;

        let order = self.service.create(request).await?;
        let message = format!("Parte {} creado exitosamente", order.order_number);
        Ok(ApiResponse::success_with_message(order, message))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateWorkOrderRequest,
    ) -> Result<ApiResponse<WorkOrder>, AppError> {
        user.require(Capability::CreateWorkOrders)?;
        request.validate()?;

        let order = self.service.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            order,
            "Parte actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::DeleteWorkOrders)?;
        self.service.delete(id).await
    }

    pub async fn start(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<WorkSessionResponse>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        self.visible_order(user, id).await?;

        let (work_order, punch) = self.service.start_work(id, user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            WorkSessionResponse { work_order, punch },
            "Trabajo iniciado".to_string(),
        ))
    }

    pub async fn stop(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<WorkSessionResponse>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        self.visible_order(user, id).await?;

        let (work_order, punch) = self.service.stop_work(id, user.user_id).await?;
        Ok(ApiResponse::success_with_message(
            WorkSessionResponse { work_order, punch },
            "Trabajo detenido".to_string(),
        ))
    }

    pub async fn close(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: CloseWorkOrderRequest,
    ) -> Result<ApiResponse<WorkOrder>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        request.validate()?;
        self.visible_order(user, id).await?;

        let order = self.service.close(id, &request.work_performed).await?;
        let message = format!(
            "Parte {} cerrado con {} horas",
            order.order_number,
            order.actual_hours.unwrap_or(0.0)
        );
        Ok(ApiResponse::success_with_message(order, message))
    }

    pub async fn cancel(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<WorkOrder>, AppError> {
        user.require(Capability::CancelWorkOrders)?;

        let order = self.service.cancel(id).await?;
        Ok(ApiResponse::success_with_message(
            order,
            "Parte cancelado".to_string(),
        ))
    }

    pub async fn reconcile(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ApiResponse<WorkOrder>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        self.visible_order(user, id).await?;

        let order = self.service.reconcile(id).await?;
        Ok(ApiResponse::success_with_message(
            order,
            "Horas recalculadas".to_string(),
        ))
    }

    pub async fn punches(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vec<Punch>, AppError> {
        self.visible_order(user, id).await?;
        self.service.punches(id).await
    }

    pub async fn materials(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vec<MaterialUsed>, AppError> {
        self.visible_order(user, id).await?;
        InventoryService::new(self.store.clone()).list_materials(id).await
    }

    pub async fn add_material(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: CreateMaterialRequest,
    ) -> Result<ApiResponse<MaterialUsed>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        request.validate()?;
        self.visible_order(user, id).await?;

        let material = InventoryService::new(self.store.clone())
            .add_material(id, request)
            .await?;
        Ok(ApiResponse::success_with_message(
            material,
            "Material añadido".to_string(),
        ))
    }

    pub async fn update_material(
        &self,
        user: &AuthenticatedUser,
        material_id: Uuid,
        request: UpdateMaterialRequest,
    ) -> Result<ApiResponse<MaterialUsed>, AppError> {
        user.require(Capability::WorkOnOrders)?;
        request.validate()?;

        let material = self.store.materials.get_by_id(material_id).await?;
        self.visible_order(user, material.work_order_id).await?;

        let material = InventoryService::new(self.store.clone())
            .update_material(material_id, request)
            .await?;
        Ok(ApiResponse::success_with_message(
            material,
            "Material actualizado".to_string(),
        ))
    }

    pub async fn remove_material(&self, user: &AuthenticatedUser, material_id: Uuid) -> Result<(), AppError> {
        user.require(Capability::WorkOnOrders)?;

        let material = self.store.materials.get_by_id(material_id).await?;
        self.visible_order(user, material.work_order_id).await?;

        InventoryService::new(self.store.clone())
            .remove_material(material_id)
            .await
    }
}

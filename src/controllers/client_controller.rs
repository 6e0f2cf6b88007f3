use uuid::Uuid;
use validator::Validate;

use crate::dto::import_dto::ImportResult;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, CreateClientRequest, UpdateClientRequest};
use crate::models::vehicle::Vehicle;
use crate::repositories::{FieldValue, Store};
use crate::services::authorization_service::Capability;
use crate::services::cascade_service::CascadeService;
use crate::services::client_import_service::ClientImportService;
use crate::utils::errors::AppError;

pub struct ClientController {
    store: Store,
}

impl ClientController {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<Client>, AppError> {
        user.require(Capability::ViewClients)?;

        let mut clients = self.store.clients.get_all().await?;
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Client, AppError> {
        user.require(Capability::ViewClients)?;
        self.store.clients.get_by_id(id).await
    }

    pub async fn vehicles(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        user.require(Capability::ViewClients)?;
        self.store.clients.get_by_id(id).await?;
        self.store
            .vehicles
            .find_by("client_id", FieldValue::Uuid(id))
            .await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateClientRequest,
    ) -> Result<ApiResponse<Client>, AppError> {
        user.require(Capability::ManageClients)?;
        let request = request.normalized();
        request.validate()?;

        let client = self.store.clients.create(request).await?;
        tracing::info!("🏢 Cliente {} ({}) creado", client.name, client.tax_id);

        Ok(ApiResponse::success_with_message(
            client,
            "Cliente creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ApiResponse<Client>, AppError> {
        user.require(Capability::ManageClients)?;
        let request = request.normalized();
        request.validate()?;

        let client = self.store.clients.update(id, request).await?;

        Ok(ApiResponse::success_with_message(
            client,
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    /// Borra el cliente con sus vehículos y citas; sus partes quedan sin cliente
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::ManageClients)?;
        CascadeService::new(self.store.clone()).delete_client(id).await
    }

    pub async fn import(
        &self,
        user: &AuthenticatedUser,
        csv: &str,
    ) -> Result<ApiResponse<ImportResult>, AppError> {
        user.require(Capability::ImportClients)?;

        let result = ClientImportService::new(self.store.clone()).import(csv).await?;
        let message = format!(
            "{} clientes importados, {} con errores",
            result.imported,
            result.failed.len()
        );
        Ok(ApiResponse::success_with_message(result, message))
    }

    pub async fn export(&self, user: &AuthenticatedUser) -> Result<String, AppError> {
        user.require(Capability::ViewClients)?;
        ClientImportService::new(self.store.clone()).export().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::work_order_controller::WorkOrderController;
    use crate::models::auth::UserRole;
    use crate::models::work_order::{CreateWorkOrderRequest, UpdateWorkOrderRequest};

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "admin@taller.es".to_string(),
            name: "Admin".to_string(),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn test_orders_stay_editable_after_client_delete() {
        let store = Store::in_memory();
        let user = admin();
        let clients = ClientController::new(store.clone());
        let orders = WorkOrderController::new(store.clone());

        let client = clients
            .create(
                &user,
                CreateClientRequest {
                    name: "Logística Levante".to_string(),
                    tax_id: "B46000000".to_string(),
                    phone: None,
                    email: None,
                    address: None,
                    primary_contact: None,
                    notes: None,
                    active: None,
                },
            )
            .await
            .unwrap()
            .data
            .unwrap();
        let order = orders
            .create(
                &user,
                CreateWorkOrderRequest {
                    client_id: Some(client.id),
                    client_name: None,
                    vehicle_id: None,
                    technician_id: None,
                    priority: None,
                    description: "Ruido en la suspensión".to_string(),
                    estimated_hours: None,
                },
            )
            .await
            .unwrap()
            .data
            .unwrap();

        clients.delete(&user, client.id).await.unwrap();

        let order = orders.get_by_id(&user, order.id).await.unwrap();
        assert_eq!(order.client_id, None);
        assert_eq!(order.client_name.as_deref(), Some("Logística Levante"));

        let edit = UpdateWorkOrderRequest {
            estimated_hours: Some(3.5),
            ..Default::default()
        };
        let updated = orders.update(&user, order.id, edit).await.unwrap().data.unwrap();
        assert_eq!(updated.estimated_hours, Some(3.5));
    }
}

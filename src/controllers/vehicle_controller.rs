use uuid::Uuid;
use validator::Validate;

use crate::dto::query_dto::VehicleQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle};
use crate::repositories::{FieldValue, Store};
use crate::services::authorization_service::Capability;
use crate::services::cascade_service::CascadeService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    store: Store,
}

impl VehicleController {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: VehicleQuery) -> Result<Vec<Vehicle>, AppError> {
        user.require(Capability::ViewClients)?;

        let mut vehicles = match query.client_id {
            Some(client_id) => {
                self.store
                    .vehicles
                    .find_by("client_id", FieldValue::Uuid(client_id))
                    .await?
            }
            None => self.store.vehicles.get_all().await?,
        };
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(vehicles)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vehicle, AppError> {
        user.require(Capability::ViewClients)?;
        self.store.vehicles.get_by_id(id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        user.require(Capability::ManageVehicles)?;
        request.validate()?;

        // El cliente debe existir
        self.store.clients.get_by_id(request.client_id).await?;

        let vehicle = self.store.vehicles.create(request).await?;
        tracing::info!("🚗 Vehículo {} creado", vehicle.plate);

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        user.require(Capability::ManageVehicles)?;
        request.validate()?;

        if let Some(client_id) = request.client_id {
            self.store.clients.get_by_id(client_id).await?;
        }

        let vehicle = self.store.vehicles.update(id, request).await?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::ManageVehicles)?;
        CascadeService::new(self.store.clone()).delete_vehicle(id).await
    }
}

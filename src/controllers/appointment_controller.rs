use uuid::Uuid;
use validator::Validate;

use crate::dto::query_dto::AppointmentQuery;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{
    AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::repositories::{FieldValue, Store};
use crate::services::authorization_service::Capability;
use crate::utils::errors::{bad_request_error, AppError};

pub struct AppointmentController {
    store: Store,
}

impl AppointmentController {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// El vehículo, si se indica, debe ser del cliente de la cita
    async fn check_vehicle(&self, client_id: Uuid, vehicle_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(vehicle_id) = vehicle_id {
            let vehicle = self.store.vehicles.get_by_id(vehicle_id).await?;
            if vehicle.client_id != client_id {
                return Err(bad_request_error("El vehículo no pertenece al cliente de la cita"));
            }
        }
        Ok(())
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: AppointmentQuery,
    ) -> Result<Vec<AppointmentResponse>, AppError> {
        user.require(Capability::ViewAppointments)?;

        let appointments = match query.client_id {
            Some(client_id) => {
                self.store
                    .appointments
                    .find_by("client_id", FieldValue::Uuid(client_id))
                    .await?
            }
            None => self.store.appointments.get_all().await?,
        };

        let mut appointments: Vec<AppointmentResponse> = appointments
            .into_iter()
            .filter(|a| query.from.map_or(true, |from| a.scheduled_at >= from))
            .filter(|a| query.to.map_or(true, |to| a.scheduled_at <= to))
            .map(AppointmentResponse::from)
            .collect();
        appointments.sort_by_key(|a| a.appointment.scheduled_at);
        Ok(appointments)
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<AppointmentResponse, AppError> {
        user.require(Capability::ViewAppointments)?;
        Ok(self.store.appointments.get_by_id(id).await?.into())
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateAppointmentRequest,
    ) -> Result<ApiResponse<AppointmentResponse>, AppError> {
        user.require(Capability::ManageAppointments)?;
        request.validate()?;

        self.store.clients.get_by_id(request.client_id).await?;
        self.check_vehicle(request.client_id, request.vehicle_id).await?;

        let appointment = self.store.appointments.create(request).await?;
        tracing::info!("📅 Cita {} creada para {}", appointment.id, appointment.scheduled_at);

        Ok(ApiResponse::success_with_message(
            appointment.into(),
            "Cita creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<ApiResponse<AppointmentResponse>, AppError> {
        user.require(Capability::ManageAppointments)?;
        request.validate()?;

        let current = self.store.appointments.get_by_id(id).await?;
        self.check_vehicle(current.client_id, request.vehicle_id).await?;

        let appointment = self.store.appointments.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            appointment.into(),
            "Cita actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::ManageAppointments)?;
        self.store.appointments.delete(id).await
    }
}

//! Borrados con dependencias
//!
//! Replica en el servicio las reglas `ON DELETE` de `migrations/` para que
//! el almacén en memoria quede igual que PostgreSQL:
//! - cliente: borra sus citas y vehículos, desvincula sus partes
//! - vehículo: desvincula partes y citas
//! - usuario: borra sus fichajes y solicitudes, desvincula partes y
//!   aprobaciones

use uuid::Uuid;

use crate::models::appointment::UpdateAppointmentRequest;
use crate::models::vacation::VacationPatch;
use crate::repositories::{FieldValue, Store};
use crate::services::work_order_service::WorkOrderService;
use crate::utils::errors::AppResult;

pub struct CascadeService {
    store: Store,
    work_orders: WorkOrderService,
}

impl CascadeService {
    pub fn new(store: Store) -> Self {
        Self {
            work_orders: WorkOrderService::new(store.clone()),
            store,
        }
    }

    pub async fn delete_client(&self, id: Uuid) -> AppResult<()> {
        let client = self.store.clients.get_by_id(id).await?;

        for appointment in self
            .store
            .appointments
            .find_by("client_id", FieldValue::Uuid(id))
            .await?
        {
            self.store.appointments.delete(appointment.id).await?;
        }
        for vehicle in self.store.vehicles.find_by("client_id", FieldValue::Uuid(id)).await? {
            self.delete_vehicle(vehicle.id).await?;
        }
        let detached = self.work_orders.detach_client(&client).await?;

        self.store.clients.delete(id).await?;
        tracing::info!("🗑️ Cliente {} eliminado ({} partes desvinculados)", client.tax_id, detached);
        Ok(())
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> AppResult<()> {
        let vehicle = self.store.vehicles.get_by_id(id).await?;

        self.work_orders.detach_vehicle(id).await?;
        for appointment in self
            .store
            .appointments
            .find_by("vehicle_id", FieldValue::Uuid(id))
            .await?
        {
            let patch = UpdateAppointmentRequest {
                clear_vehicle_id: true,
                ..Default::default()
            };
            self.store.appointments.update(appointment.id, patch).await?;
        }

        self.store.vehicles.delete(id).await?;
        tracing::info!("🗑️ Vehículo {} eliminado", vehicle.plate);
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let user = self.store.users.get_by_id(id).await?;

        let punches = self.store.punches.find_by("user_id", FieldValue::Uuid(id)).await?;
        for punch in &punches {
            self.store.punches.delete(punch.id).await?;
        }
        for request in self.store.vacations.find_by("user_id", FieldValue::Uuid(id)).await? {
            self.store.vacations.delete(request.id).await?;
        }
        for request in self
            .store
            .vacations
            .find_by("approver_id", FieldValue::Uuid(id))
            .await?
        {
            let patch = VacationPatch {
                clear_approver_id: true,
                ..Default::default()
            };
            self.store.vacations.update(request.id, patch).await?;
        }
        self.work_orders.detach_technician(id).await?;

        self.store.users.delete(id).await?;
        tracing::info!("🗑️ Usuario {} eliminado ({} fichajes borrados)", user.email, punches.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::models::appointment::CreateAppointmentRequest;
    use crate::models::auth::UserRole;
    use crate::models::client::CreateClientRequest;
    use crate::models::punch::{NewPunch, PunchKind};
    use crate::models::user::NewUser;
    use crate::models::vacation::NewVacationRequest;
    use crate::models::vehicle::CreateVehicleRequest;
    use crate::models::work_order::{CreateWorkOrderRequest, UpdateWorkOrderRequest};
    use crate::utils::errors::AppError;

    async fn seed_client(store: &Store) -> Uuid {
        store
            .clients
            .create(CreateClientRequest {
                name: "Autocares Ribera".to_string(),
                tax_id: "B12345678".to_string(),
                phone: None,
                email: None,
                address: None,
                primary_contact: None,
                notes: None,
                active: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_vehicle(store: &Store, client_id: Uuid) -> Uuid {
        store
            .vehicles
            .create(CreateVehicleRequest {
                client_id,
                plate: "4321KLM".to_string(),
                make: None,
                model: None,
                year: None,
                vin: None,
                notes: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_user(store: &Store, email: &str) -> Uuid {
        store
            .users
            .create(NewUser {
                email: email.to_string(),
                name: "Empleado".to_string(),
                role: UserRole::Technician,
                active: true,
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn order_for(client_id: Option<Uuid>, vehicle_id: Option<Uuid>) -> CreateWorkOrderRequest {
        CreateWorkOrderRequest {
            client_id,
            client_name: None,
            vehicle_id,
            technician_id: None,
            priority: None,
            description: "Revisión general".to_string(),
            estimated_hours: None,
        }
    }

    #[tokio::test]
    async fn test_delete_client_detaches_orders() {
        let store = Store::in_memory();
        let client_id = seed_client(&store).await;
        let vehicle_id = seed_vehicle(&store, client_id).await;
        let orders = WorkOrderService::new(store.clone());
        let order = orders.create(order_for(Some(client_id), Some(vehicle_id))).await.unwrap();
        store
            .appointments
            .create(CreateAppointmentRequest {
                client_id,
                vehicle_id: Some(vehicle_id),
                scheduled_at: Utc::now(),
                duration_minutes: 60,
                service_type: "ITV".to_string(),
                notes: None,
            })
            .await
            .unwrap();

        CascadeService::new(store.clone()).delete_client(client_id).await.unwrap();

        let detached = orders.get(order.id).await.unwrap();
        assert_eq!(detached.client_id, None);
        assert_eq!(detached.vehicle_id, None);
        assert_eq!(detached.client_name.as_deref(), Some("Autocares Ribera"));
        assert!(store.vehicles.get_all().await.unwrap().is_empty());
        assert!(store.appointments.get_all().await.unwrap().is_empty());

        // El parte sigue siendo editable
        let edit = UpdateWorkOrderRequest {
            description: Some("Revisión y cambio de filtros".to_string()),
            ..Default::default()
        };
        assert!(orders.update(order.id, edit).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_vehicle_detaches_orders_and_appointments() {
        let store = Store::in_memory();
        let client_id = seed_client(&store).await;
        let vehicle_id = seed_vehicle(&store, client_id).await;
        let orders = WorkOrderService::new(store.clone());
        let order = orders.create(order_for(Some(client_id), Some(vehicle_id))).await.unwrap();
        let appointment = store
            .appointments
            .create(CreateAppointmentRequest {
                client_id,
                vehicle_id: Some(vehicle_id),
                scheduled_at: Utc::now(),
                duration_minutes: 30,
                service_type: "Diagnosis".to_string(),
                notes: None,
            })
            .await
            .unwrap();

        CascadeService::new(store.clone()).delete_vehicle(vehicle_id).await.unwrap();

        let detached = orders.get(order.id).await.unwrap();
        assert_eq!(detached.vehicle_id, None);
        assert_eq!(detached.client_id, Some(client_id));
        let appointment = store.appointments.get_by_id(appointment.id).await.unwrap();
        assert_eq!(appointment.vehicle_id, None);
        assert!(matches!(
            store.vehicles.get_by_id(vehicle_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_removes_punches_and_requests() {
        let store = Store::in_memory();
        let technician = seed_user(&store, "tecnico@taller.es").await;
        let manager = seed_user(&store, "jefe@taller.es").await;
        let orders = WorkOrderService::new(store.clone());
        let mut create = order_for(None, None);
        create.client_name = Some("Particular".to_string());
        create.technician_id = Some(technician);
        let order = orders.create(create).await.unwrap();

        let day = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        for (kind, hour) in [(PunchKind::Entrance, 0), (PunchKind::Exit, 2)] {
            store
                .punches
                .create(NewPunch {
                    user_id: technician,
                    work_order_id: Some(order.id),
                    kind,
                    punched_at: day + chrono::Duration::hours(hour),
                })
                .await
                .unwrap();
        }
        let date = |d| NaiveDate::from_ymd_opt(2026, 8, d).unwrap();
        store
            .vacations
            .create(NewVacationRequest {
                user_id: technician,
                start_date: date(1),
                end_date: date(5),
                reason: None,
            })
            .await
            .unwrap();
        let approved = store
            .vacations
            .create(NewVacationRequest {
                user_id: manager,
                start_date: date(10),
                end_date: date(12),
                reason: None,
            })
            .await
            .unwrap();
        store
            .vacations
            .update(
                approved.id,
                VacationPatch {
                    approver_id: Some(technician),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        CascadeService::new(store.clone()).delete_user(technician).await.unwrap();

        assert!(store.punches.get_all().await.unwrap().is_empty());
        let remaining = store.vacations.get_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, manager);
        assert_eq!(remaining[0].approver_id, None);
        assert_eq!(orders.get(order.id).await.unwrap().technician_id, None);
        assert_eq!(orders.reconcile(order.id).await.unwrap().actual_hours, Some(0.0));
    }
}

//! Servicio de partes de trabajo
//!
//! Ciclo de vida: pending → in_progress → completed, y cancelled desde
//! pending o in_progress. Las horas reales salen siempre de conciliar los
//! fichajes del parte.

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::models::client::Client;
use crate::models::punch::{Punch, PunchKind};
use crate::models::work_order::{
    CreateWorkOrderRequest, NewWorkOrder, UpdateWorkOrderRequest, WorkOrder, WorkOrderPatch,
    WorkOrderStatus,
};
use crate::repositories::{FieldValue, Store};
use crate::services::punch_service::PunchService;
use crate::services::time_tracking::{self, PunchState};
use crate::utils::errors::{bad_request_error, AppError, AppResult};

/// Intentos al asignar número de parte si otro alta se adelanta
const ORDER_NUMBER_ATTEMPTS: usize = 3;

pub struct WorkOrderService {
    store: Store,
    punches: PunchService,
}

impl WorkOrderService {
    pub fn new(store: Store) -> Self {
        Self {
            punches: PunchService::new(store.clone()),
            store,
        }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<WorkOrder> {
        self.store.work_orders.get_by_id(id).await
    }

    /// Partes ordenados del más reciente al más antiguo
    pub async fn list(&self, technician_id: Option<Uuid>, client_id: Option<Uuid>) -> AppResult<Vec<WorkOrder>> {
        let mut orders = match technician_id {
            Some(technician_id) => {
                self.store
                    .work_orders
                    .find_by("technician_id", technician_id.into())
                    .await?
            }
            None => self.store.work_orders.get_all().await?,
        };

        if let Some(client_id) = client_id {
            orders.retain(|order| order.client_id == Some(client_id));
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Siguiente número libre del año: OT-<año>-<secuencia>
    pub async fn next_order_number(&self, year: i32) -> AppResult<String> {
        let last = self
            .store
            .work_orders
            .get_all()
            .await?
            .iter()
            .filter_map(|order| WorkOrder::sequence_for_year(&order.order_number, year))
            .max()
            .unwrap_or(0);

        Ok(WorkOrder::format_order_number(year, last + 1))
    }

    async fn check_references(
        &self,
        client_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        technician_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(client_id) = client_id {
            self.store.clients.get_by_id(client_id).await?;
        }
        if let Some(vehicle_id) = vehicle_id {
            let vehicle = self.store.vehicles.get_by_id(vehicle_id).await?;
            if client_id.is_some_and(|client_id| client_id != vehicle.client_id) {
                return Err(bad_request_error("El vehículo no pertenece al cliente indicado"));
            }
        }
        if let Some(technician_id) = technician_id {
            self.store.users.get_by_id(technician_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateWorkOrderRequest) -> AppResult<WorkOrder> {
        let client_name = request
            .client_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        if request.client_id.is_none() && client_name.is_none() {
            return Err(bad_request_error(
                "Indica un cliente registrado (client_id) o un nombre de cliente (client_name)",
            ));
        }

        self.check_references(request.client_id, request.vehicle_id, request.technician_id)
            .await?;

        let year = Utc::now().year();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let new = NewWorkOrder {
                order_number: self.next_order_number(year).await?,
                client_id: request.client_id,
                client_name: client_name.clone(),
                vehicle_id: request.vehicle_id,
                technician_id: request.technician_id,
                priority: request.priority.unwrap_or_default(),
                description: request.description.trim().to_string(),
                estimated_hours: request.estimated_hours,
            };

            match self.store.work_orders.create(new).await {
                Ok(order) => {
                    tracing::info!("📋 Parte {} creado ({})", order.order_number, order.id);
                    return Ok(order);
                }
                Err(AppError::Conflict(message)) if attempt < ORDER_NUMBER_ATTEMPTS => {
                    tracing::warn!("🔁 Número de parte ocupado, reintentando: {}", message);
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Actualiza los datos descriptivos; el estado no se toca aquí
    pub async fn update(&self, id: Uuid, request: UpdateWorkOrderRequest) -> AppResult<WorkOrder> {
        let order = self.get(id).await?;
        if order.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "El parte {} está {} y no admite cambios",
                order.order_number,
                order.status.as_str()
            )));
        }

        // El vehículo que quede en el parte debe ser del cliente que quede
        self.check_references(
            request.client_id.or(order.client_id),
            request.vehicle_id.or(order.vehicle_id),
            request.technician_id,
        )
        .await?;

        self.store.work_orders.update(id, request.into()).await
    }

    /// Aplica un parche a cada parte que apunta a `id` en `column`
    async fn detach(
        &self,
        column: &'static str,
        id: Uuid,
        patch_for: impl Fn(&WorkOrder) -> WorkOrderPatch,
    ) -> AppResult<usize> {
        let orders = self.store.work_orders.find_by(column, id.into()).await?;
        for order in &orders {
            self.store.work_orders.update(order.id, patch_for(order)).await?;
        }
        Ok(orders.len())
    }

    /// Desvincula los partes de un cliente que se va a borrar. El nombre
    /// del cliente se conserva como texto libre si el parte no tenía uno.
    pub async fn detach_client(&self, client: &Client) -> AppResult<usize> {
        self.detach("client_id", client.id, |order| WorkOrderPatch {
            clear_client_id: true,
            client_name: order.client_name.is_none().then(|| client.name.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn detach_vehicle(&self, vehicle_id: Uuid) -> AppResult<usize> {
        self.detach("vehicle_id", vehicle_id, |_| WorkOrderPatch {
            clear_vehicle_id: true,
            ..Default::default()
        })
        .await
    }

    pub async fn detach_technician(&self, user_id: Uuid) -> AppResult<usize> {
        self.detach("technician_id", user_id, |_| WorkOrderPatch {
            clear_technician_id: true,
            ..Default::default()
        })
        .await
    }

    /// Borra el parte junto con sus materiales y fichajes
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let order = self.get(id).await?;

        for material in self
            .store
            .materials
            .find_by("work_order_id", FieldValue::Uuid(id))
            .await?
        {
            self.store.materials.delete(material.id).await?;
        }
        for punch in self.punches.punches_for_work_order(id).await? {
            self.store.punches.delete(punch.id).await?;
        }

        self.store.work_orders.delete(id).await?;
        tracing::info!("🗑️ Parte {} eliminado", order.order_number);
        Ok(())
    }

    async fn transition(&self, order: &WorkOrder, next: WorkOrderStatus, mut patch: WorkOrderPatch) -> AppResult<WorkOrder> {
        if !order.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Transición no permitida para {}: {} → {}",
                order.order_number,
                order.status.as_str(),
                next.as_str()
            )));
        }

        patch.status = Some(next);
        let updated = self.store.work_orders.update(order.id, patch).await?;
        tracing::info!(
            "🔄 Parte {}: {} → {}",
            order.order_number,
            order.status.as_str(),
            next.as_str()
        );
        Ok(updated)
    }

    /// Empezar a trabajar: fichaje de entrada en el parte
    pub async fn start_work(&self, id: Uuid, user_id: Uuid) -> AppResult<(WorkOrder, Punch)> {
        let order = self.get(id).await?;
        if order.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "El parte {} ya está {}",
                order.order_number,
                order.status.as_str()
            )));
        }

        let now = Utc::now();
        let punch = self
            .punches
            .punch(user_id, Some(id), PunchKind::Entrance, now)
            .await?;

        let order = if order.status == WorkOrderStatus::Pending {
            let patch = WorkOrderPatch {
                started_at: Some(now),
                technician_id: order.technician_id.or(Some(user_id)),
                ..Default::default()
            };
            self.transition(&order, WorkOrderStatus::InProgress, patch).await?
        } else {
            order
        };

        Ok((order, punch))
    }

    /// Dejar de trabajar: fichaje de salida; el estado no cambia
    pub async fn stop_work(&self, id: Uuid, user_id: Uuid) -> AppResult<(WorkOrder, Punch)> {
        let order = self.get(id).await?;
        let punch = self
            .punches
            .punch(user_id, Some(id), PunchKind::Exit, Utc::now())
            .await?;
        Ok((order, punch))
    }

    /// Cerrar el parte: cierra entradas abiertas, concilia horas y completa
    pub async fn close(&self, id: Uuid, work_performed: &str) -> AppResult<WorkOrder> {
        let work_performed = work_performed.trim();
        if work_performed.is_empty() {
            return Err(bad_request_error("work_performed es obligatorio para cerrar el parte"));
        }

        let order = self.get(id).await?;
        if !order.status.can_transition_to(WorkOrderStatus::Completed) {
            return Err(AppError::Conflict(format!(
                "Solo se puede cerrar un parte en curso ({} está {})",
                order.order_number,
                order.status.as_str()
            )));
        }

        let now = Utc::now();
        let punches = self.punches.punches_for_work_order(id).await?;
        for (user_id, state) in time_tracking::open_state_by_user(&punches) {
            if let PunchState::ClockedIn(_) = state {
                self.punches
                    .punch(user_id, Some(id), PunchKind::Exit, now)
                    .await?;
                tracing::info!("⏹️ Entrada abierta de {} cerrada al cerrar {}", user_id, order.order_number);
            }
        }

        let punches = self.punches.punches_for_work_order(id).await?;
        let patch = WorkOrderPatch {
            work_performed: Some(work_performed.to_string()),
            completed_at: Some(now),
            actual_hours: Some(time_tracking::worked_hours(&punches)),
            ..Default::default()
        };
        self.transition(&order, WorkOrderStatus::Completed, patch).await
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<WorkOrder> {
        let order = self.get(id).await?;
        self.transition(&order, WorkOrderStatus::Cancelled, WorkOrderPatch::default())
            .await
    }

    /// Recalcular y guardar las horas reales a partir de los fichajes
    pub async fn reconcile(&self, id: Uuid) -> AppResult<WorkOrder> {
        self.get(id).await?;
        let punches = self.punches.punches_for_work_order(id).await?;
        let hours = time_tracking::worked_hours(&punches);

        let patch = WorkOrderPatch {
            actual_hours: Some(hours),
            ..Default::default()
        };
        let order = self.store.work_orders.update(id, patch).await?;
        tracing::debug!("🧮 Parte {} conciliado: {} h", order.order_number, hours);
        Ok(order)
    }

    pub async fn punches(&self, id: Uuid) -> AppResult<Vec<Punch>> {
        self.get(id).await?;
        let mut punches = self.punches.punches_for_work_order(id).await?;
        punches.sort_by_key(|punch| punch.punched_at);
        Ok(punches)
    }
}

//! Modelo de WorkOrder (parte de trabajo)
//!
//! Los partes pueden apuntar a un cliente registrado (`client_id`) o a uno
//! sin registrar mediante texto libre (`client_name`).

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// Estado del parte - mapea al ENUM work_order_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "work_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pending => "pending",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }

    /// pending → in_progress → completed; cancelled desde pending o in_progress
    pub fn can_transition_to(&self, next: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (InProgress, Completed) | (Pending, Cancelled) | (InProgress, Cancelled)
        )
    }
}

/// Prioridad del parte - mapea al ENUM work_order_priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "work_order_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// WorkOrder - mapea exactamente a la tabla work_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrder {
    pub id: Uuid,
    pub order_number: String,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub work_performed: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un parte
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 2, max = 200))]
    pub client_name: Option<String>,

    pub vehicle_id: Option<Uuid>,

    pub technician_id: Option<Uuid>,

    pub priority: Option<WorkOrderPriority>,

    #[validate(length(min = 3, max = 4000))]
    pub description: String,

    #[validate(range(min = 0.0, max = 1000.0))]
    pub estimated_hours: Option<f64>,
}

/// Request para actualizar los datos descriptivos de un parte.
/// El estado solo cambia a través del ciclo de vida.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorkOrderRequest {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 2, max = 200))]
    pub client_name: Option<String>,

    pub vehicle_id: Option<Uuid>,

    pub technician_id: Option<Uuid>,

    pub priority: Option<WorkOrderPriority>,

    #[validate(length(min = 3, max = 4000))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, max = 1000.0))]
    pub estimated_hours: Option<f64>,
}

/// Request para cerrar un parte
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CloseWorkOrderRequest {
    #[validate(length(min = 1, max = 4000))]
    pub work_performed: String,
}

/// Alta con número de parte ya asignado
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub order_number: String,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkOrderPatch {
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub priority: Option<WorkOrderPriority>,
    pub description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub status: Option<WorkOrderStatus>,
    pub work_performed: Option<String>,
    pub actual_hours: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Referencias que pasan a NULL (su registro se va a borrar)
    pub clear_client_id: bool,
    pub clear_vehicle_id: bool,
    pub clear_technician_id: bool,
}

impl From<UpdateWorkOrderRequest> for WorkOrderPatch {
    fn from(request: UpdateWorkOrderRequest) -> Self {
        Self {
            client_id: request.client_id,
            client_name: request.client_name,
            vehicle_id: request.vehicle_id,
            technician_id: request.technician_id,
            priority: request.priority,
            description: request.description,
            estimated_hours: request.estimated_hours,
            ..Default::default()
        }
    }
}

impl WorkOrder {
    /// Número de parte: OT-<año>-<secuencia de 4 dígitos>
    pub fn format_order_number(year: i32, sequence: u32) -> String {
        format!("OT-{}-{:04}", year, sequence)
    }

    /// Secuencia de un número de parte del año indicado
    pub fn sequence_for_year(order_number: &str, year: i32) -> Option<u32> {
        let prefix = format!("OT-{}-", year);
        order_number.strip_prefix(&prefix)?.parse().ok()
    }
}

impl Record for WorkOrder {
    type New = NewWorkOrder;
    type Patch = WorkOrderPatch;

    const TABLE: &'static str = "work_orders";
    const RESOURCE: &'static str = "Work order";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "order_number",
        "client_id",
        "client_name",
        "vehicle_id",
        "technician_id",
        "status",
        "priority",
        "description",
        "work_performed",
        "estimated_hours",
        "actual_hours",
        "started_at",
        "completed_at",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["technician_id", "client_id", "vehicle_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: NewWorkOrder, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: new.order_number,
            client_id: new.client_id,
            client_name: new.client_name,
            vehicle_id: new.vehicle_id,
            technician_id: new.technician_id,
            status: WorkOrderStatus::Pending,
            priority: new.priority,
            description: new.description,
            work_performed: None,
            estimated_hours: new.estimated_hours,
            actual_hours: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: WorkOrderPatch, now: DateTime<Utc>) {
        self.client_id = patch.client_id.or(self.client_id);
        self.client_name = patch.client_name.or(self.client_name.take());
        self.vehicle_id = patch.vehicle_id.or(self.vehicle_id);
        self.technician_id = patch.technician_id.or(self.technician_id);
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.estimated_hours = patch.estimated_hours.or(self.estimated_hours);
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.work_performed = patch.work_performed.or(self.work_performed.take());
        self.actual_hours = patch.actual_hours.or(self.actual_hours);
        self.started_at = patch.started_at.or(self.started_at);
        self.completed_at = patch.completed_at.or(self.completed_at);
        if patch.clear_client_id {
            self.client_id = None;
        }
        if patch.clear_vehicle_id {
            self.vehicle_id = None;
        }
        if patch.clear_technician_id {
            self.technician_id = None;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.order_number.clone())
            .bind(self.client_id)
            .bind(self.client_name.clone())
            .bind(self.vehicle_id)
            .bind(self.technician_id)
            .bind(self.status)
            .bind(self.priority)
            .bind(self.description.clone())
            .bind(self.work_performed.clone())
            .bind(self.estimated_hours)
            .bind(self.actual_hours)
            .bind(self.started_at)
            .bind(self.completed_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("order_number", self.order_number.clone())]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "technician_id" => Some(self.technician_id.into()),
            "client_id" => Some(self.client_id.into()),
            "vehicle_id" => Some(self.vehicle_id.into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkOrderStatus::*;

    #[test]
    fn test_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(InProgress));
    }

    #[test]
    fn test_order_number_sequence() {
        let number = WorkOrder::format_order_number(2026, 7);
        assert_eq!(number, "OT-2026-0007");
        assert_eq!(WorkOrder::sequence_for_year(&number, 2026), Some(7));
        assert_eq!(WorkOrder::sequence_for_year(&number, 2025), None);
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

// Filtros de GET /api/work-orders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderQuery {
    pub technician_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
}

// Filtros de GET /api/vehicles
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleQuery {
    pub client_id: Option<Uuid>,
}

// Filtros de GET /api/appointments
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQuery {
    pub client_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// Filtros de GET /api/vacations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacationQuery {
    pub user_id: Option<Uuid>,
}

// Parámetros de GET /api/reports/punches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PunchReportQuery {
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

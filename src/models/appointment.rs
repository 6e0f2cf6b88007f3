//! Modelo de Appointment (cita)
//!
//! El fin de la cita no se guarda: se deriva de `scheduled_at + duration_minutes`.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// Estado de la cita - mapea al ENUM appointment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

/// Appointment - mapea exactamente a la tabla appointments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub service_type: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Request para crear una cita
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    pub client_id: Uuid,

    pub vehicle_id: Option<Uuid>,

    pub scheduled_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,

    #[validate(length(min = 2, max = 100))]
    pub service_type: String,

    pub notes: Option<String>,
}

/// Request para actualizar una cita
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAppointmentRequest {
    pub vehicle_id: Option<Uuid>,

    pub scheduled_at: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<i32>,

    #[validate(length(min = 2, max = 100))]
    pub service_type: Option<String>,

    pub notes: Option<String>,

    pub status: Option<AppointmentStatus>,

    /// Solo uso interno: desvincula el vehículo antes de borrarlo
    #[serde(skip)]
    pub clear_vehicle_id: bool,
}

/// Response de cita con el fin calculado
#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub ends_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            ends_at: appointment.ends_at(),
            appointment,
        }
    }
}

impl Record for Appointment {
    type New = CreateAppointmentRequest;
    type Patch = UpdateAppointmentRequest;

    const TABLE: &'static str = "appointments";
    const RESOURCE: &'static str = "Appointment";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "vehicle_id",
        "scheduled_at",
        "duration_minutes",
        "service_type",
        "notes",
        "status",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["client_id", "vehicle_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: CreateAppointmentRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new.client_id,
            vehicle_id: new.vehicle_id,
            scheduled_at: new.scheduled_at,
            duration_minutes: new.duration_minutes,
            service_type: new.service_type,
            notes: new.notes,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateAppointmentRequest, now: DateTime<Utc>) {
        self.vehicle_id = patch.vehicle_id.or(self.vehicle_id);
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        self.notes = patch.notes.or(self.notes.take());
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.clear_vehicle_id {
            self.vehicle_id = None;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.client_id)
            .bind(self.vehicle_id)
            .bind(self.scheduled_at)
            .bind(self.duration_minutes)
            .bind(self.service_type.clone())
            .bind(self.notes.clone())
            .bind(self.status)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "client_id" => Some(FieldValue::Uuid(self.client_id)),
            "vehicle_id" => Some(self.vehicle_id.into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_is_start_plus_duration() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let appointment = Appointment::build(
            CreateAppointmentRequest {
                client_id: Uuid::new_v4(),
                vehicle_id: None,
                scheduled_at: start,
                duration_minutes: 90,
                service_type: "Revisión".to_string(),
                notes: None,
            },
            Uuid::new_v4(),
            Utc::now(),
        );

        assert_eq!(appointment.ends_at(), Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap());
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        let response = AppointmentResponse::from(appointment);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["duration_minutes"], 90);
        assert!(json["ends_at"].as_str().unwrap().starts_with("2026-03-02T11:00:00"));
    }
}

//! Modelo de VacationRequest (solicitud de vacaciones)

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// Estado de la solicitud - mapea al ENUM vacation_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vacation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

/// VacationRequest - mapea exactamente a la tabla vacation_requests.
/// Las fechas son inclusivas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VacationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: VacationStatus,
    pub approver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VacationRequest {
    /// Días naturales solicitados
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// Request para solicitar vacaciones
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVacationRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewVacationRequest {
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VacationPatch {
    pub status: Option<VacationStatus>,
    pub approver_id: Option<Uuid>,
    pub clear_approver_id: bool,
}

impl Record for VacationRequest {
    type New = NewVacationRequest;
    type Patch = VacationPatch;

    const TABLE: &'static str = "vacation_requests";
    const RESOURCE: &'static str = "Vacation request";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "start_date",
        "end_date",
        "reason",
        "status",
        "approver_id",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["user_id", "approver_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: NewVacationRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            reason: new.reason,
            status: VacationStatus::Pending,
            approver_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: VacationPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.approver_id = patch.approver_id.or(self.approver_id);
        if patch.clear_approver_id {
            self.approver_id = None;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.user_id)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.reason.clone())
            .bind(self.status)
            .bind(self.approver_id)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "user_id" => Some(FieldValue::Uuid(self.user_id)),
            "approver_id" => Some(self.approver_id.into()),
            _ => None,
        }
    }
}

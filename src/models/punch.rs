//! Modelo de Punch (fichaje)
//!
//! Un fichaje sin `work_order_id` es de presencia general; con él, se
//! imputa al parte de trabajo indicado.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// Tipo de fichaje - mapea al ENUM punch_kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "punch_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    Entrance,
    Exit,
}

impl PunchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PunchKind::Entrance => "entrance",
            PunchKind::Exit => "exit",
        }
    }
}

/// Punch - mapea exactamente a la tabla punches
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Punch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_order_id: Option<Uuid>,
    pub kind: PunchKind,
    pub punched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Punch {
    pub fn is_presence(&self) -> bool {
        self.work_order_id.is_none()
    }
}

/// Alta de fichaje; también es el cuerpo de las correcciones manuales
#[derive(Debug, Clone, Deserialize)]
pub struct NewPunch {
    pub user_id: Uuid,
    pub work_order_id: Option<Uuid>,
    pub kind: PunchKind,
    pub punched_at: DateTime<Utc>,
}

/// Corrección parcial de un fichaje
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePunchRequest {
    pub kind: Option<PunchKind>,
    pub punched_at: Option<DateTime<Utc>>,
    pub work_order_id: Option<Uuid>,
}

/// Filtros para el listado de fichajes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PunchFilters {
    pub user_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub presence_only: Option<bool>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl PunchFilters {
    pub fn matches(&self, punch: &Punch) -> bool {
        if self.user_id.is_some_and(|id| id != punch.user_id) {
            return false;
        }
        if self.work_order_id.is_some() && self.work_order_id != punch.work_order_id {
            return false;
        }
        if self.presence_only.unwrap_or(false) && !punch.is_presence() {
            return false;
        }
        if self.from.is_some_and(|from| punch.punched_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| punch.punched_at > to) {
            return false;
        }
        true
    }
}

impl Record for Punch {
    type New = NewPunch;
    type Patch = UpdatePunchRequest;

    const TABLE: &'static str = "punches";
    const RESOURCE: &'static str = "Punch";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "work_order_id",
        "kind",
        "punched_at",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["user_id", "work_order_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: NewPunch, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            work_order_id: new.work_order_id,
            kind: new.kind,
            punched_at: new.punched_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdatePunchRequest, now: DateTime<Utc>) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(punched_at) = patch.punched_at {
            self.punched_at = punched_at;
        }
        self.work_order_id = patch.work_order_id.or(self.work_order_id);
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.user_id)
            .bind(self.work_order_id)
            .bind(self.kind)
            .bind(self.punched_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "user_id" => Some(FieldValue::Uuid(self.user_id)),
            "work_order_id" => Some(self.work_order_id.into()),
            _ => None,
        }
    }
}

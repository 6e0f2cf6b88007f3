//! Material empleado en un parte de trabajo

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// MaterialUsed - mapea exactamente a la tabla materials_used
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaterialUsed {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub reference: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para añadir material a un parte
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 50))]
    pub reference: String,

    #[validate(length(min = 1, max = 300))]
    pub description: String,

    pub quantity: Decimal,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
}

/// Request para corregir una línea de material
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 300))]
    pub description: Option<String>,

    pub quantity: Option<Decimal>,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub work_order_id: Uuid,
    pub reference: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
}

impl Record for MaterialUsed {
    type New = NewMaterial;
    type Patch = UpdateMaterialRequest;

    const TABLE: &'static str = "materials_used";
    const RESOURCE: &'static str = "Material";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "work_order_id",
        "reference",
        "description",
        "quantity",
        "unit",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["work_order_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: NewMaterial, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            work_order_id: new.work_order_id,
            reference: new.reference,
            description: new.description,
            quantity: new.quantity,
            unit: new.unit,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateMaterialRequest, now: DateTime<Utc>) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.work_order_id)
            .bind(self.reference.clone())
            .bind(self.description.clone())
            .bind(self.quantity)
            .bind(self.unit.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "work_order_id" => Some(FieldValue::Uuid(self.work_order_id)),
            _ => None,
        }
    }
}

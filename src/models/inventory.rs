//! Modelo de InventoryItem
//!
//! Existencias del almacén del taller, identificadas por su referencia.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// InventoryItem - mapea exactamente a la tabla inventory_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub reference: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub min_stock: Decimal,
    pub location: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.active && self.quantity <= self.min_stock
    }
}

/// Request para dar de alta un artículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 50))]
    pub reference: String,

    #[validate(length(min = 1, max = 300))]
    pub description: String,

    pub quantity: Decimal,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,

    pub min_stock: Option<Decimal>,

    #[validate(length(max = 100))]
    pub location: Option<String>,
}

/// Request para actualizar un artículo (incluido el ajuste de stock)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 1, max = 300))]
    pub description: Option<String>,

    pub quantity: Option<Decimal>,

    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,

    pub min_stock: Option<Decimal>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub active: Option<bool>,
}

impl Record for InventoryItem {
    type New = CreateInventoryItemRequest;
    type Patch = UpdateInventoryItemRequest;

    const TABLE: &'static str = "inventory_items";
    const RESOURCE: &'static str = "Inventory item";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "reference",
        "description",
        "quantity",
        "unit",
        "min_stock",
        "location",
        "active",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["reference"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: CreateInventoryItemRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            reference: new.reference.trim().to_ascii_uppercase(),
            description: new.description,
            quantity: new.quantity,
            unit: new.unit.unwrap_or_else(|| "ud".to_string()),
            min_stock: new.min_stock.unwrap_or(Decimal::ZERO),
            location: new.location,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateInventoryItemRequest, now: DateTime<Utc>) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(min_stock) = patch.min_stock {
            self.min_stock = min_stock;
        }
        self.location = patch.location.or(self.location.take());
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.reference.clone())
            .bind(self.description.clone())
            .bind(self.quantity)
            .bind(self.unit.clone())
            .bind(self.min_stock)
            .bind(self.location.clone())
            .bind(self.active)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("reference", self.reference.clone())]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "reference" => Some(FieldValue::Text(self.reference.clone())),
            _ => None,
        }
    }
}

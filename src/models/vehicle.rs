//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Cada vehículo pertenece a un cliente.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub client_id: Uuid,

    #[validate(length(min = 4, max = 20))]
    pub plate: String,

    #[validate(length(min = 2, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(length(equal = 17))]
    pub vin: Option<String>,

    pub notes: Option<String>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 4, max = 20))]
    pub plate: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(length(equal = 17))]
    pub vin: Option<String>,

    pub notes: Option<String>,
}

/// Matrícula sin espacios ni guiones, en mayúsculas
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_ascii_uppercase()
}

impl Record for Vehicle {
    type New = CreateVehicleRequest;
    type Patch = UpdateVehicleRequest;

    const TABLE: &'static str = "vehicles";
    const RESOURCE: &'static str = "Vehicle";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "plate",
        "make",
        "model",
        "year",
        "vin",
        "notes",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["client_id", "plate"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: CreateVehicleRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: new.client_id,
            plate: normalize_plate(&new.plate),
            make: new.make,
            model: new.model,
            year: new.year,
            vin: new.vin,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateVehicleRequest, now: DateTime<Utc>) {
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(plate) = patch.plate {
            self.plate = normalize_plate(&plate);
        }
        self.make = patch.make.or(self.make.take());
        self.model = patch.model.or(self.model.take());
        self.year = patch.year.or(self.year);
        self.vin = patch.vin.or(self.vin.take());
        self.notes = patch.notes.or(self.notes.take());
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.client_id)
            .bind(self.plate.clone())
            .bind(self.make.clone())
            .bind(self.model.clone())
            .bind(self.year)
            .bind(self.vin.clone())
            .bind(self.notes.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("plate", self.plate.clone())]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "client_id" => Some(FieldValue::Uuid(self.client_id)),
            "plate" => Some(FieldValue::Text(self.plate.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("1234-bcd"), "1234BCD");
        assert_eq!(normalize_plate(" 1234 BCD "), "1234BCD");
    }
}

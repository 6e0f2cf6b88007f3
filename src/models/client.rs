//! Modelo de Client

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repositories::{FieldValue, PgQueryAs, Record};
use crate::utils::validation::TAX_ID_REGEX;

/// Client - mapea exactamente a la tabla clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub primary_contact: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(regex(path = "TAX_ID_REGEX", message = "CIF/NIF inválido"))]
    pub tax_id: String,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub primary_contact: Option<String>,

    pub notes: Option<String>,

    pub active: Option<bool>,
}

/// Request para actualizar un cliente existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,

    #[validate(regex(path = "TAX_ID_REGEX", message = "CIF/NIF inválido"))]
    pub tax_id: Option<String>,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub primary_contact: Option<String>,

    pub notes: Option<String>,

    pub active: Option<bool>,
}

impl CreateClientRequest {
    /// CIF en mayúsculas y sin espacios alrededor
    pub fn normalized(mut self) -> Self {
        self.tax_id = self.tax_id.trim().to_ascii_uppercase();
        self.name = self.name.trim().to_string();
        self
    }
}

impl UpdateClientRequest {
    pub fn normalized(mut self) -> Self {
        self.tax_id = self.tax_id.map(|t| t.trim().to_ascii_uppercase());
        self
    }
}

impl Record for Client {
    type New = CreateClientRequest;
    type Patch = UpdateClientRequest;

    const TABLE: &'static str = "clients";
    const RESOURCE: &'static str = "Client";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "tax_id",
        "phone",
        "email",
        "address",
        "primary_contact",
        "notes",
        "active",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["tax_id"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: CreateClientRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            tax_id: new.tax_id,
            phone: new.phone,
            email: new.email,
            address: new.address,
            primary_contact: new.primary_contact,
            notes: new.notes,
            active: new.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateClientRequest, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(tax_id) = patch.tax_id {
            self.tax_id = tax_id;
        }
        self.phone = patch.phone.or(self.phone.take());
        self.email = patch.email.or(self.email.take());
        self.address = patch.address.or(self.address.take());
        self.primary_contact = patch.primary_contact.or(self.primary_contact.take());
        self.notes = patch.notes.or(self.notes.take());
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.name.clone())
            .bind(self.tax_id.clone())
            .bind(self.phone.clone())
            .bind(self.email.clone())
            .bind(self.address.clone())
            .bind(self.primary_contact.clone())
            .bind(self.notes.clone())
            .bind(self.active)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("tax_id", self.tax_id.clone())]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "tax_id" => Some(FieldValue::Text(self.tax_id.clone())),
            _ => None,
        }
    }
}

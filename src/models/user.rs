//! Modelo de User
//!
//! Personal del taller. El hash de la contraseña nunca se serializa.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::auth::UserRole;
use crate::repositories::{FieldValue, PgQueryAs, Record};

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub active: bool,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 2, max = 100))]
    pub name: String,

    pub role: UserRole,

    #[validate(length(min = 8, max = 100))]
    pub password: String,

    pub active: Option<bool>,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    pub role: Option<UserRole>,

    pub active: Option<bool>,

    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,
}

/// Alta ya validada y con la contraseña cifrada
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub active: bool,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    pub password_hash: Option<String>,
}

impl Record for User {
    type New = NewUser;
    type Patch = UserPatch;

    const TABLE: &'static str = "users";
    const RESOURCE: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "name",
        "role",
        "active",
        "password_hash",
        "created_at",
        "updated_at",
    ];
    const FILTERABLE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(new: NewUser, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: new.email,
            name: new.name,
            role: new.role,
            active: new.active,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = now;
    }

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.id)
            .bind(self.email.clone())
            .bind(self.name.clone())
            .bind(self.role)
            .bind(self.active)
            .bind(self.password_hash.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone())]
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "email" => Some(FieldValue::Text(self.email.clone())),
            _ => None,
        }
    }
}

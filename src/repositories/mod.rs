//! Capa de acceso a datos
//!
//! Cada entidad se guarda a través de un `Repository<E>` con dos
//! implementaciones: memoria (`MemoryRepository`) y PostgreSQL
//! (`PgRepository`). El `Store` agrupa un repositorio por entidad y se
//! construye una sola vez al arrancar.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::models::{
    appointment::Appointment, client::Client, inventory::InventoryItem, material::MaterialUsed,
    punch::Punch, user::User, vacation::VacationRequest, vehicle::Vehicle,
    work_order::WorkOrder,
};
use crate::utils::errors::AppResult;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Consulta tipada de sqlx sobre la que cada entidad enlaza sus columnas
pub type PgQueryAs<'q, E> = sqlx::query::QueryAs<'q, Postgres, E, PgArguments>;

/// Valor de una columna filtrable
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Uuid(Uuid),
    Text(String),
    Null,
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<Option<Uuid>> for FieldValue {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Uuid)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Registro persistible: describe su tabla, cómo se construye a partir
/// de un alta y cómo se fusiona un parche parcial.
pub trait Record:
    Clone + Send + Sync + Unpin + Serialize + for<'r> FromRow<'r, PgRow> + 'static
{
    /// Datos de alta (sin id ni marcas de tiempo)
    type New: Send + 'static;
    /// Actualización parcial: los campos ausentes no se tocan
    type Patch: Send + 'static;

    const TABLE: &'static str;
    const RESOURCE: &'static str;
    /// Columnas en el orden en que `bind_columns` las enlaza; la primera es `id`
    const COLUMNS: &'static [&'static str];
    const FILTERABLE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;

    fn build(new: Self::New, id: Uuid, now: DateTime<Utc>) -> Self;

    /// Fusiona el parche y refresca `updated_at`
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;

    /// Pares (campo, valor) que deben ser únicos en la tabla
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Valor de una columna filtrable, `None` si la columna no lo es
    fn field(&self, _column: &str) -> Option<FieldValue> {
        None
    }
}

/// Interfaz de almacenamiento por entidad
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<E>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<E>;

    async fn create(&self, new: E::New) -> AppResult<E>;

    async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<E>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn find_by(&self, column: &'static str, value: FieldValue) -> AppResult<Vec<E>>;
}

/// Modo de almacenamiento elegido al construir el `Store`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    Postgres,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Memory => "memory",
            StorageMode::Postgres => "postgres",
        }
    }
}

/// Conjunto de repositorios de la aplicación
#[derive(Clone)]
pub struct Store {
    pub mode: StorageMode,
    pub users: Arc<dyn Repository<User>>,
    pub clients: Arc<dyn Repository<Client>>,
    pub vehicles: Arc<dyn Repository<Vehicle>>,
    pub work_orders: Arc<dyn Repository<WorkOrder>>,
    pub punches: Arc<dyn Repository<Punch>>,
    pub materials: Arc<dyn Repository<MaterialUsed>>,
    pub inventory: Arc<dyn Repository<InventoryItem>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub vacations: Arc<dyn Repository<VacationRequest>>,
}

impl Store {
    /// Almacén en memoria, sin persistencia entre reinicios
    pub fn in_memory() -> Self {
        Self {
            mode: StorageMode::Memory,
            users: Arc::new(MemoryRepository::<User>::new()),
            clients: Arc::new(MemoryRepository::<Client>::new()),
            vehicles: Arc::new(MemoryRepository::<Vehicle>::new()),
            work_orders: Arc::new(MemoryRepository::<WorkOrder>::new()),
            punches: Arc::new(MemoryRepository::<Punch>::new()),
            materials: Arc::new(MemoryRepository::<MaterialUsed>::new()),
            inventory: Arc::new(MemoryRepository::<InventoryItem>::new()),
            appointments: Arc::new(MemoryRepository::<Appointment>::new()),
            vacations: Arc::new(MemoryRepository::<VacationRequest>::new()),
        }
    }

    /// Almacén respaldado por PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            mode: StorageMode::Postgres,
            users: Arc::new(PgRepository::<User>::new(pool.clone())),
            clients: Arc::new(PgRepository::<Client>::new(pool.clone())),
            vehicles: Arc::new(PgRepository::<Vehicle>::new(pool.clone())),
            work_orders: Arc::new(PgRepository::<WorkOrder>::new(pool.clone())),
            punches: Arc::new(PgRepository::<Punch>::new(pool.clone())),
            materials: Arc::new(PgRepository::<MaterialUsed>::new(pool.clone())),
            inventory: Arc::new(PgRepository::<InventoryItem>::new(pool.clone())),
            appointments: Arc::new(PgRepository::<Appointment>::new(pool.clone())),
            vacations: Arc::new(PgRepository::<VacationRequest>::new(pool)),
        }
    }
}

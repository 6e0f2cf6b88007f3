//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod auth;
pub mod user;
pub mod client;
pub mod vehicle;
pub mod work_order;
pub mod punch;
pub mod material;
pub mod inventory;
pub mod appointment;
pub mod vacation;

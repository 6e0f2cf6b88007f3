//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL y la selección del almacén.

pub mod connection;

pub use connection::{build_store, DatabaseConnection};

//! Backend de gestión de taller
//!
//! Clientes, vehículos, partes de trabajo, fichajes, materiales, citas y
//! vacaciones sobre una API REST con axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool, aplica las migraciones y construye el
//! `Store` según el modo de almacenamiento configurado.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::{database::DatabaseConfig, environment::EnvironmentConfig};
use crate::repositories::Store;

/// Conexión activa a PostgreSQL
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abrir el pool y aplicar las migraciones pendientes
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🐘 Conectando a PostgreSQL en {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error conectando a la base de datos")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Error aplicando migraciones")?;

        info!("✅ Base de datos lista (migraciones aplicadas)");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Construir el almacén: PostgreSQL si hay `DATABASE_URL`, memoria en otro caso
pub async fn build_store(config: &EnvironmentConfig) -> Result<Store> {
    match DatabaseConfig::from_environment(config) {
        Some(db_config) => {
            let connection = DatabaseConnection::connect(&db_config).await?;
            Ok(Store::postgres(connection.pool().clone()))
        }
        None => {
            info!("🧪 DATABASE_URL no definido: usando almacén en memoria (sin persistencia)");
            Ok(Store::in_memory())
        }
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}

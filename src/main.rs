use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use workshop_management::config::environment::EnvironmentConfig;
use workshop_management::database::build_store;
use workshop_management::repositories::StorageMode;
use workshop_management::routes::create_app;
use workshop_management::services::AuthService;
use workshop_management::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    info!("🔧 Gestión de Taller - API REST");
    info!("================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);

    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error inicializando el almacén: {}", e);
            return Err(e);
        }
    };
    info!("💾 Almacén: {}", store.mode.as_str());
    if config.is_production() && store.mode == StorageMode::Memory {
        warn!("⚠️ Producción sin DATABASE_URL: los datos se perderán al reiniciar");
    }

    match AuthService::new(store.clone()).bootstrap_admin(&config).await {
        Ok(true) => info!("👤 Administrador inicial creado"),
        Ok(false) => {}
        Err(e) => warn!("⚠️ No se pudo crear el administrador inicial: {}", e),
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("👥 Usuarios: GET|POST /api/users, GET|PUT|DELETE /api/users/:id");
    info!("🏢 Clientes:");
    info!("   GET|POST /api/clients, GET|PUT|DELETE /api/clients/:id");
    info!("   GET  /api/clients/:id/vehicles - Vehículos del cliente");
    info!("   POST /api/clients/import - Importar CSV");
    info!("   GET  /api/clients/export - Exportar CSV");
    info!("🚗 Vehículos: GET|POST /api/vehicles, GET|PUT|DELETE /api/vehicles/:id");
    info!("🛠️ Partes de trabajo:");
    info!("   GET|POST /api/work-orders, GET|PUT|DELETE /api/work-orders/:id");
    info!("   POST /api/work-orders/:id/start|stop|close|cancel|reconcile");
    info!("   GET  /api/work-orders/:id/punches");
    info!("   GET|POST /api/work-orders/:id/materials, PUT|DELETE /api/materials/:id");
    info!("⏱️ Fichajes:");
    info!("   POST /api/punches/clock-in|clock-out, GET /api/punches/status");
    info!("   GET|POST /api/punches, PUT|DELETE /api/punches/:id");
    info!("📅 Citas: GET|POST /api/appointments, GET|PUT|DELETE /api/appointments/:id");
    info!("🏖️ Vacaciones: GET|POST /api/vacations, POST /api/vacations/:id/approve|reject");
    info!("📦 Inventario: GET|POST /api/inventory, GET /api/inventory/low-stock");
    info!("📊 Informes: GET /api/reports/punches");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

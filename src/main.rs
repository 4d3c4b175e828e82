use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use tour_planning::clients::kakao_client::KakaoLocalClient;
use tour_planning::clients::TourApiClient;
use tour_planning::config::environment::EnvironmentConfig;
use tour_planning::middleware::cors::cors_middleware;
use tour_planning::state::AppState;
use tour_planning::storage::JsonFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🧳 K-Tour Planner - asistente turístico");
    info!("=======================================");

    let config = EnvironmentConfig::default();

    // Almacenamiento clave-valor persistente
    let store = match JsonFileStore::new(config.data_dir.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("❌ Error preparando el directorio de datos: {}", e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };

    // Colaboradores externos de búsqueda
    let tour_client = Arc::new(TourApiClient::new(
        config.tour_api_base_url.clone(),
        config.tour_api_key.clone(),
        config.search_timeout_secs,
    ));
    let kakao_client = Arc::new(KakaoLocalClient::new(
        config.kakao_base_url.clone(),
        config.kakao_rest_api_key.clone(),
        config.search_timeout_secs,
    ));

    let app_state = AppState::new(config.clone(), store, tour_client, kakao_client);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api", tour_planning::api::create_api_router())
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📋 Planificador:");
    info!("   GET    /api/planner/trips - Listar viajes");
    info!("   POST   /api/planner/trips - Crear viaje");
    info!("   GET    /api/planner/trips/:id - Obtener viaje");
    info!("   DELETE /api/planner/trips/:id - Borrar viaje (con confirmación)");
    info!("   POST   /api/planner/trips/:id/activate - Activar viaje");
    info!("   GET    /api/planner/trips/:id/days/:day/route - Mapa de ruta del día");
    info!("   PUT    /api/planner/trips/:id/days/:day/memo - Memo del día");
    info!("   POST   /api/planner/trips/:id/days/:day/places/:entry/move - Reordenar");
    info!("   DELETE /api/planner/trips/:id/days/:day/places/:entry - Quitar lugar");
    info!("   GET    /api/planner/stats - Estadísticas");
    info!("🔍 Búsqueda y alta:");
    info!("   POST /api/search - Buscar lugares");
    info!("   POST /api/search/day - Seleccionar día destino");
    info!("   POST /api/search/add - Añadir al día");
    info!("   POST /api/search/leave - Salir del workflow");
    info!("🗺️ Mapa:");
    info!("   POST /api/map/ready - SDK cargado");
    info!("   POST /api/map/pan - Fin de arrastre");
    info!("   POST /api/map/category - Filtro de categoría");
    info!("   POST /api/map/query - Consulta de texto libre");
    info!("   POST /api/map/zoom - Zoom +/-");
    info!("   POST /api/map/select - Clic en marcador");
    info!("   GET  /api/map/markers - Estado de la superficie");
    info!("📍 Lugares:");
    info!("   GET /api/places/explore - Exploración por área");
    info!("   GET /api/places/:id/detail - Detalle");
    info!("❤️ Favoritos:");
    info!("   GET    /api/favorites - Listar");
    info!("   POST   /api/favorites/toggle - Toggle");
    info!("   DELETE /api/favorites/:id - Quitar");
    info!("🧭 Direcciones:");
    info!("   POST /api/directions - Abrir navegación externa");
    info!("   POST /api/directions/device-position - Reportar posición GPS");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                anyhow::Error::from(e)
            })
    });

    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "K-Tour Planner funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

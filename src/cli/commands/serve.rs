use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{Settings, initialize_app_state};
use crate::router::{create_router, with_metrics};

pub async fn serve(settings: Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("Emission forecast service starting up");
    debug!("Model path: {}", settings.model.path);
    debug!("Bind address: {}", settings.server.bind_address);

    // The model is loaded once here; a broken model stops startup.
    trace!("Initializing application state");
    let state = match initialize_app_state(&settings) {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    trace!("Creating application router");
    let mut app = create_router(state);
    if settings.metrics.enabled {
        app = with_metrics(app);
        debug!("Prometheus metrics enabled on /metrics");
    }
    debug!("Router created successfully");

    let bind_address = &settings.server.bind_address;
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Emission forecast running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}

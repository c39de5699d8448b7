//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{LogFormat, OrchestratorConfig};
use crate::health::HealthMonitor;
use crate::transport::{HttpTransport, OcrTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        OrchestratorConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        OrchestratorConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides win
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_health_check {
        config.health_check.enabled = false;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Shared HTTP transport for probes and OCR calls.
pub fn build_transport(
    config: &OrchestratorConfig,
) -> Result<Arc<dyn OcrTransport>, Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(Duration::from_secs(config.routing.connect_timeout_seconds))?;
    Ok(Arc::new(transport))
}

/// Wait for SIGINT or SIGTERM, then cancel background tasks.
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load, merge and validate configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting ocr-router");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Registry is fixed for the life of the process
    let registry = Arc::new(config.build_registry()?);
    for backend in registry.list() {
        tracing::info!(
            backend_id = %backend.id,
            url = %backend.base_url,
            family = %backend.family,
            "Registered backend"
        );
    }

    let transport = build_transport(&config)?;

    // 4. Health monitor owns the table; everyone else reads it
    let cancel_token = CancellationToken::new();
    let monitor = HealthMonitor::new(
        Arc::clone(&registry),
        config.health_check.clone(),
        Arc::clone(&transport),
    );
    let health = monitor.table();
    let health_handle = if config.health_check.enabled {
        tracing::info!("Starting health monitor");
        Some(monitor.start(cancel_token.clone()))
    } else {
        tracing::warn!("Health monitor disabled; every backend stays Unknown and routable");
        None
    };

    // 5. Build API router
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(
        Arc::clone(&registry),
        health,
        transport,
        Arc::clone(&config),
    ));
    let app = create_router(state);

    // 6. Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "ocr-router listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    // 7. Cleanup
    cancel_token.cancel();
    if let Some(handle) = health_handle {
        tracing::info!("Waiting for health monitor to stop");
        handle.await?;
    }

    tracing::info!("ocr-router stopped");
    Ok(())
}

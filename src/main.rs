use std::sync::Arc;

use campus_nexus::api::gemini_api::GeminiApi;
use campus_nexus::config::Config;
use campus_nexus::dataset::Dataset;
use campus_nexus::router::{NexusState, nexus_router};
use campus_nexus::service::fallback::FallbackPolicy;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        base_url = %cfg.gemini.base_url,
        proxy = %cfg.gemini.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        models = ?cfg.gemini.model_list,
        max_retry_delay_secs = cfg.gemini.max_retry_delay_secs,
        loglevel = %cfg.basic.loglevel,
    );

    // No partial availability: either both tables load or the process exits.
    let scholarships = Dataset::load("scholarships", &cfg.data.scholarships_path)?;
    let housing = Dataset::load("housing", &cfg.data.housing_path)?;

    let client = GeminiApi::build_client(&cfg.gemini)?;
    let gemini = GeminiApi::new(client, &cfg.gemini);
    let policy = FallbackPolicy::from_config(&cfg.gemini);

    let state = NexusState::new(scholarships, housing, Arc::new(gemini), policy);
    let app = nexus_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

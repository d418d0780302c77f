//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the intake REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). The workspace's main `intake-run` binary is the
//! deployment entry point.

use api_rest::{build_state, router, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the intake REST API server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000), serving form templates from the configured directory.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `INTAKE_TEMPLATE_DIR`: Template directory (default: "templates")
/// - `INTAKE_PATIENT_ID`: Optional fixed patient identity for the session
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("intake=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = build_state(&config).await?;

    tracing::info!("-- Starting intake REST API on {}", config.rest_addr);

    let listener = tokio::net::TcpListener::bind(&config.rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

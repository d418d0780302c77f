use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_state, router, ServiceConfig};

/// Main entry point for the intake application.
///
/// Loads form templates from disk and serves the intake REST API.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `INTAKE_TEMPLATE_DIR`: Directory of form template JSON files (default: "templates")
/// - `INTAKE_PATIENT_ID`: Optional fixed patient identity for the session
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = build_state(&config).await?;

    tracing::info!("++ Starting intake REST on {}", config.rest_addr);

    let listener = tokio::net::TcpListener::bind(&config.rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

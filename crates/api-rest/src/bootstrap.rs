//! Startup wiring for the intake REST service.
//!
//! Configuration comes from the environment, matching the deployment
//! conventions of the rest of the platform. The dev server runs entirely
//! on the in-memory stores; production wiring substitutes database-backed
//! implementations of the same traits.

use crate::navigator::StepNavigator;
use crate::routes::AppState;
use anyhow::Context;
use intake_store::{FixedIdentity, MemoryProgressStore, MemoryTemplateStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Service configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address for the REST listener (`INTAKE_REST_ADDR`).
    pub rest_addr: String,
    /// Directory of `*.json` form templates (`INTAKE_TEMPLATE_DIR`).
    pub template_dir: PathBuf,
    /// Optional fixed patient identity for the dev session
    /// (`INTAKE_PATIENT_ID`).
    pub patient_id: Option<i64>,
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let rest_addr =
            std::env::var("INTAKE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let template_dir = std::env::var("INTAKE_TEMPLATE_DIR")
            .unwrap_or_else(|_| "templates".into())
            .into();
        let patient_id = match std::env::var("INTAKE_PATIENT_ID") {
            Ok(raw) => Some(
                raw.parse::<i64>()
                    .with_context(|| format!("INTAKE_PATIENT_ID is not an integer: {raw}"))?,
            ),
            Err(_) => None,
        };
        Ok(Self {
            rest_addr,
            template_dir,
            patient_id,
        })
    }
}

/// Loads templates and assembles the shared application state.
pub async fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let templates = Arc::new(MemoryTemplateStore::new());
    let loaded = templates
        .load_dir(&config.template_dir)
        .await
        .with_context(|| {
            format!(
                "failed to load templates from {}",
                config.template_dir.display()
            )
        })?;
    tracing::info!(
        "-- Loaded {} form template(s) from {}",
        loaded,
        config.template_dir.display()
    );

    let progress = Arc::new(MemoryProgressStore::new());
    let identity = match config.patient_id {
        Some(patient_id) => {
            // The dev store has no external provisioning step, so link the
            // fixed patient to every loaded form up front.
            for code in templates.codes().await {
                progress.provision(patient_id, &code).await;
            }
            tracing::info!("-- Fixed session identity: patient {}", patient_id);
            FixedIdentity::patient(patient_id)
        }
        None => {
            tracing::info!("-- No session identity; progress will not persist");
            FixedIdentity::anonymous()
        }
    };

    let navigator = StepNavigator::new(templates, progress, Arc::new(identity));
    Ok(AppState {
        navigator: Arc::new(navigator),
    })
}

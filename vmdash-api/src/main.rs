use anyhow::Context;
use std::sync::Arc;

use vmdash_api::config::{database::create_pool, ConfigError, Settings};
use vmdash_api::repository::{PgVmRepository, UnconfiguredVmRepository, VmRepository};
use vmdash_api::routes::create_app;
use vmdash_api::setup::{maybe_seed_demo_vms, run_migrations};
use vmdash_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;

    let (repo, configured): (Arc<dyn VmRepository>, bool) = match settings.require_database_url() {
        Ok(url) => {
            let pool = create_pool(url, settings.max_connections)
                .context("invalid DATABASE_URL")?;

            // Source of truth is /sqlx-migrations at workspace root.
            if let Err(e) = run_migrations(&pool).await {
                tracing::warn!("Migrations not applied, datastore calls will fail until the database is reachable: {}", e);
            }

            let repo = PgVmRepository::new(pool);
            match maybe_seed_demo_vms(&repo, settings.auto_seed).await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Seeded {} demo VMs", n),
                Err(e) => tracing::warn!("AUTO_SEED_VMS failed: {}", e),
            }
            (Arc::new(repo), true)
        }
        Err(ConfigError::MissingDatabaseUrl) => {
            tracing::error!("DATABASE_URL environment variable is not set; VM endpoints will answer 503 until it is configured");
            (Arc::new(UnconfiguredVmRepository), false)
        }
        Err(e) => return Err(e.into()),
    };

    let app = create_app(AppState::new(repo, configured));

    tracing::info!("VM Dashboard API listening on {}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

//! # Server and Seeding CLI
//!
//! ```bash
//! icm serve --port 9090
//! DATABASE_URL=postgres://... icm seed
//! ```

use anyhow::{Context, Result};
use clap::Args;

use icm_api::{db, AppConfig};
use icm_catalog::seed_catalog;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen port. Overrides ICM_PORT.
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn apply(&self, config: &AppConfig) -> AppConfig {
        let mut config = config.clone();
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

pub async fn run_serve(args: &ServeArgs, config: &AppConfig) -> Result<u8> {
    icm_api::serve(args.apply(config)).await?;
    Ok(0)
}

/// Write the seed catalog into the configured database. Safe to rerun.
pub async fn run_seed(config: &AppConfig) -> Result<u8> {
    let Some(url) = config.database_url.as_deref() else {
        anyhow::bail!("seed requires DATABASE_URL");
    };
    let pool = db::init_pool(url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    let catalog = seed_catalog()?;
    let report = db::write_catalog(&pool, &catalog)
        .await
        .context("failed to write seed catalog")?;

    println!(
        "Seeded {} standards, {} clauses, {} new cross-references",
        report.standards, report.clauses, report.cross_references
    );
    Ok(0)
}

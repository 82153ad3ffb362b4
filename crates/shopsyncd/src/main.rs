// # shopsyncd - Contact Synchronization Daemon
//
// The shopsyncd daemon is a thin integration layer. It is responsible for:
// 1. Reading configuration from environment variables (and `.env`)
// 2. Initializing tracing and the tokio runtime
// 3. Wiring the admin panel source and the Shopware directory
// 4. Resolving destination reference ids at startup
// 5. Triggering the synchronization engine daily, or once with `--once`
//
// All synchronization logic lives in shopsync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Contact Source
// - `SHOPSYNC_ADMIN_URL`: Admin panel base URL
// - `SHOPSYNC_ADMIN_SECRET`: Value for the secretHeaderForAuth header
// - `SHOPSYNC_ZR_ALLOWLIST`: Comma-separated zr numbers eligible for ZR sync
//
// ### Destination
// - `SHOPSYNC_SHOPWARE_URL`: Shopware Admin API base URL
// - `SHOPSYNC_SHOPWARE_CLIENT_ID` / `SHOPSYNC_SHOPWARE_CLIENT_SECRET`:
//   OAuth2 client credentials
// - `SHOPSYNC_COUNTRY_API_URL`: Base URL for country reference lookups
//
// ### Reference ids (environment-specific, required)
// - `SHOPSYNC_SALUTATION_ID`, `SHOPSYNC_SALES_CHANNEL_ID`,
//   `SHOPSYNC_LANGUAGE_ID`, `SHOPSYNC_PAYMENT_METHOD_ID`
// - `SHOPSYNC_INDIVIDUAL_GROUP` / `SHOPSYNC_ORGANIZATION_GROUP`:
//   customer-group names (default "User-Kunden" / "ZR-Kunden")
// - `SHOPSYNC_EMAIL_DOMAIN`: domain for synthetic organization emails
//
// ### Schedule
// - `SHOPSYNC_SYNC_HOUR` / `SHOPSYNC_SYNC_MINUTE`: daily trigger, local
//   time (default 02:00)
// - `SHOPSYNC_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// ## Example
//
// ```bash
// export SHOPSYNC_ADMIN_URL=https://panel.example.com
// export SHOPSYNC_ADMIN_SECRET=...
// export SHOPSYNC_SHOPWARE_URL=https://shop.example.com
// export SHOPSYNC_SHOPWARE_CLIENT_ID=...
// export SHOPSYNC_SHOPWARE_CLIENT_SECRET=...
//
// shopsyncd --once
// ```

use anyhow::Result;
use chrono::Local;
use shopsync_core::config::{
    DestinationConfig, ReferenceConfig, ScheduleConfig, SourceConfig, SyncConfig,
};
use shopsync_core::model::ReferenceIds;
use shopsync_core::traits::CustomerDirectory;
use shopsync_core::SyncEngine;
use shopsync_shopware::ShopwareDirectory;
use shopsync_source_adminpanel::AdminPanelSource;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown / successful run
/// - 1: Configuration or startup error
/// - 2: Runtime error (failed synchronization in `--once` mode)
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Load configuration from environment variables.
///
/// Defaults are absence-tolerant (empty strings, default schedule);
/// `SyncConfig::validate()` decides what is actually required.
fn config_from_env() -> SyncConfig {
    SyncConfig {
        source: SourceConfig {
            base_url: env::var("SHOPSYNC_ADMIN_URL").unwrap_or_default(),
            secret: env::var("SHOPSYNC_ADMIN_SECRET").unwrap_or_default(),
            allowed_zr_numbers: split_list(&env::var("SHOPSYNC_ZR_ALLOWLIST").unwrap_or_default()),
        },
        destination: DestinationConfig {
            base_url: env::var("SHOPSYNC_SHOPWARE_URL").unwrap_or_default(),
            client_id: env::var("SHOPSYNC_SHOPWARE_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("SHOPSYNC_SHOPWARE_CLIENT_SECRET").unwrap_or_default(),
            country_api_url: env::var("SHOPSYNC_COUNTRY_API_URL").unwrap_or_default(),
        },
        references: ReferenceConfig {
            salutation_id: env::var("SHOPSYNC_SALUTATION_ID").unwrap_or_default(),
            sales_channel_id: env::var("SHOPSYNC_SALES_CHANNEL_ID").unwrap_or_default(),
            language_id: env::var("SHOPSYNC_LANGUAGE_ID").unwrap_or_default(),
            payment_method_id: env::var("SHOPSYNC_PAYMENT_METHOD_ID").unwrap_or_default(),
            individual_group: env::var("SHOPSYNC_INDIVIDUAL_GROUP")
                .unwrap_or_else(|_| "User-Kunden".to_string()),
            organization_group: env::var("SHOPSYNC_ORGANIZATION_GROUP")
                .unwrap_or_else(|_| "ZR-Kunden".to_string()),
            synthetic_email_domain: env::var("SHOPSYNC_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "einrichtungspartnerring.com".to_string()),
        },
        schedule: ScheduleConfig {
            hour: env::var("SHOPSYNC_SYNC_HOUR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            minute: env::var("SHOPSYNC_SYNC_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        },
    }
}

/// Split a comma-separated list, dropping empty entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Seconds from `now` until the next daily `hour:minute` trigger
fn seconds_until_next_trigger(now: chrono::NaiveDateTime, hour: u32, minute: u32) -> u64 {
    // hour/minute are range-checked by ScheduleConfig::validate
    let mut candidate = now.date().and_hms_opt(hour, minute, 0).unwrap_or(now);

    if candidate <= now {
        candidate += chrono::Duration::days(1);
    }

    (candidate - now).num_seconds().max(1) as u64
}

fn main() -> ExitCode {
    // Optional .env file; environment variables take precedence
    let _ = dotenvy::dotenv();

    let config = config_from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let log_level = match env::var("SHOPSYNC_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let run_once = env::args().any(|arg| arg == "--once");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if run_once {
            info!("Running sync once and exiting");
            match run_sync(&config).await {
                Ok(()) => SyncExitCode::CleanShutdown,
                Err(e) => {
                    error!("Sync failed: {}", e);
                    SyncExitCode::RuntimeError
                }
            }
        } else {
            run_scheduled(&config).await
        }
    });

    result.into()
}

/// Run the daily scheduler loop.
///
/// Runs are serialized by construction: the next trigger is armed only
/// after the current run has finished. A failed run is logged and the loop
/// waits for the next trigger.
async fn run_scheduled(config: &SyncConfig) -> SyncExitCode {
    info!(
        "Scheduling daily sync at {:02}:{:02}",
        config.schedule.hour, config.schedule.minute
    );

    loop {
        let secs = seconds_until_next_trigger(
            Local::now().naive_local(),
            config.schedule.hour,
            config.schedule.minute,
        );
        info!("Next sync in {}s", secs);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                if let Err(e) = run_sync(config).await {
                    error!("Sync failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping scheduler");
                return SyncExitCode::CleanShutdown;
            }
        }
    }
}

/// Perform one full synchronization run
async fn run_sync(config: &SyncConfig) -> Result<()> {
    info!("Initializing sync");

    let source = AdminPanelSource::from_config(&config.source)?;
    let directory = ShopwareDirectory::connect(&config.destination).await?;
    let refs = resolve_references(&directory, &config.references).await?;

    let engine = SyncEngine::new(Box::new(source), Box::new(directory), refs);
    let report = engine.run().await?;

    info!(
        "Sync completed successfully: {} users created, {} updated, {} failed",
        report.individuals.created, report.individuals.updated, report.individuals.failed
    );
    info!(
        "ZR sync completed successfully: {} ZR customers created, {} updated, {} failed",
        report.organizations.created, report.organizations.updated, report.organizations.failed
    );

    Ok(())
}

/// Resolve destination reference ids once at startup
async fn resolve_references(
    directory: &ShopwareDirectory,
    references: &ReferenceConfig,
) -> Result<ReferenceIds> {
    let individual_group = directory
        .resolve_customer_group(&references.individual_group)
        .await?;
    let organization_group = directory
        .resolve_customer_group(&references.organization_group)
        .await?;

    Ok(ReferenceIds {
        salutation_id: references.salutation_id.clone(),
        sales_channel_id: references.sales_channel_id.clone(),
        language_id: references.language_id.clone(),
        payment_method_id: references.payment_method_id.clone(),
        individual_group,
        organization_group,
        synthetic_email_domain: references.synthetic_email_domain.clone(),
    })
}

//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use channelsync_common::{Clock, SystemClock};
use channelsync_core::{ChannelSyncService, JobDispatcher, SyncPorts};
use channelsync_domain::{AppConfig, ChannelSyncError, Result};
use channelsync_infra::scheduling::{
    enqueue_active_channels, ChannelSchedulerConfig, ChannelSyncScheduler, TaskJobDispatcher,
};
use channelsync_infra::{
    Bootstrap, ChannelRegistry, DbManager, JsonSnapshotSource, SqliteCatalogAuditRepository,
    SqliteChannelConfigurationRepository, SqliteGlobalConfigurationRepository,
    SqliteLearnerAuditRepository,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: AppConfig,
    pub db: Arc<DbManager>,
    pub service: Arc<ChannelSyncService>,
    pub dispatcher: Arc<TaskJobDispatcher>,
    scheduler: Mutex<Option<ChannelSyncScheduler>>,
}

impl AppContext {
    /// Open the store, apply migrations, seed bootstrap data and wire the
    /// sync service.
    pub async fn new(config: AppConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;
        info!(path = %db.path().display(), "Database ready");

        let configurations = Arc::new(SqliteChannelConfigurationRepository::new(Arc::clone(&db)));
        let global_configurations = Arc::new(SqliteGlobalConfigurationRepository::new(Arc::clone(&db)));

        if let Some(path) = &config.bootstrap_path {
            let report = Bootstrap::load(Path::new(path))?
                .seed(global_configurations.as_ref(), configurations.as_ref())
                .await?;
            info!(
                path = %path,
                global_versions_added = report.global_versions_added,
                channels_saved = report.channels_saved,
                "Bootstrap configuration applied"
            );
        }

        let source = Arc::new(match &config.sources.snapshot_path {
            Some(path) => JsonSnapshotSource::new(path),
            None => {
                warn!("No snapshot path configured; every customer exports empty data");
                JsonSnapshotSource::empty()
            }
        });

        let ports = SyncPorts {
            configurations,
            global_configurations,
            learner_audits: Arc::new(SqliteLearnerAuditRepository::new(Arc::clone(&db))),
            catalog_audits: Arc::new(SqliteCatalogAuditRepository::new(Arc::clone(&db))),
            enrollments: source.clone(),
            catalog: source,
            binder: Arc::new(ChannelRegistry::with_defaults(&config.http, Arc::clone(&clock))),
        };

        let service = Arc::new(ChannelSyncService::new(ports, clock));
        let dispatcher = Arc::new(TaskJobDispatcher::new(
            Arc::clone(&service),
            Duration::from_secs(config.scheduler.job_timeout_seconds.max(1)),
        ));

        Ok(Self { config, db, service, dispatcher, scheduler: Mutex::new(None) })
    }

    /// Dispatch one round of jobs for every active channel and wait for them.
    pub async fn run_once(&self) -> Result<usize> {
        let submitted = enqueue_active_channels(
            &self.service,
            self.dispatcher.as_ref(),
            &self.config.scheduler.api_username,
        )
        .await?;
        self.dispatcher.drain().await;
        Ok(submitted)
    }

    /// Start the cron scheduler. Calling this twice is an error.
    pub async fn start_scheduler(&self) -> Result<()> {
        let mut slot = self.scheduler.lock().await;
        if slot.is_some() {
            return Err(ChannelSyncError::InvalidInput("scheduler already started".into()));
        }

        let mut scheduler = ChannelSyncScheduler::with_config(
            ChannelSchedulerConfig::from(&self.config.scheduler),
            Arc::clone(&self.service),
            Arc::clone(&self.dispatcher) as Arc<dyn JobDispatcher>,
        )
        .await?;
        scheduler.start().await?;

        *slot = Some(scheduler);
        Ok(())
    }

    /// Stop the scheduler if it runs, then wait for in-flight jobs.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(mut scheduler) = self.scheduler.lock().await.take() {
            scheduler.stop().await?;
        }

        let in_flight = self.dispatcher.in_flight();
        if in_flight > 0 {
            info!(in_flight, "Waiting for running sync jobs");
        }
        self.dispatcher.drain().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use channelsync_domain::{DatabaseConfig, SchedulerConfig, SourceConfig};
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    const CUSTOMER_UUID: &str = "3c0f6d5e-8f55-4d61-9a3b-4b4f3c0a2d10";

    fn write_bootstrap(dir: &TempDir) -> String {
        let path = dir.path().join("bootstrap.json");
        let bootstrap = json!({
            "global_configurations": [{
                "channel_code": "degreed",
                "completion_status_api_path": "/api/v1/provider/completion/course",
                "course_api_path": "/api/v1/provider/content/course",
                "oauth_api_path": "/oauth/token"
            }],
            "channels": [{
                "customer": { "uuid": CUSTOMER_UUID, "name": "Acme" },
                "credentials": {
                    "channel": "degreed",
                    "key": "client",
                    "secret": "secret",
                    "base_url": "http://127.0.0.1:9",
                    "company_id": "ACME",
                    "user_id": "svc",
                    "user_password": "pw"
                }
            }]
        });
        std::fs::write(&path, bootstrap.to_string()).unwrap();
        path.display().to_string()
    }

    fn config(dir: &TempDir, bootstrap_path: Option<String>) -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                path: dir.path().join("channelsync.db").display().to_string(),
                pool_size: 2,
            },
            scheduler: SchedulerConfig { enabled: false, ..SchedulerConfig::default() },
            http: Default::default(),
            logging: Default::default(),
            sources: SourceConfig::default(),
            bootstrap_path,
        }
    }

    fn count(ctx: &AppContext, table: &str) -> i64 {
        let conn = ctx.db.get_connection().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0)).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_seeds_configurations() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(config(&dir, Some(write_bootstrap(&dir)))).await.unwrap();

        let active = ctx.service.active_channels().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].customer.name, "Acme");
    }

    #[tokio::test]
    async fn run_once_with_empty_catalog_records_an_audit() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(config(&dir, Some(write_bootstrap(&dir)))).await.unwrap();

        let submitted = ctx.run_once().await.unwrap();

        assert_eq!(submitted, 2);
        assert_eq!(count(&ctx, "catalog_transmission_audits"), 1);
        assert_eq!(count(&ctx, "learner_data_transmission_audits"), 0);
    }

    #[tokio::test]
    async fn missing_bootstrap_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json").display().to_string();

        let err = AppContext::new(config(&dir, Some(missing))).await.err().unwrap();
        assert!(matches!(err, ChannelSyncError::Config(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn scheduler_starts_once_and_shuts_down() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(config(&dir, None)).await.unwrap();

        ctx.start_scheduler().await.unwrap();
        assert!(ctx.start_scheduler().await.is_err());
        ctx.shutdown().await.unwrap();
        ctx.shutdown().await.unwrap();
    }
}

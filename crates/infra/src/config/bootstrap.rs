//! Startup seed for channel configurations
//!
//! A bootstrap file lists global API settings per channel and the customer
//! bindings that use them. Seeding is idempotent: channel rows upsert on
//! (customer, channel) and a global version is only appended when its
//! settings differ from the current one.

use std::path::Path;

use channelsync_core::{ChannelConfigurationRepository, GlobalConfigurationRepository};
use channelsync_domain::{
    ChannelConfiguration, ChannelCredentials, ChannelSyncError, EnterpriseCustomer,
    GlobalChannelConfiguration, Result,
};
use serde::{Deserialize, Serialize};

/// Customer binding as written in a bootstrap file. Row ids are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSeed {
    pub customer: EnterpriseCustomer,
    #[serde(default = "default_active")]
    pub active: bool,
    pub credentials: ChannelCredentials,
}

const fn default_active() -> bool {
    true
}

impl ChannelSeed {
    fn to_configuration(&self) -> ChannelConfiguration {
        ChannelConfiguration {
            id: 0,
            customer: self.customer.clone(),
            active: self.active,
            credentials: self.credentials.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub global_configurations: Vec<GlobalChannelConfiguration>,
    #[serde(default)]
    pub channels: Vec<ChannelSeed>,
}

/// Counts of rows written by [`Bootstrap::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub global_versions_added: usize,
    pub channels_saved: usize,
}

impl Bootstrap {
    /// Read a JSON bootstrap file.
    ///
    /// # Errors
    /// `Config` when the file cannot be read, `InvalidInput` when it does not
    /// parse.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChannelSyncError::Config(format!(
                "Failed to read bootstrap file {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| ChannelSyncError::InvalidInput(format!("Invalid bootstrap file: {e}")))
    }

    pub async fn seed(
        &self,
        globals: &dyn GlobalConfigurationRepository,
        channels: &dyn ChannelConfigurationRepository,
    ) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for global in &self.global_configurations {
            let current = globals.current(global.channel_code).await?;
            if current.as_ref().is_some_and(|existing| same_settings(existing, global)) {
                tracing::debug!(channel = %global.channel_code, "Global configuration unchanged");
                continue;
            }
            globals.save(global).await?;
            report.global_versions_added += 1;
        }

        for seed in &self.channels {
            let config = seed.to_configuration();
            let id = channels.save(&config).await?;
            tracing::info!(
                channel = %config.channel_code(),
                customer = %config.customer.uuid,
                id,
                active = config.active,
                "Seeded channel configuration"
            );
            report.channels_saved += 1;
        }

        Ok(report)
    }
}

fn same_settings(a: &GlobalChannelConfiguration, b: &GlobalChannelConfiguration) -> bool {
    a.channel_code == b.channel_code
        && a.completion_status_api_path == b.completion_status_api_path
        && a.course_api_path == b.course_api_path
        && a.oauth_api_path == b.oauth_api_path
        && a.provider_id == b.provider_id
        && a.enabled == b.enabled
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const SEED: &str = r#"{
        "global_configurations": [{
            "channel_code": "degreed",
            "completion_status_api_path": "/api/v1/provider/completion/course",
            "course_api_path": "/api/v1/provider/content/course",
            "oauth_api_path": "/oauth/token"
        }],
        "channels": [{
            "customer": {
                "uuid": "8d4f1c52-0c4f-4b1c-9f6e-3f3c6f0a9b11",
                "name": "Acme"
            },
            "credentials": {
                "channel": "degreed",
                "key": "client",
                "secret": "shh",
                "base_url": "https://degreed.example",
                "company_id": "ACME",
                "user_id": "svc",
                "user_password": "pw"
            }
        }]
    }"#;

    #[test]
    fn load_parses_globals_and_channels() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let bootstrap = Bootstrap::load(file.path()).unwrap();

        assert_eq!(bootstrap.global_configurations.len(), 1);
        assert_eq!(bootstrap.channels.len(), 1);
        assert!(bootstrap.channels[0].active, "active defaults to true");
        assert_eq!(bootstrap.global_configurations[0].provider_id, "EDX");
    }

    #[test]
    fn load_rejects_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ \"channels\": [ { } ] }").unwrap();

        let err = Bootstrap::load(file.path()).unwrap_err();
        assert!(matches!(err, ChannelSyncError::InvalidInput(_)));
    }

    #[test]
    fn load_reports_missing_file_as_config_error() {
        let err = Bootstrap::load(Path::new("/nonexistent/bootstrap.json")).unwrap_err();
        assert!(matches!(err, ChannelSyncError::Config(_)));
    }
}

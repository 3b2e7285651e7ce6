use std::sync::{Arc, Once};

use channelsync_domain::{
    ChannelCode, ChannelConfiguration, ChannelCredentials, DegreedCredentials, EnterpriseCustomer,
    GlobalChannelConfiguration, SapSuccessFactorsCredentials,
};
use channelsync_infra::database::DbManager;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use uuid::Uuid;

pub const SAP_OAUTH_PATH: &str = "/learning/oauth-api/rest/v1/token";
pub const SAP_COMPLETION_PATH: &str = "/learning/odatav4/public/admin/ocn/v1/OcnLearningEvent";
pub const SAP_COURSE_PATH: &str = "/learning/odatav4/public/admin/ocn/v1/OcnCourses";
pub const DEGREED_OAUTH_PATH: &str = "/oauth/token";
pub const DEGREED_COMPLETION_PATH: &str = "/api/v1/provider/completion/course";
pub const DEGREED_COURSE_PATH: &str = "/api/v1/provider/content/course";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("channelsync.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Count rows in a table.
    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

static TRACING: Once = Once::new();

/// Route tracing output through the test harness (idempotent).
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("channelsync=debug,info")
            .with_test_writer()
            .try_init();
    });
}

pub fn customer() -> EnterpriseCustomer {
    EnterpriseCustomer {
        uuid: Uuid::parse_str("0f9c8a34-6a0e-4c55-b0b4-5d2d1b7a7e01").expect("static uuid"),
        name: "Acme Learning".to_string(),
    }
}

pub fn sap_configuration(base_url: &str) -> ChannelConfiguration {
    ChannelConfiguration {
        id: 0,
        customer: customer(),
        active: true,
        credentials: ChannelCredentials::SapSuccessFactors(SapSuccessFactorsCredentials {
            key: "sap-client".to_string(),
            secret: "sap-secret".to_string(),
            base_url: base_url.to_string(),
            company_id: "ACME".to_string(),
            user_id: "admin".to_string(),
            user_type: "admin".to_string(),
        }),
    }
}

pub fn degreed_configuration(base_url: &str) -> ChannelConfiguration {
    ChannelConfiguration {
        id: 0,
        customer: customer(),
        active: true,
        credentials: ChannelCredentials::Degreed(DegreedCredentials {
            key: "degreed-client".to_string(),
            secret: "degreed-secret".to_string(),
            base_url: base_url.to_string(),
            company_id: "ACME-ORG".to_string(),
            user_id: "svc-account".to_string(),
            user_password: "svc-password".to_string(),
        }),
    }
}

pub fn global_configuration(
    channel_code: ChannelCode,
    change_date: DateTime<Utc>,
) -> GlobalChannelConfiguration {
    let (oauth, completion, course) = match channel_code {
        ChannelCode::SapSuccessFactors => (SAP_OAUTH_PATH, SAP_COMPLETION_PATH, SAP_COURSE_PATH),
        ChannelCode::Degreed => (DEGREED_OAUTH_PATH, DEGREED_COMPLETION_PATH, DEGREED_COURSE_PATH),
    };

    GlobalChannelConfiguration {
        id: None,
        channel_code,
        completion_status_api_path: completion.to_string(),
        course_api_path: course.to_string(),
        oauth_api_path: oauth.to_string(),
        provider_id: "EDX".to_string(),
        enabled: true,
        change_date,
    }
}

pub fn token_body(token: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({ "access_token": token, "expires_in": expires_in })
}

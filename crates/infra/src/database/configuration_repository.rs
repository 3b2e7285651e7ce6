//! SQLite-backed channel and global configuration stores.

use std::sync::Arc;

use async_trait::async_trait;
use channelsync_core::{ChannelConfigurationRepository, GlobalConfigurationRepository};
use channelsync_domain::{
    ChannelCode, ChannelConfiguration, ChannelSyncError, EnterpriseCustomer,
    GlobalChannelConfiguration, Result,
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;

use super::manager::{DbManager, SqliteConnection};
use super::rows::{json, map_join_error, parsed, timestamp};
use crate::errors::to_domain;

const CHANNEL_COLUMNS: &str = "id, customer_uuid, customer_name, active, credentials_json";
const GLOBAL_COLUMNS: &str = "id, channel_code, completion_status_api_path, course_api_path, \
     oauth_api_path, provider_id, enabled, change_date";

pub struct SqliteChannelConfigurationRepository {
    db: Arc<DbManager>,
}

impl SqliteChannelConfigurationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChannelConfigurationRepository for SqliteChannelConfigurationRepository {
    async fn save(&self, config: &ChannelConfiguration) -> Result<i64> {
        let db = Arc::clone(&self.db);
        let config = config.clone();
        task::spawn_blocking(move || -> Result<i64> {
            let conn = db.get_connection()?;
            upsert_channel(&conn, &config)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find(&self, channel: ChannelCode, id: i64) -> Result<Option<ChannelConfiguration>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<ChannelConfiguration>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {CHANNEL_COLUMNS} FROM channel_configurations WHERE id = ?1 AND channel_code = ?2"
                ),
                params![id, channel.as_str()],
                map_channel_row,
            )
            .optional()
            .map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_active(&self) -> Result<Vec<ChannelConfiguration>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<ChannelConfiguration>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CHANNEL_COLUMNS} FROM channel_configurations WHERE active = 1 ORDER BY id"
                ))
                .map_err(to_domain)?;
            let rows = stmt.query_map([], map_channel_row).map_err(to_domain)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn upsert_channel(conn: &SqliteConnection, config: &ChannelConfiguration) -> Result<i64> {
    let credentials = serde_json::to_string(&config.credentials)
        .map_err(|e| ChannelSyncError::Internal(format!("failed to serialise credentials: {e}")))?;

    conn.query_row(
        "INSERT INTO channel_configurations
            (customer_uuid, customer_name, channel_code, active, credentials_json, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (customer_uuid, channel_code) DO UPDATE SET
            customer_name = excluded.customer_name,
            active = excluded.active,
            credentials_json = excluded.credentials_json,
            updated_at = excluded.updated_at
         RETURNING id",
        params![
            config.customer.uuid.to_string(),
            config.customer.name,
            config.channel_code().as_str(),
            config.active,
            credentials,
            Utc::now().timestamp_millis(),
        ],
        |row| row.get(0),
    )
    .map_err(to_domain)
}

fn map_channel_row(row: &Row<'_>) -> rusqlite::Result<ChannelConfiguration> {
    Ok(ChannelConfiguration {
        id: row.get(0)?,
        customer: EnterpriseCustomer { uuid: parsed(row, 1)?, name: row.get(2)? },
        active: row.get(3)?,
        credentials: json(row, 4)?,
    })
}

pub struct SqliteGlobalConfigurationRepository {
    db: Arc<DbManager>,
}

impl SqliteGlobalConfigurationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GlobalConfigurationRepository for SqliteGlobalConfigurationRepository {
    async fn save(&self, config: &GlobalChannelConfiguration) -> Result<i64> {
        let db = Arc::clone(&self.db);
        let config = config.clone();
        task::spawn_blocking(move || -> Result<i64> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO global_channel_configurations
                    (channel_code, completion_status_api_path, course_api_path, oauth_api_path,
                     provider_id, enabled, change_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    config.channel_code.as_str(),
                    config.completion_status_api_path,
                    config.course_api_path,
                    config.oauth_api_path,
                    config.provider_id,
                    config.enabled,
                    config.change_date.timestamp_millis(),
                ],
            )
            .map_err(to_domain)?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn current(&self, channel: ChannelCode) -> Result<Option<GlobalChannelConfiguration>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<GlobalChannelConfiguration>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {GLOBAL_COLUMNS} FROM global_channel_configurations
                     WHERE channel_code = ?1 ORDER BY change_date DESC, id DESC LIMIT 1"
                ),
                params![channel.as_str()],
                map_global_row,
            )
            .optional()
            .map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_global_row(row: &Row<'_>) -> rusqlite::Result<GlobalChannelConfiguration> {
    Ok(GlobalChannelConfiguration {
        id: Some(row.get(0)?),
        channel_code: parsed(row, 1)?,
        completion_status_api_path: row.get(2)?,
        course_api_path: row.get(3)?,
        oauth_api_path: row.get(4)?,
        provider_id: row.get(5)?,
        enabled: row.get(6)?,
        change_date: timestamp(row, 7)?,
    })
}

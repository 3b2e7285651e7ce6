//! SQLite-backed transmission audit stores.

use std::sync::Arc;

use async_trait::async_trait;
use channelsync_core::{CatalogAuditRepository, LearnerAuditRepository};
use channelsync_domain::{
    CatalogTransmissionAudit, ChannelCode, LearnerDataTransmissionAudit, Result,
};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::rows::{i64_to_usize, json, map_join_error, parsed, timestamp, usize_to_i64};
use crate::errors::to_domain;

const LEARNER_COLUMNS: &str = "id, channel_code, enterprise_course_enrollment_id, remote_user_id, \
     course_id, course_completed, completed_timestamp, grade, instructor_name, status, error_message, created";
const CATALOG_COLUMNS: &str = "id, enterprise_customer_uuid, channel_code, total_courses, status, \
     error_message, audit_summary, created";

pub struct SqliteLearnerAuditRepository {
    db: Arc<DbManager>,
}

impl SqliteLearnerAuditRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LearnerAuditRepository for SqliteLearnerAuditRepository {
    async fn create(&self, record: &LearnerDataTransmissionAudit) -> Result<i64> {
        let db = Arc::clone(&self.db);
        let record = record.clone();
        task::spawn_blocking(move || -> Result<i64> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO learner_data_transmission_audits
                    (channel_code, enterprise_course_enrollment_id, remote_user_id, course_id,
                     course_completed, completed_timestamp, grade, instructor_name, status,
                     error_message, created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.channel_code.as_str(),
                    record.enterprise_course_enrollment_id,
                    record.remote_user_id,
                    record.course_id,
                    record.course_completed,
                    record.completed_timestamp,
                    record.grade.as_str(),
                    record.instructor_name,
                    record.status,
                    record.error_message,
                    record.created.timestamp_millis(),
                ],
            )
            .map_err(to_domain)?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn has_successful_transmission(
        &self,
        channel: ChannelCode,
        enterprise_course_enrollment_id: i64,
    ) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM learner_data_transmission_audits
                    WHERE channel_code = ?1 AND enterprise_course_enrollment_id = ?2
                      AND error_message = ''
                 )",
                params![channel.as_str(), enterprise_course_enrollment_id],
                |row| row.get(0),
            )
            .map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_enrollment(
        &self,
        channel: ChannelCode,
        enterprise_course_enrollment_id: i64,
    ) -> Result<Vec<LearnerDataTransmissionAudit>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<LearnerDataTransmissionAudit>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {LEARNER_COLUMNS} FROM learner_data_transmission_audits
                     WHERE channel_code = ?1 AND enterprise_course_enrollment_id = ?2
                     ORDER BY created, id"
                ))
                .map_err(to_domain)?;
            let rows = stmt
                .query_map(params![channel.as_str(), enterprise_course_enrollment_id], map_learner_row)
                .map_err(to_domain)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_learner_row(row: &Row<'_>) -> rusqlite::Result<LearnerDataTransmissionAudit> {
    Ok(LearnerDataTransmissionAudit {
        id: Some(row.get(0)?),
        channel_code: parsed(row, 1)?,
        enterprise_course_enrollment_id: row.get(2)?,
        remote_user_id: row.get(3)?,
        course_id: row.get(4)?,
        course_completed: row.get(5)?,
        completed_timestamp: row.get(6)?,
        grade: parsed(row, 7)?,
        instructor_name: row.get(8)?,
        status: row.get(9)?,
        error_message: row.get(10)?,
        created: timestamp(row, 11)?,
    })
}

pub struct SqliteCatalogAuditRepository {
    db: Arc<DbManager>,
}

impl SqliteCatalogAuditRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogAuditRepository for SqliteCatalogAuditRepository {
    async fn create(&self, audit: &CatalogTransmissionAudit) -> Result<i64> {
        let db = Arc::clone(&self.db);
        let audit = audit.clone();
        task::spawn_blocking(move || -> Result<i64> {
            let summary = audit.audit_summary.to_json()?;
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO catalog_transmission_audits
                    (enterprise_customer_uuid, channel_code, total_courses, status, error_message,
                     audit_summary, created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    audit.enterprise_customer_uuid.to_string(),
                    audit.channel_code.as_str(),
                    usize_to_i64(audit.total_courses),
                    audit.status,
                    audit.error_message,
                    summary,
                    audit.created.timestamp_millis(),
                ],
            )
            .map_err(to_domain)?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn latest_successful(
        &self,
        customer_uuid: Uuid,
        channel: ChannelCode,
    ) -> Result<Option<CatalogTransmissionAudit>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<CatalogTransmissionAudit>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {CATALOG_COLUMNS} FROM catalog_transmission_audits
                     WHERE enterprise_customer_uuid = ?1 AND channel_code = ?2 AND error_message = ''
                     ORDER BY created DESC, id DESC LIMIT 1"
                ),
                params![customer_uuid.to_string(), channel.as_str()],
                map_catalog_row,
            )
            .optional()
            .map_err(to_domain)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_catalog_row(row: &Row<'_>) -> rusqlite::Result<CatalogTransmissionAudit> {
    Ok(CatalogTransmissionAudit {
        id: Some(row.get(0)?),
        enterprise_customer_uuid: parsed(row, 1)?,
        channel_code: parsed(row, 2)?,
        total_courses: i64_to_usize(row.get(3)?),
        status: row.get(4)?,
        error_message: row.get(5)?,
        audit_summary: json(row, 6)?,
        created: timestamp(row, 7)?,
    })
}

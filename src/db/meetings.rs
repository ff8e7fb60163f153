//! Meeting record persistence.
//!
//! CRUD operations for the `meetings` table. Raw SQL with rusqlite, no ORM.
//! Timestamps are stored as RFC 3339 UTC strings with microsecond precision
//! so lexical order matches chronological order; `rowid` breaks ties.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, ToSql};
use uuid::Uuid;

use crate::meeting::{MeetingFilter, MeetingPatch, MeetingRecord, MeetingStatus, NewMeeting};

const COLUMNS: &str = "id, provider_meeting_id, password, title, description, host_identity, \
                       status, scheduled_at, created_at, updated_at";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

/// Repository for meeting records.
pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a new record. Returns it with its generated id and timestamps.
    pub fn insert(conn: &Connection, meeting: &NewMeeting) -> Result<MeetingRecord> {
        let stamp = now();
        let record = MeetingRecord {
            id: Uuid::new_v4().to_string(),
            provider_meeting_id: meeting.provider_meeting_id.clone(),
            password: meeting.password.clone(),
            title: meeting.title.clone(),
            description: meeting.description.clone(),
            host_identity: meeting.host_identity.clone(),
            status: meeting.status,
            scheduled_at: meeting.scheduled_at.map(|at| at.trunc_subsecs(6)),
            created_at: stamp,
            updated_at: stamp,
        };

        conn.execute(
            &format!(
                "INSERT INTO meetings ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                COLUMNS
            ),
            params![
                record.id,
                record.provider_meeting_id,
                record.password,
                record.title,
                record.description,
                record.host_identity,
                record.status.as_str(),
                record.scheduled_at.map(timestamp),
                timestamp(record.created_at),
                timestamp(record.updated_at),
            ],
        )
        .context("Failed to insert meeting")?;

        Ok(record)
    }

    /// Get a meeting by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<MeetingRecord>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM meetings WHERE id = ?1", COLUMNS))
            .context("Failed to prepare meeting query")?;

        let mut rows = stmt
            .query_map(params![id], from_row)
            .context("Failed to query meeting")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Newest record for a provider meeting id.
    pub fn get_by_provider_meeting_id(
        conn: &Connection,
        provider_meeting_id: &str,
    ) -> Result<Option<MeetingRecord>> {
        let filter = MeetingFilter::for_provider_meeting(provider_meeting_id);
        Ok(Self::list(conn, &filter)?.into_iter().next())
    }

    /// List matching meetings, newest first.
    pub fn list(conn: &Connection, filter: &MeetingFilter) -> Result<Vec<MeetingRecord>> {
        let (where_sql, where_params) = where_clause(filter);
        let sql = format!(
            "SELECT {} FROM meetings{} {}",
            COLUMNS, where_sql, NEWEST_FIRST
        );

        let mut stmt = conn
            .prepare(&sql)
            .context("Failed to prepare meetings list query")?;

        let param_refs: Vec<&dyn ToSql> = where_params.iter().map(|p| p.as_ref()).collect();

        let meetings = stmt
            .query_map(param_refs.as_slice(), from_row)
            .context("Failed to list meetings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to map meetings")?;

        Ok(meetings)
    }

    /// Apply `patch` to every matching record. Returns the number of rows touched.
    pub fn update_where(
        conn: &Connection,
        filter: &MeetingFilter,
        patch: &MeetingPatch,
    ) -> Result<usize> {
        let (set_sql, mut all_params) = set_clause(patch);
        let (where_sql, where_params) = where_clause(filter);
        all_params.extend(where_params);

        let sql = format!("UPDATE meetings SET {}{}", set_sql, where_sql);
        let param_refs: Vec<&dyn ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let updated = conn
            .execute(&sql, param_refs.as_slice())
            .context("Failed to update meetings")?;

        Ok(updated)
    }

    /// Apply `patch` to one record. `None` when the id does not exist.
    pub fn update(
        conn: &Connection,
        id: &str,
        patch: &MeetingPatch,
    ) -> Result<Option<MeetingRecord>> {
        let (set_sql, mut all_params) = set_clause(patch);
        all_params.push(Box::new(id.to_string()));

        let sql = format!("UPDATE meetings SET {} WHERE id = ?", set_sql);
        let param_refs: Vec<&dyn ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let updated = conn
            .execute(&sql, param_refs.as_slice())
            .context("Failed to update meeting")?;

        if updated == 0 {
            return Ok(None);
        }
        Self::get(conn, id)
    }

    /// Returns false when there was nothing to delete.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let deleted = conn
            .execute("DELETE FROM meetings WHERE id = ?1", params![id])
            .context("Failed to delete meeting")?;
        Ok(deleted > 0)
    }
}

/// Current time at the precision the table stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<MeetingRecord> {
    let status: String = row.get(6)?;
    let scheduled_at: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(MeetingRecord {
        id: row.get(0)?,
        provider_meeting_id: row.get(1)?,
        password: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        host_identity: row.get(5)?,
        status: status
            .parse::<MeetingStatus>()
            .map_err(|e| conversion_error(6, e))?,
        scheduled_at: scheduled_at
            .as_deref()
            .map(|s| parse_timestamp(7, s))
            .transpose()?,
        created_at: parse_timestamp(8, &created_at)?,
        updated_at: parse_timestamp(9, &updated_at)?,
    })
}

fn where_clause(filter: &MeetingFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(status) = filter.status {
        conditions.push("status = ?");
        params.push(Box::new(status.as_str()));
    }

    if let Some(host) = &filter.host_identity {
        conditions.push("host_identity = ?");
        params.push(Box::new(host.clone()));
    }

    if let Some(provider_id) = &filter.provider_meeting_id {
        conditions.push("provider_meeting_id = ?");
        params.push(Box::new(provider_id.clone()));
    }

    if let Some(excluded) = &filter.exclude_provider_meeting_id {
        conditions.push("provider_meeting_id != ?");
        params.push(Box::new(excluded.clone()));
    }

    if let Some(excluded) = &filter.exclude_id {
        conditions.push("id != ?");
        params.push(Box::new(excluded.clone()));
    }

    if conditions.is_empty() {
        return (String::new(), params);
    }
    (format!(" WHERE {}", conditions.join(" AND ")), params)
}

/// `updated_at` is always bumped, so an empty patch just touches the row.
fn set_clause(patch: &MeetingPatch) -> (String, Vec<Box<dyn ToSql>>) {
    let mut assignments: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(title) = &patch.title {
        assignments.push("title = ?");
        params.push(Box::new(title.clone()));
    }
    if let Some(description) = &patch.description {
        assignments.push("description = ?");
        params.push(Box::new(description.clone()));
    }
    if let Some(password) = &patch.password {
        assignments.push("password = ?");
        params.push(Box::new(password.clone()));
    }
    if let Some(status) = patch.status {
        assignments.push("status = ?");
        params.push(Box::new(status.as_str()));
    }
    if let Some(scheduled_at) = patch.scheduled_at {
        assignments.push("scheduled_at = ?");
        params.push(Box::new(timestamp(scheduled_at)));
    }

    assignments.push("updated_at = ?");
    params.push(Box::new(timestamp(now())));

    (assignments.join(", "), params)
}

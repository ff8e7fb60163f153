//! Async store seam over the meetings table.
//!
//! The reconciler talks to `MeetingStore`; `SqliteMeetingStore` runs the
//! synchronous repository on the blocking pool behind a shared connection.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::init::{migrate, open_db};
use super::meetings::MeetingRepository;
use crate::meeting::{MeetingFilter, MeetingPatch, MeetingRecord, NewMeeting};

#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Matching records, newest created first.
    async fn list(&self, filter: &MeetingFilter) -> Result<Vec<MeetingRecord>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<MeetingRecord>>;

    async fn get_by_provider_meeting_id(
        &self,
        provider_meeting_id: &str,
    ) -> Result<Option<MeetingRecord>>;

    async fn create(&self, meeting: NewMeeting) -> Result<MeetingRecord>;

    /// Returns how many records were updated.
    async fn update_where(&self, filter: &MeetingFilter, patch: &MeetingPatch) -> Result<usize>;

    async fn update_by_id(&self, id: &str, patch: &MeetingPatch)
        -> Result<Option<MeetingRecord>>;

    /// Returns false when the record did not exist.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Clone)]
pub struct SqliteMeetingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMeetingStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self::from_connection(open_db(db_path)?))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        migrate(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| anyhow!("Meeting store connection poisoned"))?;
            op(&guard)
        })
        .await
        .context("Meeting store task failed")?
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn list(&self, filter: &MeetingFilter) -> Result<Vec<MeetingRecord>> {
        let filter = filter.clone();
        self.run(move |conn| MeetingRepository::list(conn, &filter))
            .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<MeetingRecord>> {
        let id = id.to_string();
        self.run(move |conn| MeetingRepository::get(conn, &id)).await
    }

    async fn get_by_provider_meeting_id(
        &self,
        provider_meeting_id: &str,
    ) -> Result<Option<MeetingRecord>> {
        let provider_meeting_id = provider_meeting_id.to_string();
        self.run(move |conn| {
            MeetingRepository::get_by_provider_meeting_id(conn, &provider_meeting_id)
        })
        .await
    }

    async fn create(&self, meeting: NewMeeting) -> Result<MeetingRecord> {
        self.run(move |conn| MeetingRepository::insert(conn, &meeting))
            .await
    }

    async fn update_where(&self, filter: &MeetingFilter, patch: &MeetingPatch) -> Result<usize> {
        let filter = filter.clone();
        let patch = patch.clone();
        self.run(move |conn| MeetingRepository::update_where(conn, &filter, &patch))
            .await
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: &MeetingPatch,
    ) -> Result<Option<MeetingRecord>> {
        let id = id.to_string();
        let patch = patch.clone();
        self.run(move |conn| MeetingRepository::update(conn, &id, &patch))
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.run(move |conn| MeetingRepository::delete(conn, &id))
            .await
    }
}

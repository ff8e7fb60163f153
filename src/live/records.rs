use tracing::info;

use super::MeetingService;
use crate::error::{MeetingError, MeetingResult};
use crate::meeting::{
    title::title_or_default, MeetingDraft, MeetingFilter, MeetingPatch, MeetingRecord,
    MeetingStatus, NewMeeting,
};

fn not_found(id: &str) -> MeetingError {
    MeetingError::NotFound(format!("Meeting {}", id))
}

impl MeetingService {
    pub async fn list_meetings(&self, filter: &MeetingFilter) -> MeetingResult<Vec<MeetingRecord>> {
        let store = self.require_store()?;
        store.list(filter).await.map_err(MeetingError::Store)
    }

    pub async fn get_meeting(&self, id: &str) -> MeetingResult<MeetingRecord> {
        let store = self.require_store()?;
        store
            .get_by_id(id)
            .await
            .map_err(MeetingError::Store)?
            .ok_or_else(|| not_found(id))
    }

    /// Record a meeting created outside a start action. Hosted by the caller.
    pub async fn create_meeting(
        &self,
        caller: &str,
        draft: MeetingDraft,
    ) -> MeetingResult<MeetingRecord> {
        self.require_admin(caller, "create meetings")?;
        let store = self.require_store()?;

        let provider_meeting_id = draft
            .provider_meeting_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                MeetingError::BadRequest("provider_meeting_id is required".to_string())
            })?;

        let meeting = NewMeeting {
            provider_meeting_id: provider_meeting_id.to_string(),
            password: draft.password,
            title: title_or_default(draft.title.as_deref(), &self.default_title),
            description: draft.description,
            host_identity: caller.trim().to_string(),
            status: MeetingStatus::Scheduled,
            scheduled_at: draft.scheduled_at,
        };

        let record = store.create(meeting).await.map_err(MeetingError::Store)?;
        info!(
            "Created meeting record {} for provider meeting {}",
            record.id, record.provider_meeting_id
        );
        Ok(record)
    }

    /// Apply a partial update. An ended record cannot be moved back to another status.
    pub async fn update_meeting(
        &self,
        caller: &str,
        id: &str,
        patch: MeetingPatch,
    ) -> MeetingResult<MeetingRecord> {
        self.require_admin(caller, "update meetings")?;
        let store = self.require_store()?;

        if patch.is_empty() {
            return Err(MeetingError::BadRequest("No fields to update".to_string()));
        }

        let existing = store
            .get_by_id(id)
            .await
            .map_err(MeetingError::Store)?
            .ok_or_else(|| not_found(id))?;

        if existing.status == MeetingStatus::Ended
            && patch.status.is_some_and(|s| s != MeetingStatus::Ended)
        {
            return Err(MeetingError::BadRequest(
                "Ended meetings cannot be reopened".to_string(),
            ));
        }

        let updated = store
            .update_by_id(id, &patch)
            .await
            .map_err(MeetingError::Store)?
            .ok_or_else(|| not_found(id))?;

        if patch.status == Some(MeetingStatus::Live) {
            self.end_records(
                store.as_ref(),
                &MeetingFilter::live_except_record(&updated.id),
                "superseded by update",
            )
            .await;
        }

        info!("Updated meeting record {}", id);
        Ok(updated)
    }

    pub async fn delete_meeting(&self, caller: &str, id: &str) -> MeetingResult<()> {
        self.require_admin(caller, "delete meetings")?;
        let store = self.require_store()?;

        if !store.delete(id).await.map_err(MeetingError::Store)? {
            return Err(not_found(id));
        }
        info!("Deleted meeting record {}", id);
        Ok(())
    }
}

use tracing::{debug, error, info};

use super::{MeetingService, StartedMeeting};
use crate::error::{MeetingError, MeetingResult};
use crate::meeting::{title::title_or_default, MeetingFilter, MeetingStatus, NewMeeting};
use crate::provider::ProviderStatus;

impl MeetingService {
    /// Start a fresh instant meeting, ending whatever was live first.
    pub async fn start_meeting(
        &self,
        caller: &str,
        title: Option<&str>,
    ) -> MeetingResult<StartedMeeting> {
        self.require_admin(caller, "start meetings")?;

        let ended = self.provider.end_all_live().await?;
        if ended > 0 {
            info!("Ended {} live meeting(s) before starting a new one", ended);
        }
        if let Some(store) = &self.store {
            self.end_records(store.as_ref(), &MeetingFilter::live(), "starting new meeting")
                .await;
        }

        let title = title_or_default(title, &self.default_title);
        let meeting = self.provider.create_instant_meeting(&title).await?;
        info!("Started meeting {} ({:?}) for {}", meeting.id, title, caller);

        let mut record_id = None;
        if let Some(store) = &self.store {
            let record = NewMeeting::new(&meeting.id, &title, caller)
                .with_status(MeetingStatus::Live)
                .with_password(Some(meeting.password.clone()));
            match store.create(record).await {
                Ok(record) => record_id = Some(record.id),
                Err(e) => error!("Failed to record started meeting {}: {:#}", meeting.id, e),
            }
        }

        Ok(StartedMeeting {
            id: record_id.unwrap_or_else(|| meeting.id.clone()),
            meeting_number: meeting.id,
            password: meeting.password,
            join_url: meeting.join_url,
            start_url: meeting.start_url,
            title,
        })
    }

    /// End a meeting at the provider. Ending an unknown or already ended meeting succeeds.
    pub async fn end_meeting(&self, caller: &str, meeting_id: &str) -> MeetingResult<()> {
        self.require_admin(caller, "end meetings")?;

        let meeting_id = meeting_id.trim();
        if meeting_id.is_empty() {
            return Err(MeetingError::BadRequest("Meeting ID is required".to_string()));
        }

        self.provider.end_meeting(meeting_id).await?;
        info!("Ended meeting {} for {}", meeting_id, caller);

        if let Some(store) = &self.store {
            let filter = MeetingFilter::for_provider_meeting(meeting_id);
            self.end_records(store.as_ref(), &filter, "meeting ended").await;
        } else {
            debug!(
                "No meeting store, meeting {} ended at provider only",
                meeting_id
            );
        }
        Ok(())
    }

    pub async fn meeting_status(
        &self,
        meeting_id: &str,
    ) -> MeetingResult<ProviderStatus> {
        let meeting_id = meeting_id.trim();
        if meeting_id.is_empty() {
            return Err(MeetingError::BadRequest("Meeting ID is required".to_string()));
        }
        self.provider.meeting_status(meeting_id).await
    }
}

use chrono::Utc;
use tracing::{debug, error, info};

use super::{LiveMeeting, LiveStatus, MeetingService};
use crate::db::MeetingStore;
use crate::error::MeetingResult;
use crate::meeting::{
    title::title_or_default, MeetingFilter, MeetingPatch, MeetingRecord, MeetingStatus,
    NewMeeting, PLACEHOLDER_HOST,
};
use crate::provider::ProviderMeetingSnapshot;

impl MeetingService {
    /// Decide what is live and bring the store in line with the provider.
    ///
    /// A recently confirmed live record is answered straight from the store so
    /// viewer polling does not hit the provider. Otherwise the provider decides:
    /// nothing live ends every live record, a live meeting becomes the single
    /// live record and supersedes the rest. Provider failures propagate; store
    /// failures only cost bookkeeping.
    pub async fn query_live(&self) -> MeetingResult<LiveStatus> {
        if let Some(store) = &self.store {
            if let Some(record) = self.trusted_live_record(store.as_ref()).await {
                debug!(
                    "Serving live meeting {} from store",
                    record.provider_meeting_id
                );
                return Ok(LiveStatus::live(LiveMeeting::from_record(&record)));
            }
        }

        let snapshot = self.provider.live_meeting().await?;

        let Some(store) = &self.store else {
            return Ok(match snapshot {
                Some(snapshot) => LiveStatus::live(LiveMeeting::from_snapshot(&snapshot)),
                None => LiveStatus::idle(),
            });
        };

        match snapshot {
            None => {
                let reason = "provider reports nothing live";
                self.end_records(store.as_ref(), &MeetingFilter::live(), reason)
                    .await;
                Ok(LiveStatus::idle())
            }
            Some(snapshot) => Ok(LiveStatus::live(
                self.adopt(store.as_ref(), &snapshot).await,
            )),
        }
    }

    /// Newest live record, if it was confirmed inside the trust window.
    async fn trusted_live_record(&self, store: &dyn MeetingStore) -> Option<MeetingRecord> {
        let records = match store.list(&MeetingFilter::live()).await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to read live meetings from store: {:#}", e);
                return None;
            }
        };

        let newest = records.into_iter().next()?;

        // A negative age means clock skew; treat it as just confirmed
        let trusted = (Utc::now() - newest.updated_at)
            .to_std()
            .map(|age| age < self.store_trust)
            .unwrap_or(true);

        if !trusted {
            debug!(
                "Stored live meeting {} is stale, asking provider",
                newest.provider_meeting_id
            );
            return None;
        }
        Some(newest)
    }

    /// Make the provider's live meeting the single live record.
    async fn adopt(
        &self,
        store: &dyn MeetingStore,
        snapshot: &ProviderMeetingSnapshot,
    ) -> LiveMeeting {
        let existing = match store.get_by_provider_meeting_id(&snapshot.id).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(
                    "Failed to look up meeting {} in store: {:#}",
                    snapshot.id, e
                );
                let others = MeetingFilter::live_except(&snapshot.id);
                self.end_records(store, &others, "superseded").await;
                return LiveMeeting::from_snapshot(snapshot);
            }
        };

        let record = match existing {
            Some(record) if record.status != MeetingStatus::Ended => {
                self.confirm_live(store, record).await
            }
            previous => self.open_live_record(store, snapshot, previous).await,
        };

        match record {
            Some(record) => {
                let others = MeetingFilter::live_except_record(&record.id);
                self.end_records(store, &others, "superseded").await;
                LiveMeeting::merged(&record, snapshot)
            }
            None => {
                let others = MeetingFilter::live_except(&snapshot.id);
                self.end_records(store, &others, "superseded").await;
                LiveMeeting::from_snapshot(snapshot)
            }
        }
    }

    /// Promote to live, or just refresh the confirmation time when already live.
    async fn confirm_live(
        &self,
        store: &dyn MeetingStore,
        record: MeetingRecord,
    ) -> Option<MeetingRecord> {
        if record.status != MeetingStatus::Live {
            info!(
                "Meeting {} started at provider, marking live",
                record.provider_meeting_id
            );
        }

        match store
            .update_by_id(&record.id, &MeetingPatch::status(MeetingStatus::Live))
            .await
        {
            Ok(Some(updated)) => Some(updated),
            // Deleted between lookup and update
            Ok(None) => None,
            Err(e) => {
                error!(
                    "Failed to mark meeting {} live: {:#}",
                    record.provider_meeting_id, e
                );
                Some(record)
            }
        }
    }

    /// New live record for a meeting the store has no open record of.
    ///
    /// An ended record is never revived; a restarted meeting gets a fresh
    /// record that carries over the ended one's details.
    async fn open_live_record(
        &self,
        store: &dyn MeetingStore,
        snapshot: &ProviderMeetingSnapshot,
        previous: Option<MeetingRecord>,
    ) -> Option<MeetingRecord> {
        let meeting = match previous {
            Some(ended) => NewMeeting {
                provider_meeting_id: snapshot.id.clone(),
                password: ended.password.or_else(|| snapshot.password.clone()),
                title: ended.title,
                description: ended.description,
                host_identity: ended.host_identity,
                status: MeetingStatus::Live,
                scheduled_at: None,
            },
            None => NewMeeting::new(
                &snapshot.id,
                title_or_default(Some(&snapshot.topic), &self.default_title),
                PLACEHOLDER_HOST,
            )
            .with_status(MeetingStatus::Live)
            .with_password(snapshot.password.clone()),
        };

        match store.create(meeting).await {
            Ok(record) => {
                info!(
                    "Recorded live meeting {} discovered at provider",
                    snapshot.id
                );
                Some(record)
            }
            Err(e) => {
                error!("Failed to record live meeting {}: {:#}", snapshot.id, e);
                None
            }
        }
    }
}

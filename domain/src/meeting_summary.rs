//! Generating and looking up meeting summaries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Error;
use crate::meeting::MeetingDetails;
use crate::prompt::format_transcription;
use crate::query::SummaryQuery;
use crate::summary_store::SummaryStore;
use crate::{CompletionProvider, CompletionResult, Id};

/// A generated summary for one meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MeetingSummary {
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    pub meeting_id: String,
    pub meeting_title: String,
    /// Text of the first completion choice, absent when the provider returned none.
    pub summary: Option<String>,
    /// Model reported by the provider.
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MeetingSummary {
    fn from_completion(details: &MeetingDetails, result: &CompletionResult) -> Self {
        MeetingSummary {
            id: Id::new_v4(),
            meeting_id: details.meeting_id.clone(),
            meeting_title: details.meeting_title.clone(),
            summary: result.first_choice_content().map(str::to_string),
            model: result.model().map(str::to_string),
            created_at: Utc::now(),
        }
    }
}

/// Turns meeting transcripts into summaries.
///
/// Holds no per-meeting state: every call formats a fresh prompt and sends one request.
/// When no store is wired, summaries are returned but not retained and lookups report
/// `NotImplemented`.
pub struct MeetingSummaryService {
    provider: Arc<dyn CompletionProvider>,
    store: Option<Arc<dyn SummaryStore>>,
}

impl MeetingSummaryService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        store: Option<Arc<dyn SummaryStore>>,
    ) -> Self {
        Self { provider, store }
    }

    pub async fn generate(&self, details: MeetingDetails) -> Result<MeetingSummary, Error> {
        debug!(
            "Generating summary for meeting {} with {} transcript entries",
            details.meeting_id,
            details.entries.len()
        );

        let prompt = format_transcription(&details);
        let result = self.provider.complete(&prompt).await.map_err(|e| {
            warn!(
                "Completion failed ({}) for meeting {}: {}",
                e.kind(),
                details.meeting_id,
                e
            );
            Error::from(e)
        })?;

        let summary = MeetingSummary::from_completion(&details, &result);
        if summary.summary.is_none() {
            warn!(
                "Completion for meeting {} carried no choice content",
                details.meeting_id
            );
        }

        match &self.store {
            Some(store) => store.insert(summary).await,
            None => Ok(summary),
        }
    }

    pub async fn find_all(&self, query: &SummaryQuery) -> Result<Vec<MeetingSummary>, Error> {
        self.store("Listing meeting summaries")?
            .find(query)
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> Result<MeetingSummary, Error> {
        self.store("Reading a meeting summary")?
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                debug!("Meeting summary {id} not found");
                Error::not_found()
            })
    }

    fn store(&self, operation: &str) -> Result<&Arc<dyn SummaryStore>, Error> {
        self.store.as_ref().ok_or_else(|| {
            warn!("{operation} requested while summary retention is disabled");
            Error::not_implemented(operation)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, ExternalErrorKind, InternalErrorKind};
    use crate::meeting::TranscriptEntry;
    use crate::summary_store::InMemorySummaryStore;
    use async_trait::async_trait;
    use meeting_ai::Error as CompletionError;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Provider {}

        #[async_trait]
        impl CompletionProvider for Provider {
            async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError>;
        }
    }

    fn details() -> MeetingDetails {
        MeetingDetails {
            meeting_id: "m-1".to_string(),
            meeting_title: "Planning".to_string(),
            entries: vec![
                TranscriptEntry::new("Ana", "00:01", "Ship on Friday."),
                TranscriptEntry::new("Ben", "00:02", "Agreed."),
            ],
        }
    }

    fn completion(value: serde_json::Value) -> CompletionResult {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_formatted_prompt_and_extracts_summary() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|prompt: &str| {
                prompt
                    == "Meeting Transcription: Planning\n\
                        \"Ana\",\"00:01\"\n\"Ship on Friday.\"\n\
                        \"Ben\",\"00:02\"\n\"Agreed.\"\n"
            })
            .times(1)
            .returning(|_| {
                Ok(completion(json!({
                    "model": "m",
                    "choices": [{"message": {"role": "assistant", "content": "Release Friday."}}]
                })))
            });

        let service = MeetingSummaryService::new(Arc::new(provider), None);
        let summary = service.generate(details()).await.unwrap();

        assert_eq!(summary.meeting_id, "m-1");
        assert_eq!(summary.meeting_title, "Planning");
        assert_eq!(summary.summary.as_deref(), Some("Release Friday."));
        assert_eq!(summary.model.as_deref(), Some("m"));
    }

    #[tokio::test]
    async fn test_generate_tolerates_results_without_choices() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Ok(completion(json!({"object": "chat.completion"}))));

        let service = MeetingSummaryService::new(Arc::new(provider), None);
        let summary = service.generate(details()).await.unwrap();
        assert_eq!(summary.summary, None);
        assert_eq!(summary.model, None);
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_errors() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| {
            Err(CompletionError::Status {
                status: 429,
                body: "rate limited".to_string(),
            })
        });

        let store = Arc::new(InMemorySummaryStore::new(100));
        let service = MeetingSummaryService::new(Arc::new(provider), Some(store.clone()));
        let err = service.generate(details()).await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ProviderError {
                status: 429,
                body: "rate limited".to_string(),
            })
        );
        assert!(store
            .find(&SummaryQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_generated_summaries_are_retained_when_a_store_is_wired() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(2)
            .returning(|_| Ok(completion(json!({"choices": []}))));

        let service = MeetingSummaryService::new(
            Arc::new(provider),
            Some(Arc::new(InMemorySummaryStore::new(100))),
        );
        let first = service.generate(details()).await.unwrap();
        let second = service.generate(details()).await.unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(service.find_by_id(first.id).await.unwrap(), first);
        let all = service.find_all(&SummaryQuery::default()).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = MeetingSummaryService::new(
            Arc::new(MockProvider::new()),
            Some(Arc::new(InMemorySummaryStore::new(100))),
        );
        let err = service.find_by_id(Id::new_v4()).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn test_lookups_without_a_store_are_not_implemented() {
        let service = MeetingSummaryService::new(Arc::new(MockProvider::new()), None);

        let err = service.find_all(&SummaryQuery::default()).await.unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::NotImplemented(_)));

        let err = service.find_by_id(Id::new_v4()).await.unwrap_err();
        assert!(matches!(err.error_kind, DomainErrorKind::NotImplemented(_)));
    }
}

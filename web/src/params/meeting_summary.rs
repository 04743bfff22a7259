use domain::meeting::{MeetingDetails, TranscriptEntry};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// One transcript line as sent by callers.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TranscriptionParams {
    pub member: String,
    pub timestamp: String,
    pub content: String,
}

/// Body of `POST /meeting-summaries`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateParams {
    pub meeting_id: String,
    pub meeting_title: String,
    #[serde(default)]
    pub transcription: Vec<TranscriptionParams>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Number of summaries to skip. Defaults to 0.
    pub(crate) offset: Option<i64>,
    /// Page size, between 1 and 1000. Defaults to 100.
    pub(crate) limit: Option<i64>,
    /// `<category> <operator> <value>`, e.g. `meeting_title contains "sync"`.
    pub(crate) filter: Option<String>,
}

impl From<TranscriptionParams> for TranscriptEntry {
    fn from(params: TranscriptionParams) -> Self {
        TranscriptEntry {
            speaker: params.member,
            timestamp: params.timestamp,
            content: params.content,
        }
    }
}

impl From<GenerateParams> for MeetingDetails {
    fn from(params: GenerateParams) -> Self {
        MeetingDetails {
            meeting_id: params.meeting_id,
            meeting_title: params.meeting_title,
            entries: params.transcription.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_params_keep_transcription_order() {
        let params: GenerateParams = serde_json::from_value(json!({
            "meeting_id": "m-9",
            "meeting_title": "Retro",
            "transcription": [
                {"member": "Zoe", "timestamp": "10:05", "content": "Second?"},
                {"member": "Ari", "timestamp": "10:01", "content": "First."}
            ]
        }))
        .unwrap();

        let details = MeetingDetails::from(params);
        assert_eq!(details.meeting_id, "m-9");
        assert_eq!(details.entries[0].speaker, "Zoe");
        assert_eq!(details.entries[1].content, "First.");
    }

    #[test]
    fn test_missing_transcription_is_empty() {
        let params: GenerateParams =
            serde_json::from_value(json!({"meeting_id": "m", "meeting_title": "t"})).unwrap();
        assert!(MeetingDetails::from(params).entries.is_empty());
    }
}

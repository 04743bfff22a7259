//! Meeting transcripts as received from callers.

/// One speaker utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: String,
    pub timestamp: String,
    pub content: String,
}

/// A meeting and its transcript. Built per request and dropped when the request ends.
///
/// `entries` are kept in the order the caller sent them; that order is chronological
/// by contract and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDetails {
    pub meeting_id: String,
    pub meeting_title: String,
    pub entries: Vec<TranscriptEntry>,
}

impl TranscriptEntry {
    pub fn new(
        speaker: impl Into<String>,
        timestamp: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }
}

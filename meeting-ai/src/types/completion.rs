//! Types for chat-completion operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Chat-completion request payload.
///
/// The session, chat and message identifiers are optional provider bookkeeping. They are
/// sent verbatim when configured and never carry state between requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub stream: bool,
}

impl Request {
    /// Builds a non-streaming request whose only message is `prompt` from the user.
    pub fn from_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message {
                role: Role::User,
                content: prompt.into(),
            }],
            session_id: None,
            chat_id: None,
            id: None,
            stream: false,
        }
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_chat_id(mut self, chat_id: Option<String>) -> Self {
        self.chat_id = chat_id;
        self
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }
}

/// Decoded provider answer.
///
/// Providers disagree on response shapes, so the body is kept as an open JSON object and
/// only the fields the pipeline consumes get typed accessors. Every accessor returns
/// `None` rather than failing when the expected shape is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionResult(Map<String, Value>);

impl CompletionResult {
    /// Decodes a response body. Anything other than a JSON object is an error.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Text of the first choice, the `choices[0].message.content` field of
    /// OpenAI-compatible providers.
    pub fn first_choice_content(&self) -> Option<&str> {
        self.0
            .get("choices")?
            .as_array()?
            .first()?
            .get("message")?
            .get("content")?
            .as_str()
    }

    /// Model that produced the answer, when the provider reports it.
    pub fn model(&self) -> Option<&str> {
        self.0.get("model")?.as_str()
    }

    /// Provider-assigned completion id, when present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_prompt_is_single_user_message_without_streaming() {
        let request = Request::from_prompt("model-1", "Meeting Transcription: Sync\n")
            .with_session_id(Some("session-1".to_string()))
            .with_chat_id(None);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "model-1",
                "messages": [{"role": "user", "content": "Meeting Transcription: Sync\n"}],
                "session_id": "session-1",
                "stream": false
            })
        );
    }

    #[test]
    fn test_first_choice_content_is_extracted() {
        let result = CompletionResult::from_slice(
            br#"{"id":"c-1","model":"m","choices":[{"message":{"role":"assistant","content":"Summary"}}]}"#,
        )
        .unwrap();
        assert_eq!(result.first_choice_content(), Some("Summary"));
        assert_eq!(result.model(), Some("m"));
        assert_eq!(result.id(), Some("c-1"));
    }

    #[test]
    fn test_accessors_tolerate_unexpected_shapes() {
        let result = CompletionResult::from_slice(br#"{"choices":"none","model":7}"#).unwrap();
        assert_eq!(result.first_choice_content(), None);
        assert_eq!(result.model(), None);

        let empty = CompletionResult::from_slice(br#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_choice_content(), None);
    }

    #[test]
    fn test_non_object_bodies_are_rejected() {
        assert!(CompletionResult::from_slice(b"[1,2,3]").is_err());
        assert!(CompletionResult::from_slice(b"<html>502</html>").is_err());
    }
}

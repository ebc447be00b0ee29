//! Conversational habit creation.
//!
//! The user describes a habit in free text; the backend either asks a
//! follow-up question (status 400 with a text `data`) or proposes a
//! [`HabitDraft`] (status 200 with an object `data`). The whole transcript is
//! sent with every prompt as `"User: …"` / `"AI: …"` lines.

use crate::api::{ChatData, ChatRequest, ChatResponse, RemoteGateway};
use crate::error::{CoreError, ValidationError};
use crate::habit::HabitDraft;

const USER_PREFIX: &str = "User: ";
const AI_PREFIX: &str = "AI: ";
const DEFAULT_FOLLOW_UP: &str = "Could you tell me a bit more about the habit?";
const DEFAULT_FAILURE: &str = "Something went wrong while analysing the message.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Ai,
}

/// Result of one chat round.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// A complete habit proposal, ready for review and creation.
    DraftReady(HabitDraft),
    /// The assistant needs more information.
    FollowUp(String),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw transcript lines.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn transcript(&self) -> impl Iterator<Item = (Speaker, &str)> {
        self.history.iter().map(|line| {
            if let Some(text) = line.strip_prefix(USER_PREFIX) {
                (Speaker::User, text)
            } else if let Some(text) = line.strip_prefix(AI_PREFIX) {
                (Speaker::Ai, text)
            } else {
                (Speaker::Ai, line.as_str())
            }
        })
    }

    /// Record the user's message and build the request carrying it.
    pub fn prompt(&mut self, text: &str) -> Result<ChatRequest, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty("message"));
        }
        self.history.push(format!("{USER_PREFIX}{text}"));
        Ok(ChatRequest {
            current_prompt: text.to_string(),
            history: self.history.clone(),
        })
    }

    /// Interpret a reply. The body's `status` wins over the HTTP status.
    pub fn apply(&mut self, http_status: u16, response: ChatResponse) -> ChatOutcome {
        let status = response.status.unwrap_or(i64::from(http_status));
        match status {
            200 => match response.data {
                Some(ChatData::Draft(draft)) => {
                    tracing::info!(name = %draft.name, "chat proposed a habit");
                    ChatOutcome::DraftReady(draft)
                }
                _ => ChatOutcome::Failed("empty habit data".to_string()),
            },
            400 => {
                let text = match response.data {
                    Some(ChatData::Text(text)) if !text.trim().is_empty() => text,
                    _ => response
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_FOLLOW_UP.to_string()),
                };
                self.history.push(format!("{AI_PREFIX}{text}"));
                ChatOutcome::FollowUp(text)
            }
            other => {
                tracing::warn!(status = other, "chat request failed");
                ChatOutcome::Failed(
                    response
                        .message
                        .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
                )
            }
        }
    }

    /// One full round trip.
    pub async fn send(
        &mut self,
        gateway: &RemoteGateway,
        text: &str,
    ) -> Result<ChatOutcome, CoreError> {
        let request = self.prompt(text)?;
        let (status, response) = gateway.analyze_message(&request).await?;
        Ok(self.apply(status, response))
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::DaysOfWeek;

    fn response(status: Option<i64>, message: Option<&str>, data: Option<ChatData>) -> ChatResponse {
        ChatResponse {
            status,
            message: message.map(str::to_string),
            data,
        }
    }

    fn draft() -> HabitDraft {
        HabitDraft {
            name: "Read".into(),
            days_of_week: DaysOfWeek::new([1, 2, 3, 4, 5]).unwrap(),
            icon: "📚".into(),
            start_time: "21:00:00".into(),
            end_time: "21:30:00".into(),
        }
    }

    #[test]
    fn prompt_appends_user_line_and_sends_history() {
        let mut chat = ChatSession::new();
        let req = chat.prompt("read every weekday").unwrap();
        assert_eq!(req.current_prompt, "read every weekday");
        assert_eq!(req.history, vec!["User: read every weekday"]);
        assert_eq!(chat.prompt("  "), Err(ValidationError::Empty("message")));
    }

    #[test]
    fn follow_up_prefers_data_then_message_then_default() {
        let mut chat = ChatSession::new();
        chat.prompt("run").unwrap();

        let out = chat.apply(400, response(Some(400), Some("msg"), Some(ChatData::Text("When?".into()))));
        assert_eq!(out, ChatOutcome::FollowUp("When?".into()));

        let out = chat.apply(400, response(Some(400), Some("How long?"), None));
        assert_eq!(out, ChatOutcome::FollowUp("How long?".into()));

        let out = chat.apply(400, response(None, None, None));
        assert_eq!(out, ChatOutcome::FollowUp(DEFAULT_FOLLOW_UP.into()));

        let speakers: Vec<Speaker> = chat.transcript().map(|(s, _)| s).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Ai, Speaker::Ai, Speaker::Ai]);
        assert_eq!(chat.history()[1], "AI: When?");
    }

    #[test]
    fn success_with_draft_is_ready() {
        let mut chat = ChatSession::new();
        chat.prompt("read at nine").unwrap();
        let out = chat.apply(200, response(Some(200), None, Some(ChatData::Draft(draft()))));
        assert_eq!(out, ChatOutcome::DraftReady(draft()));
        assert_eq!(chat.history().len(), 1);
    }

    #[test]
    fn success_without_draft_fails() {
        let mut chat = ChatSession::new();
        assert_eq!(
            chat.apply(200, response(Some(200), None, None)),
            ChatOutcome::Failed("empty habit data".into())
        );
        assert_eq!(
            chat.apply(200, response(None, None, Some(ChatData::Text("hi".into())))),
            ChatOutcome::Failed("empty habit data".into())
        );
    }

    #[test]
    fn other_status_fails_with_message() {
        let mut chat = ChatSession::new();
        assert_eq!(
            chat.apply(500, response(Some(500), Some("server down"), None)),
            ChatOutcome::Failed("server down".into())
        );
        assert_eq!(
            chat.apply(503, response(None, None, None)),
            ChatOutcome::Failed(DEFAULT_FAILURE.into())
        );
    }

    #[test]
    fn body_status_overrides_http_status() {
        let mut chat = ChatSession::new();
        let out = chat.apply(200, response(Some(400), None, Some(ChatData::Text("Which days?".into()))));
        assert_eq!(out, ChatOutcome::FollowUp("Which days?".into()));
    }
}

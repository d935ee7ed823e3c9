//! Conversation types and the client/proxy wire contract

use serde::{Deserialize, Serialize};

/// One text segment of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// All text parts joined together
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Full dialogue history, in turn order.
///
/// The client owns this and sends all of it on every request; entries are only
/// ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_user(&mut self, content: &str) {
        self.push(Message::user(content));
    }

    pub fn add_model(&mut self, content: &str) {
        self.push(Message::model(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Older browser widgets sent the history as `contents`
    #[serde(default, alias = "contents")]
    pub conversation: Option<Conversation>,
}

impl ChatRequest {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation: Some(conversation),
        }
    }
}

/// Body returned by `POST /api/chat`, always paired with a matching status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply { reply: String },
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let mut conversation = Conversation::new();
        conversation.add_user("Hi");
        conversation.add_model("Hello!");

        let value = serde_json::to_value(ChatRequest::new(conversation)).unwrap();
        assert_eq!(
            value,
            json!({
                "conversation": [
                    { "role": "user", "parts": [{ "text": "Hi" }] },
                    { "role": "model", "parts": [{ "text": "Hello!" }] }
                ]
            })
        );
    }

    #[test]
    fn test_contents_alias() {
        let body = r#"{"contents":[{"role":"user","parts":[{"text":"Hey"}]}]}"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        let conversation = request.conversation.unwrap();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].text(), "Hey");
    }

    #[test]
    fn test_missing_conversation_is_none() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.conversation.is_none());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let body = r#"{"conversation":[{"role":"system","parts":[{"text":"x"}]}]}"#;
        assert!(serde_json::from_str::<ChatRequest>(body).is_err());
    }

    #[test]
    fn test_response_variants() {
        let reply: ChatResponse = serde_json::from_str(r#"{"reply":"ok"}"#).unwrap();
        assert_eq!(reply, ChatResponse::Reply { reply: "ok".into() });

        let error: ChatResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(error, ChatResponse::Error { error: "nope".into() });
    }
}

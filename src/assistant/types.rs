use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form learner profile. Accepted by the generator, not interpreted.
pub type UserProfile = Map<String, Value>;

/// One earlier message of the conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// `"user"` for the learner; anything else is treated as the assistant.
    pub sender: String,
    pub message: String,
}

impl ConversationTurn {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            sender: "user".to_string(),
            message: message.into(),
        }
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self {
            sender: "assistant".to_string(),
            message: message.into(),
        }
    }
}

/// A knowledge-base snippet found by an upstream retrieval step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedPassage {
    pub content: String,
    pub document_name: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model: String,
    pub tokens_used: u32,
    pub confidence: f64,
    pub suggested_topics: Vec<String>,
    pub follow_up_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<Vec<RetrievedPassage>>,
}

/// Result of one `generate` call. Always produced, even on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub message: String,
    pub metadata: ResponseMetadata,
}

impl AiResponse {
    pub fn is_error(&self) -> bool {
        self.metadata.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{AiResponse, ResponseMetadata, RetrievedPassage};
    use serde_json::json;

    #[test]
    fn response_serializes_in_camel_case_and_skips_absent_fields() {
        let response = AiResponse {
            message: "ok".to_string(),
            metadata: ResponseMetadata {
                model: "gpt-3.5-turbo".to_string(),
                tokens_used: 12,
                confidence: 0.9,
                suggested_topics: vec![],
                follow_up_questions: vec![],
                error: None,
                retrieved_context: Some(vec![RetrievedPassage {
                    content: "c".to_string(),
                    document_name: "d.pdf".to_string(),
                    similarity: 0.5,
                }]),
            },
        };
        let value = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(
            value,
            json!({
                "message": "ok",
                "metadata": {
                    "model": "gpt-3.5-turbo",
                    "tokensUsed": 12,
                    "confidence": 0.9,
                    "suggestedTopics": [],
                    "followUpQuestions": [],
                    "retrievedContext": [
                        {"content": "c", "documentName": "d.pdf", "similarity": 0.5}
                    ]
                }
            })
        );
        assert!(!response.is_error());
    }

    #[test]
    fn passages_parse_from_camel_case_json() {
        let passages: Vec<RetrievedPassage> = serde_json::from_str(
            r#"[{"content":"x","documentName":"notes.md","similarity":0.82}]"#,
        )
        .expect("passages should parse");
        assert_eq!(passages[0].document_name, "notes.md");
    }
}

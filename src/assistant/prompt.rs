use std::fmt::Write as _;

use crate::assistant::types::{ConversationTurn, RetrievedPassage};
use crate::llm::chat::{ChatMessage, MessageRole};

pub const SYSTEM_PROMPT: &str = "You are StudyBuddy AI, a friendly and knowledgeable learning assistant. Your role is to help students understand concepts, provide study guidance, and support their learning journey. You should:

1. Be encouraging and supportive
2. Break down complex concepts into simple terms
3. Provide practical examples and analogies
4. Suggest study techniques and strategies
5. Offer step-by-step explanations
6. Recommend additional resources when appropriate
7. Adapt explanations based on the student's level
8. Ask clarifying questions to better understand needs

Always maintain a positive, patient, and helpful tone. Focus on helping students truly understand concepts rather than just memorizing facts.";

const CONTEXT_HEADER: &str = "\n\nRelevant context from your knowledge base:\n";
const CONTEXT_FOOTER: &str =
    "\nUse this context to provide accurate, detailed answers. Cite sources when referencing specific information.";
const NO_CONTEXT: &str = "\n\nNo relevant context found in your knowledge base. Answer based on general knowledge and suggest uploading relevant materials.";

/// Persona block followed by either numbered citations or a no-context note.
pub fn build_system_prompt(passages: &[RetrievedPassage]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    if passages.is_empty() {
        prompt.push_str(NO_CONTEXT);
        return prompt;
    }

    prompt.push_str(CONTEXT_HEADER);
    for (index, passage) in passages.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            prompt,
            "[{}] {} (Source: {})",
            index + 1,
            passage.content,
            passage.document_name
        );
    }
    prompt.push_str(CONTEXT_FOOTER);
    prompt
}

pub fn role_for_sender(sender: &str) -> MessageRole {
    if sender == "user" {
        MessageRole::User
    } else {
        MessageRole::Assistant
    }
}

/// System instruction, then the history in order, then the new question.
pub fn build_messages(
    system_prompt: String,
    prior_turns: &[ConversationTurn],
    message: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior_turns.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(
        prior_turns
            .iter()
            .map(|turn| ChatMessage::new(role_for_sender(&turn.sender), turn.message.clone())),
    );
    messages.push(ChatMessage::user(message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(content: &str, document_name: &str) -> RetrievedPassage {
        RetrievedPassage {
            content: content.to_string(),
            document_name: document_name.to_string(),
            similarity: 0.7,
        }
    }

    #[test]
    fn empty_context_asks_for_general_knowledge() {
        let prompt = build_system_prompt(&[]);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.ends_with("suggest uploading relevant materials."));
        assert!(!prompt.contains("[1]"));
    }

    #[test]
    fn citations_are_numbered_in_input_order() {
        let prompt = build_system_prompt(&[
            passage("Cells divide by mitosis.", "bio.pdf"),
            passage("DNA is a double helix.", "genetics.md"),
        ]);
        let first = prompt
            .find("[1] Cells divide by mitosis. (Source: bio.pdf)\n")
            .expect("first citation present");
        let second = prompt
            .find("[2] DNA is a double helix. (Source: genetics.md)\n")
            .expect("second citation present");
        assert!(first < second);
        assert!(prompt.ends_with("Cite sources when referencing specific information."));
        assert!(!prompt.contains("No relevant context"));
    }

    #[test]
    fn only_user_sender_maps_to_user_role() {
        assert_eq!(role_for_sender("user"), MessageRole::User);
        assert_eq!(role_for_sender("assistant"), MessageRole::Assistant);
        assert_eq!(role_for_sender("ai"), MessageRole::Assistant);
        assert_eq!(role_for_sender("User"), MessageRole::Assistant);
    }

    #[test]
    fn messages_keep_history_order() {
        let turns = vec![
            ConversationTurn::user("first"),
            ConversationTurn {
                sender: "bot".to_string(),
                message: "second".to_string(),
            },
            ConversationTurn::user("third"),
        ];
        let messages = build_messages("sys".to_string(), &turns, "now");
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::User,
            ]
        );
        assert_eq!(contents, vec!["sys", "first", "second", "third", "now"]);
    }
}

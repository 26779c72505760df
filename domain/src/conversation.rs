use crate::models::{ConversationMessage, Role};
use shared::types::{PipelineError, Result};

/// Splits a conversation into its history and the active user turn.
///
/// The last message is the active query and must come from the user; the
/// messages before it are passed through untouched.
pub fn split_active(
    messages: &[ConversationMessage],
) -> Result<(&[ConversationMessage], &ConversationMessage)> {
    let (last, history) = messages
        .split_last()
        .ok_or_else(|| PipelineError::invalid_input("conversation is empty"))?;
    if last.role != Role::User {
        return Err(PipelineError::MalformedConversation(format!(
            "last message must be a user turn, got role '{}'",
            last.role
        )));
    }
    Ok((history, last))
}

/// The text of the active user turn, validated as non-empty.
pub fn active_query(messages: &[ConversationMessage]) -> Result<&str> {
    let (_, last) = split_active(messages)?;
    if last.content.trim().is_empty() {
        return Err(PipelineError::invalid_input(
            "last message carries no textual content",
        ));
    }
    Ok(&last.content)
}

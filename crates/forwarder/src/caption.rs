use common::types::ChatRef;

const LINK_PREFIX: &str = "https://t.me/";

/// `text\n\n<label>: <attribution>`, only the attribution line for empty text
pub fn compose_caption(text: &str, label: &str, attribution: &str) -> String {
    let source_line = format!("{label}: {attribution}");
    if text.trim().is_empty() {
        source_line
    } else {
        format!("{text}\n\n{source_line}")
    }
}

/// Link to the chat, or its title for chats without public username
pub fn chat_attribution(chat: &ChatRef) -> String {
    match (public_username(chat), &chat.title) {
        (Some(username), _) => format!("{LINK_PREFIX}{username}"),
        (None, Some(title)) if !title.is_empty() => title.clone(),
        _ => chat.id.to_string(),
    }
}

/// Link to the exact message when possible
pub fn message_attribution(chat: &ChatRef, message_id: i32) -> String {
    match public_username(chat) {
        Some(username) => format!("{LINK_PREFIX}{username}/{message_id}"),
        None => chat_attribution(chat),
    }
}

fn public_username(chat: &ChatRef) -> Option<&str> {
    chat.username.as_deref().filter(|u| !u.is_empty())
}

// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for chats, messages, and briefing items.

use inbrief_core::{
    BriefingResponse, Chat, ChatKind, FyiItem, ItemChatType, Message, MessageContent,
    NeedsResponseItem, Priority,
};

fn chat(id: i64, kind: ChatKind, title: &str, unread: u32, members: Option<u32>) -> Chat {
    Chat {
        id,
        kind,
        title: title.to_string(),
        unread_count: unread,
        member_count: members,
        last_message: None,
    }
}

pub fn private_chat(id: i64, title: &str, unread: u32) -> Chat {
    chat(id, ChatKind::Private, title, unread, None)
}

pub fn group_chat(id: i64, title: &str, unread: u32, members: u32) -> Chat {
    chat(id, ChatKind::Group, title, unread, Some(members))
}

pub fn supergroup_chat(id: i64, title: &str, unread: u32, members: u32) -> Chat {
    chat(id, ChatKind::Supergroup, title, unread, Some(members))
}

pub fn channel_chat(id: i64, title: &str, unread: u32, members: u32) -> Chat {
    chat(id, ChatKind::Channel, title, unread, Some(members))
}

/// An incoming text message.
pub fn text_message(chat_id: i64, id: i64, sender: &str, text: &str, date: i64) -> Message {
    Message {
        id,
        chat_id,
        sender_id: 100,
        sender_name: sender.to_string(),
        content: MessageContent::Text {
            text: text.to_string(),
        },
        date,
        is_outgoing: false,
        is_read: false,
        is_mentioned: false,
    }
}

/// A message sent by the user.
pub fn outgoing_message(chat_id: i64, id: i64, text: &str, date: i64) -> Message {
    Message {
        sender_id: 1,
        sender_name: "Me".to_string(),
        is_outgoing: true,
        is_read: true,
        ..text_message(chat_id, id, "Me", text, date)
    }
}

/// An incoming text message that mentions the user.
pub fn mention_message(chat_id: i64, id: i64, sender: &str, text: &str, date: i64) -> Message {
    Message {
        is_mentioned: true,
        ..text_message(chat_id, id, sender, text, date)
    }
}

pub fn needs_item(chat_id: i64, unread: u32, priority: Priority) -> NeedsResponseItem {
    NeedsResponseItem {
        id: 0,
        chat_id,
        chat_name: format!("chat {chat_id}"),
        chat_type: ItemChatType::Dm,
        unread_count: unread,
        last_message: None,
        last_message_date: None,
        priority,
        summary: format!("chat {chat_id} is waiting on you"),
        suggested_reply: None,
    }
}

pub fn fyi_item(chat_id: i64, unread: u32) -> FyiItem {
    FyiItem {
        id: 0,
        chat_id,
        chat_name: format!("chat {chat_id}"),
        chat_type: ItemChatType::Group,
        unread_count: unread,
        last_message: None,
        last_message_date: None,
        priority: Priority::Fyi,
        summary: format!("chat {chat_id} has updates"),
    }
}

/// A classifier-shaped response: ids numbered from 1, stats derived.
pub fn briefing(mut needs: Vec<NeedsResponseItem>, mut fyi: Vec<FyiItem>) -> BriefingResponse {
    let mut next_id = 0;
    for item in &mut needs {
        next_id += 1;
        item.id = next_id;
    }
    for item in &mut fyi {
        next_id += 1;
        item.id = next_id;
    }
    BriefingResponse::from_items(needs, fyi)
}

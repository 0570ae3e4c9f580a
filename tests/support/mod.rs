//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use serde_json::{Value, json};

/// Full guild record as returned by `GET /v10/guilds/{id}`.
pub fn guild_json(id: &str, name: &str, emojis: Value, stickers: Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner_id": "80351110224678912",
        "emojis": emojis,
        "stickers": stickers,
    })
}

/// Emoji entry of a guild record.
pub fn emoji_json(id: &str, name: &str, animated: bool) -> Value {
    json!({ "id": id, "name": name, "animated": animated, "available": true })
}

/// Sticker entry of a guild record.
pub fn sticker_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "format_type": 1 })
}

//! Per-room settings.
//!
//! Each room record carries the room's default UAT query list. Rooms may
//! hold unrelated settings written by other handlers in the same brain key;
//! those are round-tripped untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Default UAT names for unqualified `uat status` queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uat: Option<Vec<String>>,

    /// Settings owned by other handlers; preserved across rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomSettings {
    rooms: BTreeMap<String, RoomRecord>,
}

impl RoomSettings {
    pub fn defaults_for(&self, room: &str) -> Option<&[String]> {
        self.rooms
            .get(room)
            .and_then(|record| record.uat.as_deref())
    }

    /// Replace (never merge) the room's default list. The record is created
    /// on first use.
    pub fn set_defaults(&mut self, room: &str, names: Vec<String>) {
        self.rooms.entry(room.to_string()).or_default().uat = Some(names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_replaced_wholesale() {
        let mut settings = RoomSettings::default();
        assert_eq!(settings.defaults_for("#testroom"), None);

        settings.set_defaults("#testroom", vec!["zelda".to_string()]);
        settings.set_defaults("#testroom", vec!["kirby".to_string(), "yoshi".to_string()]);

        assert_eq!(
            settings.defaults_for("#testroom"),
            Some(&["kirby".to_string(), "yoshi".to_string()][..])
        );
    }

    #[test]
    fn unrelated_room_keys_survive_a_rewrite() {
        let raw = json!({
            "#testroom": {"uat": ["zelda"], "topic": "standup at 10"}
        });
        let mut settings: RoomSettings = serde_json::from_value(raw).unwrap();

        settings.set_defaults("#testroom", vec!["kirby".to_string()]);

        let out = serde_json::to_value(&settings).unwrap();
        assert_eq!(out["#testroom"]["uat"], json!(["kirby"]));
        assert_eq!(out["#testroom"]["topic"], json!("standup at 10"));
    }
}

use crate::common::address::Short;
use crate::common::device_type::DtType;
use crate::common::group_mask::GroupMask;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Room name used for fixtures without a room
pub const UNASSIGNED_ROOM: &str = "Unassigned";

/// Stable identity of a fixture. Not related to its short address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(Uuid);

impl FixtureId {
    pub fn new() -> FixtureId {
        FixtureId(Uuid::new_v4())
    }
}

impl Default for FixtureId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FixtureId {
    fn from(u: Uuid) -> Self {
        FixtureId(u)
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub(crate) id: FixtureId,
    pub(crate) label: String,
    #[serde(default)]
    pub(crate) short_address: Option<Short>,
    #[serde(default)]
    pub(crate) groups: GroupMask,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) dt_type: Option<DtType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) commissioned_at: Option<DateTime<Utc>>,
}

impl FixtureRecord {
    pub fn id(&self) -> FixtureId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn short_address(&self) -> Option<Short> {
        self.short_address
    }

    pub fn groups(&self) -> GroupMask {
        self.groups
    }

    /// Room as entered
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    /// Room name used for grouping
    pub fn room_name(&self) -> &str {
        normalize_room(self.room.as_deref())
    }

    pub fn dt_type(&self) -> Option<DtType> {
        self.dt_type
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn commissioned_at(&self) -> Option<DateTime<Utc>> {
        self.commissioned_at
    }

    pub fn is_commissioned(&self) -> bool {
        self.commissioned_at.is_some()
    }
}

/// Trimmed room name, or [`UNASSIGNED_ROOM`] when there is nothing left
pub fn normalize_room(room: Option<&str>) -> &str {
    match room.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => UNASSIGNED_ROOM,
    }
}

pub(crate) fn validate_label(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::InvalidLabel);
    }
    Ok(label.to_string())
}

/// Optional text is stored trimmed, blank text as absent
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Parameters for creating a fixture
#[derive(Debug, Clone, Default)]
pub struct NewFixture {
    pub(crate) label: String,
    pub(crate) groups: GroupMask,
    pub(crate) room: Option<String>,
    pub(crate) dt_type: Option<DtType>,
    pub(crate) address: Option<u8>,
    pub(crate) serial: Option<String>,
    pub(crate) notes: Option<String>,
}

impl NewFixture {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn groups(mut self, groups: GroupMask) -> Self {
        self.groups = groups;
        self
    }

    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn dt_type(mut self, dt_type: DtType) -> Self {
        self.dt_type = Some(dt_type);
        self
    }

    /// Request a short address. Checked when the fixture is added.
    pub fn address(mut self, address: u8) -> Self {
        self.address = Some(address);
        self
    }

    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

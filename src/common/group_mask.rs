use crate::common::address::Group;
use crate::error::Result;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Group membership, bit n set for membership in group Gn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMask(u16);

impl GroupMask {
    pub const NONE: GroupMask = GroupMask(0);

    pub fn from_bits(bits: u16) -> GroupMask {
        GroupMask(bits)
    }

    /// Build a mask from group indices, failing on the first index above 15
    pub fn from_groups<I>(groups: I) -> Result<GroupMask>
    where
        I: IntoIterator<Item = u8>,
    {
        groups
            .into_iter()
            .try_fold(GroupMask::NONE, |mask, g| mask.set(g))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn has(&self, group: u8) -> Result<bool> {
        let group = Group::try_from(group)?;
        Ok(self.0 & group.bit() != 0)
    }

    pub fn set(&self, group: u8) -> Result<GroupMask> {
        let group = Group::try_from(group)?;
        Ok(GroupMask(self.0 | group.bit()))
    }

    pub fn clear(&self, group: u8) -> Result<GroupMask> {
        let group = Group::try_from(group)?;
        Ok(GroupMask(self.0 & !group.bit()))
    }

    /// An empty filter matches every mask
    pub fn matches_any(&self, filter: GroupMask) -> bool {
        filter.is_empty() || (self.0 & filter.0) != 0
    }

    pub fn describe(&self) -> Vec<Group> {
        (0..16)
            .filter(|b| self.0 & (1u16 << *b) != 0)
            .map(Group::new)
            .collect()
    }
}

impl From<Group> for GroupMask {
    fn from(group: Group) -> GroupMask {
        GroupMask(group.bit())
    }
}

impl fmt::Display for GroupMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.pad("—");
        }
        let groups: Vec<String> = self.describe().iter().map(|g| g.to_string()).collect();
        f.pad(&groups.join(","))
    }
}

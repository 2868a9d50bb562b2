//! Short address and group allocation for commissioning DALI fixtures.
//!
//! A [`FixtureRegistry`] holds the fixtures of one project and is the only
//! place where short addresses are handed out or taken back. The query
//! functions filter and group fixtures for display without changing anything.

pub mod common {
    pub mod address;
    pub mod address_space;
    pub mod device_type;
    pub mod group_mask;
}

pub mod fixture {
    pub mod record;
    pub mod registry;
    pub mod shared;
    #[cfg(test)]
    mod test;
}

pub mod query {
    pub mod filter;
    pub mod rooms;
}

pub mod error;
pub mod project;

pub use common::address::{AddressError, Group, Short};
pub use common::address_space::AddressSpace;
pub use common::device_type::DtType;
pub use common::group_mask::GroupMask;
pub use error::{Error, Result};
pub use fixture::record::{normalize_room, FixtureId, FixtureRecord, NewFixture, UNASSIGNED_ROOM};
pub use fixture::registry::{FixtureRegistry, FixtureSnapshot};
pub use fixture::shared::SharedRegistry;
pub use project::{ControlSystem, Project, ProjectId};
pub use query::filter::{
    filter_fixtures, fixture_order, parse_address_filter, AddressRange, FixtureQuery,
};
pub use query::rooms::{group_by_room, RoomGroup};

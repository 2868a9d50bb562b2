use crate::fixture::record::{FixtureRecord, UNASSIGNED_ROOM};
use crate::query::filter::fixture_order;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct RoomGroup<'a> {
    pub name: String,
    pub fixtures: Vec<&'a FixtureRecord>,
}

impl RoomGroup<'_> {
    pub fn is_unassigned(&self) -> bool {
        self.name == UNASSIGNED_ROOM
    }
}

/// Group fixtures by room.
///
/// Room names are compared ignoring case and surrounding whitespace. A group
/// is named after the smallest spelling among its fixtures. Groups are sorted
/// by name ignoring case, except "Unassigned" which is always last.
pub fn group_by_room<'a, I>(fixtures: I) -> Vec<RoomGroup<'a>>
where
    I: IntoIterator<Item = &'a FixtureRecord>,
{
    let unassigned_key = UNASSIGNED_ROOM.to_lowercase();
    let mut rooms: BTreeMap<String, RoomGroup<'a>> = BTreeMap::new();
    for fixture in fixtures {
        let name = fixture.room_name();
        let key = name.to_lowercase();
        let name = if key == unassigned_key { UNASSIGNED_ROOM } else { name };
        let group = rooms.entry(key).or_insert_with(|| RoomGroup {
            name: name.to_string(),
            fixtures: Vec::new(),
        });
        if name < group.name.as_str() {
            group.name = name.to_string();
        }
        group.fixtures.push(fixture);
    }

    let unassigned = rooms.remove(&unassigned_key);
    let mut groups: Vec<RoomGroup<'a>> = rooms.into_values().chain(unassigned).collect();
    for group in &mut groups {
        group.fixtures.sort_by(|a, b| fixture_order(a, b));
    }
    groups
}

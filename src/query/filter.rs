use crate::common::address::Short;
use crate::common::group_mask::GroupMask;
use crate::fixture::record::FixtureRecord;
use crate::query::rooms::{group_by_room, RoomGroup};
use std::cmp::Ordering;

/// Inclusive short address range. A missing bound is unconstrained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct AddressRange {
    pub min: Option<Short>,
    pub max: Option<Short>,
}

impl AddressRange {
    pub const ALL: AddressRange = AddressRange {
        min: None,
        max: None,
    };

    pub fn new(min: Option<Short>, max: Option<Short>) -> AddressRange {
        match (min, max) {
            (Some(a), Some(b)) if a > b => AddressRange {
                min: Some(b),
                max: Some(a),
            },
            _ => AddressRange { min, max },
        }
    }

    pub fn exact(addr: Short) -> AddressRange {
        AddressRange {
            min: Some(addr),
            max: Some(addr),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Fixtures without an address only match an unconstrained range
    pub fn contains(&self, addr: Option<Short>) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        let Some(addr) = addr else {
            return false;
        };
        self.min.map_or(true, |min| addr >= min) && self.max.map_or(true, |max| addr <= max)
    }

    /// Summary shown next to the filter field
    pub fn hint(&self) -> String {
        match (self.min, self.max) {
            (None, None) => "Showing all addresses 0–63".to_string(),
            (Some(min), Some(max)) => format!("Showing {}–{}", min, max),
            (Some(min), None) => format!("Showing {}–63", min),
            (None, Some(max)) => format!("Showing 0–{}", max),
        }
    }
}

/// Parse an address filter as typed by the user.
///
/// Accepts `12`, `5-9`, `30-` and `-20`. En dash, em dash and minus sign count
/// as hyphens and whitespace is ignored. Numbers are clamped to 0..=63 and
/// reversed bounds swapped. Anything unreadable leaves the bound open.
pub fn parse_address_filter(text: &str) -> AddressRange {
    let text: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            c => c,
        })
        .collect();
    if text.is_empty() {
        return AddressRange::ALL;
    }
    if !text.contains('-') {
        return parse_bound(&text).map_or(AddressRange::ALL, AddressRange::exact);
    }
    let mut parts = text.split('-');
    let min = parts.next().and_then(parse_bound);
    let max = parts.next().and_then(parse_bound);
    AddressRange::new(min, max)
}

fn parse_bound(text: &str) -> Option<Short> {
    let digits = text.strip_prefix('+').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Too many digits for u64 is still just a large number
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(Short::new(value.min(63) as u8))
}

/// Order by address, unaddressed last, then by label ignoring case
pub fn fixture_order(a: &FixtureRecord, b: &FixtureRecord) -> Ordering {
    let by_address = match (a.short_address(), b.short_address()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_address
        .then_with(|| a.label().to_lowercase().cmp(&b.label().to_lowercase()))
        .then_with(|| a.label().cmp(b.label()))
        .then_with(|| a.id().cmp(&b.id()))
}

pub fn filter_fixtures<'a, I>(
    fixtures: I,
    range: &AddressRange,
    groups: GroupMask,
) -> Vec<&'a FixtureRecord>
where
    I: IntoIterator<Item = &'a FixtureRecord>,
{
    let mut found: Vec<&FixtureRecord> = fixtures
        .into_iter()
        .filter(|f| range.contains(f.short_address()) && f.groups().matches_any(groups))
        .collect();
    found.sort_by(|a, b| fixture_order(a, b));
    found
}

/// Address and group filter applied together
#[derive(Debug, Clone, Default)]
pub struct FixtureQuery {
    range: AddressRange,
    groups: GroupMask,
}

impl FixtureQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address_text(mut self, text: &str) -> Self {
        self.range = parse_address_filter(text);
        self
    }

    pub fn address_range(mut self, range: AddressRange) -> Self {
        self.range = range;
        self
    }

    pub fn groups(mut self, groups: GroupMask) -> Self {
        self.groups = groups;
        self
    }

    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    pub fn is_unfiltered(&self) -> bool {
        self.range.is_unconstrained() && self.groups.is_empty()
    }

    pub fn apply<'a>(&self, fixtures: &'a [FixtureRecord]) -> Vec<&'a FixtureRecord> {
        filter_fixtures(fixtures, &self.range, self.groups)
    }

    pub fn rooms<'a>(&self, fixtures: &'a [FixtureRecord]) -> Vec<RoomGroup<'a>> {
        group_by_room(self.apply(fixtures))
    }
}

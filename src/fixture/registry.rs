use crate::common::address::Short;
use crate::common::address_space::AddressSpace;
use crate::common::device_type::DtType;
use crate::common::group_mask::GroupMask;
use crate::error::{Error, Result};
use crate::fixture::record::{non_empty, validate_label, FixtureId, FixtureRecord, NewFixture};
use crate::project::ProjectId;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// The fixture collection as published after a change
#[derive(Debug, Clone, Default)]
pub struct FixtureSnapshot {
    /// Number of successful changes since the registry was loaded
    pub version: u64,
    pub fixtures: Vec<FixtureRecord>,
}

/// All fixtures of one project together with the short addresses they use.
///
/// Every change to a fixture goes through the registry, which updates the
/// fixture and the [`AddressSpace`] in the same call. A call that fails leaves
/// both untouched. After each change a new [`FixtureSnapshot`] is published to
/// subscribers; failed calls and calls that change nothing publish nothing.
pub struct FixtureRegistry {
    project_id: ProjectId,
    fixtures: Vec<FixtureRecord>,
    space: AddressSpace,
    version: u64,
    snapshot: watch::Sender<Arc<FixtureSnapshot>>,
}

impl FixtureRegistry {
    pub fn new(project_id: ProjectId) -> FixtureRegistry {
        Self::from_parts(project_id, Vec::new(), AddressSpace::new())
    }

    /// Rebuild a registry from stored fixtures.
    ///
    /// The address space is replayed from the fixture addresses. Stored data
    /// with an empty label or two fixtures sharing an address is rejected.
    pub fn load<I>(project_id: ProjectId, fixtures: I) -> Result<FixtureRegistry>
    where
        I: IntoIterator<Item = FixtureRecord>,
    {
        let mut space = AddressSpace::new();
        let mut loaded: Vec<FixtureRecord> = Vec::new();
        for mut fixture in fixtures {
            if loaded.iter().any(|f| f.id == fixture.id) {
                warn!("Project {}: dropping duplicate fixture {}", project_id, fixture.id);
                continue;
            }
            fixture.label = validate_label(&fixture.label).map_err(|e| {
                warn!("Project {}: fixture {} has no label", project_id, fixture.id);
                e
            })?;
            if let Some(addr) = fixture.short_address {
                if let Some(holder) = loaded.iter().find(|f| f.short_address == Some(addr)) {
                    warn!(
                        "Project {}: fixtures {} and {} share address {}",
                        project_id, holder.id, fixture.id, addr
                    );
                    return Err(Error::AddressInUse {
                        address: addr,
                        holder: holder.id,
                    });
                }
                space += addr;
            }
            loaded.push(fixture);
        }
        debug!(
            "Project {}: loaded {} fixtures, {} addresses used",
            project_id,
            loaded.len(),
            space.used_count()
        );
        Ok(Self::from_parts(project_id, loaded, space))
    }

    fn from_parts(
        project_id: ProjectId,
        fixtures: Vec<FixtureRecord>,
        space: AddressSpace,
    ) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(FixtureSnapshot {
            version: 0,
            fixtures: fixtures.clone(),
        }));
        let registry = FixtureRegistry {
            project_id,
            fixtures,
            space,
            version: 0,
            snapshot,
        };
        debug_assert!(registry.is_consistent());
        registry
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn fixtures(&self) -> &[FixtureRecord] {
        &self.fixtures
    }

    pub fn into_fixtures(self) -> Vec<FixtureRecord> {
        self.fixtures
    }

    pub fn get(&self, id: FixtureId) -> Option<&FixtureRecord> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn address_space(&self) -> &AddressSpace {
        &self.space
    }

    /// Fixture currently holding `addr`
    pub fn holder_of(&self, addr: Short) -> Option<&FixtureRecord> {
        if !self.space.contains(addr) {
            return None;
        }
        self.fixtures.iter().find(|f| f.short_address == Some(addr))
    }

    pub fn next_free(&self, starting_from: u8) -> Result<Option<Short>> {
        self.space.next_free(starting_from)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Arc<FixtureSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<FixtureSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Stream yielding a snapshot for changes made after this call
    pub fn changes(&self) -> WatchStream<Arc<FixtureSnapshot>> {
        WatchStream::from_changes(self.snapshot.subscribe())
    }

    pub fn add_fixture(&mut self, new: NewFixture) -> Result<FixtureRecord> {
        let label = validate_label(&new.label)?;
        let short_address = match new.address {
            Some(addr) => Some(self.claimable(addr, None)?),
            None => None,
        };
        let fixture = FixtureRecord {
            id: FixtureId::new(),
            label,
            short_address,
            groups: new.groups,
            room: non_empty(new.room),
            dt_type: new.dt_type,
            serial: non_empty(new.serial),
            notes: non_empty(new.notes),
            commissioned_at: short_address.map(|_| Utc::now()),
        };
        if let Some(addr) = short_address {
            self.space += addr;
        }
        debug!(
            "Added fixture {} \"{}\" address {:?}",
            fixture.id, fixture.label, short_address
        );
        self.fixtures.push(fixture.clone());
        self.publish();
        Ok(fixture)
    }

    pub fn assign_address(&mut self, id: FixtureId, addr: u8) -> Result<()> {
        let addr = Short::try_from(addr)?;
        let index = self.index_of(id)?;
        if self.fixtures[index].short_address == Some(addr) {
            return Ok(());
        }
        self.claimable(addr.value(), Some(id))?;
        let fixture = &mut self.fixtures[index];
        if let Some(old) = fixture.short_address.replace(addr) {
            self.space -= old;
        }
        fixture.commissioned_at = Some(Utc::now());
        self.space += addr;
        debug!("Fixture {} assigned address {}", id, addr);
        self.publish();
        Ok(())
    }

    /// Assign the first free address at or after `starting_from`.
    /// A fixture that already has an address keeps it.
    pub fn assign_next_free(&mut self, id: FixtureId, starting_from: u8) -> Result<Short> {
        Short::try_from(starting_from)?;
        let index = self.index_of(id)?;
        if let Some(addr) = self.fixtures[index].short_address {
            return Ok(addr);
        }
        let addr = self
            .space
            .next_free(starting_from)?
            .ok_or(Error::AddressSpaceFull)?;
        self.assign_address(id, addr.value())?;
        Ok(addr)
    }

    pub fn release_address(&mut self, id: FixtureId) -> Result<()> {
        let index = self.index_of(id)?;
        let fixture = &mut self.fixtures[index];
        let released = fixture.short_address.take();
        let was_commissioned = fixture.commissioned_at.take().is_some();
        if let Some(old) = released {
            self.space -= old;
            debug!("Fixture {} released address {}", id, old);
        }
        if released.is_some() || was_commissioned {
            self.publish();
        }
        Ok(())
    }

    pub fn remove_fixture(&mut self, id: FixtureId) -> Result<FixtureRecord> {
        let index = self.index_of(id)?;
        let fixture = self.fixtures.remove(index);
        if let Some(addr) = fixture.short_address {
            self.space -= addr;
        }
        debug!("Removed fixture {} \"{}\"", id, fixture.label);
        self.publish();
        Ok(fixture)
    }

    pub fn set_groups(&mut self, id: FixtureId, groups: GroupMask) -> Result<()> {
        self.edit(id, |f| replace(&mut f.groups, groups))
    }

    pub fn set_label(&mut self, id: FixtureId, label: &str) -> Result<()> {
        let index = self.index_of(id)?;
        let label = validate_label(label)?;
        self.edit_at(index, |f| replace(&mut f.label, label))
    }

    pub fn set_room(&mut self, id: FixtureId, room: Option<String>) -> Result<()> {
        self.edit(id, |f| replace(&mut f.room, non_empty(room)))
    }

    pub fn set_dt_type(&mut self, id: FixtureId, dt_type: Option<DtType>) -> Result<()> {
        self.edit(id, |f| replace(&mut f.dt_type, dt_type))
    }

    pub fn set_serial(&mut self, id: FixtureId, serial: Option<String>) -> Result<()> {
        self.edit(id, |f| replace(&mut f.serial, non_empty(serial)))
    }

    pub fn set_notes(&mut self, id: FixtureId, notes: Option<String>) -> Result<()> {
        self.edit(id, |f| replace(&mut f.notes, non_empty(notes)))
    }

    /// True when the address space equals the addresses held by the fixtures
    pub fn is_consistent(&self) -> bool {
        let held: Vec<Short> = self.fixtures.iter().filter_map(|f| f.short_address).collect();
        AddressSpace::from_slice(&held) == self.space
            && held.len() == self.space.used_count() as usize
    }

    fn index_of(&self, id: FixtureId) -> Result<usize> {
        self.fixtures
            .iter()
            .position(|f| f.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Check that `addr` is valid and not held by anyone but `owner`
    fn claimable(&self, addr: u8, owner: Option<FixtureId>) -> Result<Short> {
        let addr = Short::try_from(addr)?;
        match self.holder_of(addr) {
            Some(holder) if Some(holder.id) != owner => Err(Error::AddressInUse {
                address: addr,
                holder: holder.id,
            }),
            _ => Ok(addr),
        }
    }

    fn edit<F>(&mut self, id: FixtureId, f: F) -> Result<()>
    where
        F: FnOnce(&mut FixtureRecord) -> bool,
    {
        let index = self.index_of(id)?;
        self.edit_at(index, f)
    }

    /// Apply an edit that does not touch the address, publish if it changed something
    fn edit_at<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut FixtureRecord) -> bool,
    {
        if f(&mut self.fixtures[index]) {
            debug!("Fixture {} updated", self.fixtures[index].id);
            self.publish();
        }
        Ok(())
    }

    fn publish(&mut self) {
        debug_assert!(self.is_consistent());
        self.version += 1;
        let snapshot = FixtureSnapshot {
            version: self.version,
            fixtures: self.fixtures.clone(),
        };
        self.snapshot.send_replace(Arc::new(snapshot));
    }
}

/// Store `value`, returning true if it differs from what was there
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

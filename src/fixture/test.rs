use crate::common::address::{AddressError, Short};
use crate::common::device_type::DtType;
use crate::common::group_mask::GroupMask;
use crate::error::Error;
use crate::fixture::record::{FixtureId, NewFixture};
use crate::fixture::registry::FixtureRegistry;
use crate::project::ProjectId;
use futures::executor::block_on;
use futures::stream::StreamExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

fn registry() -> FixtureRegistry {
    FixtureRegistry::new(ProjectId::new())
}

fn held(reg: &FixtureRegistry) -> Vec<Short> {
    let set: BTreeSet<Short> = reg.fixtures().iter().filter_map(|f| f.short_address()).collect();
    set.into_iter().collect()
}

#[test]
fn add_without_address() {
    let mut reg = registry();
    let f = reg
        .add_fixture(
            NewFixture::new("  Hall Sconce ")
                .room(" Hall ")
                .dt_type(DtType::D4i)
                .serial("SN-0042")
                .notes("   "),
        )
        .unwrap();
    assert_eq!(f.label(), "Hall Sconce");
    assert_eq!(f.short_address(), None);
    assert_eq!(f.room(), Some("Hall"));
    assert_eq!(f.serial(), Some("SN-0042"));
    assert_eq!(f.notes(), None);
    assert!(!f.is_commissioned());
    assert!(reg.address_space().is_empty());
    assert_eq!(reg.get(f.id()), Some(&f));
}

#[test]
fn add_with_address() {
    let mut reg = registry();
    let f = reg.add_fixture(NewFixture::new("Island").address(12)).unwrap();
    assert_eq!(f.short_address(), Some(Short::new(12)));
    assert!(f.is_commissioned());
    assert_eq!(reg.address_space().is_free(12), Ok(false));

    match reg.add_fixture(NewFixture::new("Other").address(12)) {
        Err(Error::AddressInUse { address, holder }) => {
            assert_eq!(address, Short::new(12));
            assert_eq!(holder, f.id());
        }
        r => panic!("Expected address conflict: {:?}", r),
    }
    assert_eq!(
        reg.add_fixture(NewFixture::new("Other").address(64)).unwrap_err(),
        Error::OutOfRange(AddressError::Short(64))
    );
    assert_eq!(
        reg.add_fixture(NewFixture::new(" \t ").address(13)).unwrap_err(),
        Error::InvalidLabel
    );
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.address_space().used(), vec![Short::new(12)]);
}

#[test]
fn assign_is_idempotent() {
    let mut reg = registry();
    let id = reg.add_fixture(NewFixture::new("Spot")).unwrap().id();
    reg.assign_address(id, 7).unwrap();
    let first = reg.get(id).unwrap().commissioned_at();
    let version = reg.version();
    reg.assign_address(id, 7).unwrap();
    assert_eq!(reg.get(id).unwrap().commissioned_at(), first);
    assert_eq!(reg.version(), version);
    assert_eq!(reg.address_space().used(), vec![Short::new(7)]);
}

#[test]
fn assign_moves_address() {
    let mut reg = registry();
    let id = reg.add_fixture(NewFixture::new("Spot").address(3)).unwrap().id();
    reg.assign_address(id, 9).unwrap();
    assert_eq!(reg.address_space().used(), vec![Short::new(9)]);
    assert_eq!(reg.get(id).unwrap().short_address(), Some(Short::new(9)));
    assert!(reg.holder_of(Short::new(3)).is_none());
}

#[test]
fn conflict_until_released() {
    let mut reg = registry();
    let f1 = reg.add_fixture(NewFixture::new("One")).unwrap().id();
    let f2 = reg.add_fixture(NewFixture::new("Two").address(5)).unwrap().id();
    assert_eq!(
        reg.assign_address(f1, 5),
        Err(Error::AddressInUse {
            address: Short::new(5),
            holder: f2
        })
    );
    assert_eq!(reg.get(f1).unwrap().short_address(), None);
    reg.release_address(f2).unwrap();
    reg.assign_address(f1, 5).unwrap();
    assert_eq!(reg.holder_of(Short::new(5)).map(|f| f.id()), Some(f1));
    assert!(reg.get(f2).unwrap().commissioned_at().is_none());
}

#[test]
fn release_is_idempotent() {
    let mut reg = registry();
    let id = reg.add_fixture(NewFixture::new("Spot").address(30)).unwrap().id();
    reg.release_address(id).unwrap();
    let version = reg.version();
    reg.release_address(id).unwrap();
    assert_eq!(reg.version(), version);
    assert!(reg.address_space().is_empty());
}

#[test]
fn unknown_fixture() {
    let mut reg = registry();
    let ghost = FixtureId::new();
    assert_eq!(reg.assign_address(ghost, 1), Err(Error::NotFound(ghost)));
    assert_eq!(reg.release_address(ghost), Err(Error::NotFound(ghost)));
    assert_eq!(reg.remove_fixture(ghost).unwrap_err(), Error::NotFound(ghost));
    assert_eq!(reg.set_groups(ghost, GroupMask::from_bits(1)), Err(Error::NotFound(ghost)));
    assert_eq!(reg.assign_address(ghost, 99), Err(Error::OutOfRange(AddressError::Short(99))));
    assert_eq!(reg.version(), 0);
}

#[test]
fn remove_frees_address() {
    let mut reg = registry();
    let id = reg.add_fixture(NewFixture::new("Spot").address(0)).unwrap().id();
    let removed = reg.remove_fixture(id).unwrap();
    assert_eq!(removed.label(), "Spot");
    assert!(reg.is_empty());
    assert!(reg.address_space().is_empty());
    assert_eq!(reg.remove_fixture(id).unwrap_err(), Error::NotFound(id));
    reg.add_fixture(NewFixture::new("Again").address(0)).unwrap();
}

#[test]
fn field_edits() {
    let mut reg = registry();
    let id = reg.add_fixture(NewFixture::new("Spot")).unwrap().id();
    reg.set_groups(id, GroupMask::from_groups([1, 15]).unwrap()).unwrap();
    reg.set_label(id, " Wall Washer ").unwrap();
    assert_eq!(reg.set_label(id, "  "), Err(Error::InvalidLabel));
    reg.set_room(id, Some("Lobby".to_string())).unwrap();
    reg.set_dt_type(id, Some(DtType::Dt8)).unwrap();
    reg.set_notes(id, Some("behind panel".to_string())).unwrap();
    let f = reg.get(id).unwrap();
    assert_eq!(f.groups().to_string(), "G1,G15");
    assert_eq!(f.label(), "Wall Washer");
    assert_eq!(f.room_name(), "Lobby");
    assert_eq!(f.dt_type(), Some(DtType::Dt8));
    assert_eq!(f.notes(), Some("behind panel"));

    reg.set_room(id, Some(" ".to_string())).unwrap();
    assert_eq!(reg.get(id).unwrap().room(), None);
}

#[test]
fn next_free_assignment() {
    let mut reg = registry();
    let ids: Vec<FixtureId> = (0..65)
        .map(|n| reg.add_fixture(NewFixture::new(format!("F{}", n))).unwrap().id())
        .collect();
    assert_eq!(reg.assign_next_free(ids[0], 62), Ok(Short::new(62)));
    assert_eq!(reg.assign_next_free(ids[0], 0), Ok(Short::new(62)));
    assert_eq!(reg.assign_next_free(ids[1], 62), Ok(Short::new(63)));
    assert_eq!(reg.assign_next_free(ids[2], 62), Ok(Short::new(0)));
    for id in &ids[3..64] {
        let a = reg.assign_next_free(*id, 0).unwrap();
        assert_eq!(reg.holder_of(a).map(|f| f.id()), Some(*id));
    }
    assert!(reg.address_space().is_full());
    assert_eq!(reg.next_free(0), Ok(None));
    assert_eq!(reg.assign_next_free(ids[64], 0), Err(Error::AddressSpaceFull));
}

#[test]
fn next_free_start_checked_first() {
    let mut reg = registry();
    let placed = reg.add_fixture(NewFixture::new("Placed").address(5)).unwrap().id();
    let loose = reg.add_fixture(NewFixture::new("Loose")).unwrap().id();
    let out_of_range = Err(Error::OutOfRange(AddressError::Short(70)));
    assert_eq!(reg.assign_next_free(placed, 70), out_of_range);
    assert_eq!(reg.assign_next_free(loose, 70), out_of_range);
    assert_eq!(
        reg.assign_next_free(FixtureId::new(), 70),
        Err(Error::OutOfRange(AddressError::Short(70)))
    );
    assert_eq!(reg.get(loose).unwrap().short_address(), None);
    assert_eq!(reg.address_space().used(), vec![Short::new(5)]);
}

#[test]
fn notification_per_change() {
    let mut reg = registry();
    let mut rx = reg.subscribe();
    assert!(!rx.has_changed().unwrap());

    let id = reg.add_fixture(NewFixture::new("Spot")).unwrap().id();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().version, 1);

    assert!(reg.add_fixture(NewFixture::new("")).is_err());
    assert!(reg.assign_address(id, 70).is_err());
    reg.set_groups(id, GroupMask::NONE).unwrap();
    assert!(!rx.has_changed().unwrap());

    reg.assign_address(id, 2).unwrap();
    reg.set_groups(id, GroupMask::from_bits(4)).unwrap();
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.version, 3);
    assert_eq!(snapshot.fixtures[0].short_address(), Some(Short::new(2)));
    assert_eq!(snapshot.fixtures[0].groups(), GroupMask::from_bits(4));
    assert_eq!(reg.snapshot().version, reg.version());
}

#[test]
fn change_stream() {
    let mut reg = registry();
    let mut changes = reg.changes();
    let id = reg.add_fixture(NewFixture::new("Spot").address(1)).unwrap().id();
    let snapshot = block_on(changes.next()).unwrap();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.fixtures.len(), 1);

    reg.remove_fixture(id).unwrap();
    let snapshot = block_on(changes.next()).unwrap();
    assert_eq!(snapshot.version, 2);
    assert!(snapshot.fixtures.is_empty());
}

#[test]
fn random_operations_keep_addresses_consistent() {
    let mut rng = StdRng::seed_from_u64(0xda11);
    let mut reg = registry();
    let mut ids: Vec<FixtureId> = Vec::new();

    for step in 0..5000 {
        let version = reg.version();
        let id = if ids.is_empty() || rng.gen_ratio(1, 20) {
            FixtureId::new()
        } else {
            ids[rng.gen_range(0..ids.len())]
        };
        let result = match rng.gen_range(0..6) {
            0 | 1 => {
                let mut new = NewFixture::new(format!("Fixture {}", step));
                if rng.gen_bool(0.5) {
                    new = new.address(rng.gen_range(0..70));
                }
                reg.add_fixture(new).map(|f| ids.push(f.id()))
            }
            2 => reg.assign_address(id, rng.gen_range(0..70)),
            3 => reg.release_address(id),
            4 => reg.remove_fixture(id).map(|f| ids.retain(|i| *i != f.id())),
            _ => reg.set_groups(id, GroupMask::from_bits(rng.gen())),
        };
        if result.is_err() {
            assert_eq!(reg.version(), version, "step {}: failed call published", step);
        } else {
            assert!(reg.version() - version <= 1, "step {}: published twice", step);
        }
        assert!(reg.is_consistent(), "step {}", step);
        assert_eq!(reg.address_space().used(), held(&reg), "step {}", step);
        assert_eq!(reg.len(), ids.len());
    }
}

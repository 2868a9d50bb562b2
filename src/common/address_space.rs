use crate::common::address::Short;
use crate::error::Result;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Bit set of the short addresses used within one project.
///
/// Bit `n` is set when some fixture holds short address `n`. The set is
/// derived from the fixtures; only the registry owning it changes it.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct AddressSpace(u64);

impl AddressSpace {
    pub fn new() -> AddressSpace {
        AddressSpace(0)
    }

    pub fn from_slice(addrs: &[Short]) -> AddressSpace {
        addrs.iter().copied().collect()
    }

    pub fn is_free(&self, addr: u8) -> Result<bool> {
        let addr = Short::try_from(addr)?;
        Ok(!self.contains(addr))
    }

    pub fn contains(&self, addr: Short) -> bool {
        (self.0 & (1 << addr.value())) != 0
    }

    pub fn mark_used(&mut self, addr: u8) -> Result<()> {
        *self += Short::try_from(addr)?;
        Ok(())
    }

    pub fn mark_free(&mut self, addr: u8) -> Result<()> {
        *self -= Short::try_from(addr)?;
        Ok(())
    }

    /// First free address at or above `starting_from`, wrapping around to 0 once.
    pub fn next_free(&self, starting_from: u8) -> Result<Option<Short>> {
        let start = Short::try_from(starting_from)?.value();
        Ok((start..64)
            .chain(0..start)
            .map(Short::new)
            .find(|a| !self.contains(*a)))
    }

    pub fn first_free(&self) -> Option<Short> {
        Short::all().find(|a| !self.contains(*a))
    }

    pub fn used(&self) -> Vec<Short> {
        Short::all().filter(|a| self.contains(*a)).collect()
    }

    pub fn used_count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == u64::MAX
    }
}

impl FromIterator<Short> for AddressSpace {
    fn from_iter<I: IntoIterator<Item = Short>>(iter: I) -> Self {
        iter.into_iter().fold(AddressSpace::new(), |s, a| s + a)
    }
}

impl Add<Short> for AddressSpace {
    type Output = AddressSpace;
    fn add(self, b: Short) -> Self::Output {
        Self(self.0 | (1u64 << b.value()))
    }
}

impl AddAssign<Short> for AddressSpace {
    fn add_assign(&mut self, b: Short) {
        self.0 |= 1u64 << b.value();
    }
}

impl Sub<Short> for AddressSpace {
    type Output = AddressSpace;
    fn sub(self, b: Short) -> Self::Output {
        Self(self.0 & !(1u64 << b.value()))
    }
}

impl SubAssign<Short> for AddressSpace {
    fn sub_assign(&mut self, b: Short) {
        self.0 &= !(1u64 << b.value());
    }
}

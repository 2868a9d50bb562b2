use crate::common::address::{AddressError, Short};
use crate::fixture::record::FixtureId;

pub type DynResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Caller supplied an address or group index outside its range
    #[error(transparent)]
    OutOfRange(#[from] AddressError),
    #[error("Short address {address} is already used by fixture {holder}")]
    AddressInUse { address: Short, holder: FixtureId },
    #[error("Fixture label is empty")]
    InvalidLabel,
    #[error("No fixture with id {0}")]
    NotFound(FixtureId),
    #[error("All 64 short addresses are in use")]
    AddressSpaceFull,
}

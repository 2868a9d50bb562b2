use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device type tag recorded for a fixture. Informational only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DtType {
    #[serde(rename = "DT6")]
    Dt6,
    #[serde(rename = "DT8")]
    Dt8,
    #[serde(rename = "D4i")]
    D4i,
}

impl DtType {
    pub fn description(&self) -> &'static str {
        match self {
            DtType::Dt6 => "LED",
            DtType::Dt8 => "Colour",
            DtType::D4i => "LED with D4i extensions",
        }
    }
}

impl fmt::Display for DtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DtType::Dt6 => "DT6",
            DtType::Dt8 => "DT8",
            DtType::D4i => "D4i",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDtType(pub String);

impl fmt::Display for UnknownDtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown device type {}", self.0)
    }
}

impl std::error::Error for UnknownDtType {}

impl FromStr for DtType {
    type Err = UnknownDtType;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dt6" => Ok(DtType::Dt6),
            "dt8" => Ok(DtType::Dt8),
            "d4i" => Ok(DtType::D4i),
            _ => Err(UnknownDtType(s.to_string())),
        }
    }
}

#[test]
fn dt_type_parse() {
    assert_eq!("DT8".parse::<DtType>(), Ok(DtType::Dt8));
    assert_eq!(" d4i ".parse::<DtType>(), Ok(DtType::D4i));
    assert!("DT7".parse::<DtType>().is_err());
    assert_eq!(DtType::D4i.to_string(), "D4i");
    assert_eq!(DtType::Dt8.description(), "Colour");
    assert_eq!(serde_json::to_string(&DtType::Dt6).unwrap(), "\"DT6\"");
}

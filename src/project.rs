use crate::error::{DynResult, Result};
use crate::fixture::record::FixtureRecord;
use crate::fixture::registry::FixtureRegistry;
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> ProjectId {
        ProjectId(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lighting control system the project integrates with
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSystem {
    #[default]
    None,
    Control4,
    Crestron,
    Lutron,
}

impl fmt::Display for ControlSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControlSystem::None => "None",
            ControlSystem::Control4 => "Control4",
            ControlSystem::Crestron => "Crestron",
            ControlSystem::Lutron => "Lutron",
        })
    }
}

impl FromStr for ControlSystem {
    type Err = std::convert::Infallible;

    /// Unknown names map to `None`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "control4" => ControlSystem::Control4,
            "crestron" => ControlSystem::Crestron,
            "lutron" => ControlSystem::Lutron,
            _ => ControlSystem::None,
        })
    }
}

/// A commissioning project as stored by the host.
///
/// The project owns its fixtures. The used address set is not stored; it is
/// rebuilt by [`Project::registry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: ProjectId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub control_system: ControlSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,
    #[serde(default)]
    pub fixtures: Vec<FixtureRecord>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Project {
        Project {
            id: ProjectId::new(),
            title: title.into(),
            created_at: Utc::now(),
            control_system: ControlSystem::None,
            contact_first_name: None,
            contact_last_name: None,
            site_address: None,
            fixtures: Vec::new(),
        }
    }

    pub fn contact_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.contact_first_name, &self.contact_last_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Registry over a copy of the project's fixtures
    pub fn registry(&self) -> Result<FixtureRegistry> {
        FixtureRegistry::load(self.id, self.fixtures.iter().cloned())
    }

    /// Take back the fixtures of a registry for storing
    pub fn store_fixtures(&mut self, registry: &FixtureRegistry) {
        self.fixtures = registry.fixtures().to_vec();
    }

    pub fn from_json<R: Read>(reader: R) -> DynResult<Project> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json<W: Write>(&self, writer: W) -> DynResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

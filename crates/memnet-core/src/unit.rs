//! Unit identifiers and the unit name table
//!
//! A unit is identified by a stable index assigned at insertion and by a
//! unique human-readable name. Neither ever changes for the lifetime of
//! the unit, and units are never removed.

use core::fmt;

use crate::error::{NetworkError, Result};

/// Unique identifier of a unit in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new unit ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Get the ID as a vector index
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

/// Ordered table of unit names with uniqueness enforcement
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    names: Vec<String>,
}

impl UnitTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from a list of names, rejecting duplicates
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.add(name)?;
        }
        Ok(table)
    }

    /// Number of named units
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no units
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Append a unit name, returning its assigned ID
    pub fn add(&mut self, name: impl Into<String>) -> Result<UnitId> {
        let name = name.into();
        if self.contains(&name) {
            return Err(NetworkError::duplicate_unit(name));
        }
        let id = UnitId::new(self.names.len() as u32);
        self.names.push(name);
        Ok(id)
    }

    /// Whether a unit with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up the ID of a named unit
    pub fn id_of(&self, name: &str) -> Result<UnitId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| UnitId::new(i as u32))
            .ok_or_else(|| NetworkError::unknown_unit(name))
    }

    /// Name of a unit, if the ID is in range
    pub fn name_of(&self, id: UnitId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// All names, in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

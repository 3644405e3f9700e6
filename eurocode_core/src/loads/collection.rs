//! Keyed storage of the load cases of a structure
//!
//! [`LoadCollection`] keeps loads in insertion order. That order is the
//! "collection order" used when combination names are built, so two
//! collections filled in the same order always produce identical names.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::Load;
use crate::errors::{CalcError, CalcResult};

/// The load cases of a structure, keyed by unique name.
///
/// # Example
/// ```
/// use eurocode_core::loads::{Load, LoadCollection, LoadType};
///
/// let mut loads = LoadCollection::new();
/// loads.add(Load::new("W0", LoadType::Wind, 0.0, 1.5, 0.6, 0.2, 0.0)).unwrap();
/// loads.add(Load::new("W90", LoadType::Wind, 0.0, 1.5, 0.6, 0.2, 0.0)).unwrap();
///
/// assert_eq!(loads.find_by_type(LoadType::Wind), vec!["W0", "W90"]);
/// assert!(loads.find_by_type(LoadType::Snow).is_empty());
///
/// // Names are unique
/// assert!(loads.add(Load::new("W0", LoadType::Wind, 0.0, 1.5, 0.6, 0.2, 0.0)).is_err());
/// ```
///
/// # JSON Format
///
/// A collection serializes as an array of loads. Deserializing checks the
/// same invariants as [`LoadCollection::add`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Load>", into = "Vec<Load>")]
pub struct LoadCollection {
    loads: IndexMap<String, Load>,
}

impl LoadCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        LoadCollection::default()
    }

    /// Add a load, keyed by its name.
    ///
    /// # Errors
    ///
    /// * [`CalcError::DuplicateName`] - a load with this name is already present
    /// * [`CalcError::InvalidInput`] - the load name is blank
    pub fn add(&mut self, load: Load) -> CalcResult<()> {
        load.validate()?;
        if self.loads.contains_key(&load.name) {
            return Err(CalcError::duplicate_name(&load.name));
        }
        debug!("adding load {}", load);
        self.loads.insert(load.name.clone(), load);
        Ok(())
    }

    /// Add a load (builder pattern)
    pub fn with_load(mut self, load: Load) -> CalcResult<Self> {
        self.add(load)?;
        Ok(self)
    }

    /// Remove a load by name, returning it.
    ///
    /// The relative order of the remaining loads is preserved.
    ///
    /// # Errors
    ///
    /// * [`CalcError::LoadNotFound`] - no load with this name
    pub fn remove(&mut self, name: &str) -> CalcResult<Load> {
        let load = self
            .loads
            .shift_remove(name)
            .ok_or_else(|| CalcError::load_not_found(name))?;
        debug!("removed load '{}'", name);
        Ok(load)
    }

    /// Get a load by name
    pub fn get(&self, name: &str) -> Option<&Load> {
        self.loads.get(name)
    }

    /// Check whether a load name is present
    pub fn contains(&self, name: &str) -> bool {
        self.loads.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Iterate over loads in collection order
    pub fn iter(&self) -> impl Iterator<Item = &Load> {
        self.loads.values()
    }

    /// Load names in collection order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loads.keys().map(String::as_str)
    }

    /// Names of every load of the given type, in collection order.
    ///
    /// Excluded loads are listed too; an empty result is not an error.
    pub fn find_by_type(&self, load_type: LoadType) -> Vec<String> {
        self.loads
            .values()
            .filter(|load| load.load_type == load_type)
            .map(|load| load.name.clone())
            .collect()
    }

    /// Loads of the given type that take part in combinations, in collection order
    pub fn active_by_type(&self, load_type: LoadType) -> Vec<&Load> {
        self.loads
            .values()
            .filter(|load| load.load_type == load_type && load.included_in_combinations)
            .collect()
    }
}

impl TryFrom<Vec<Load>> for LoadCollection {
    type Error = CalcError;

    fn try_from(loads: Vec<Load>) -> Result<Self, Self::Error> {
        let mut collection = LoadCollection::new();
        for load in loads {
            collection.add(load)?;
        }
        Ok(collection)
    }
}

impl From<LoadCollection> for Vec<Load> {
    fn from(collection: LoadCollection) -> Self {
        collection.loads.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a LoadCollection {
    type Item = &'a Load;
    type IntoIter = indexmap::map::Values<'a, String, Load>;

    fn into_iter(self) -> Self::IntoIter {
        self.loads.values()
    }
}

//! # Load Project
//!
//! [`LoadProject`] is the root document for a structure's load cases. It
//! serializes to `.ecl` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! LoadProject
//! ├── meta: ProjectMetadata (schema version, engineer, job, timestamps)
//! ├── settings: DesignSettings (partial factors, tolerance, annex)
//! └── loads: LoadCollection (ordered load cases)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use eurocode_core::project::LoadProject;
//! use eurocode_core::settings::ImposedCategory;
//!
//! let mut project = LoadProject::new("Jane Engineer", "25-042", "Warehouse");
//! project.add_permanent("G1").unwrap();
//! project.add_imposed("Q1", ImposedCategory::E).unwrap();
//! project.add_wind("W0").unwrap();
//!
//! let uls = project.uls_combinations();
//! assert!(uls.contains("ULS: +1.35_G1+1.50_Q1+0.90_W0"));
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::loads::{CombinationSet, Load, LoadCollection};
use crate::settings::{DesignSettings, ImposedCategory};

/// Current schema version for .ecl files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root container for the load cases of one structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProject {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Design settings (partial factors, generation tolerance)
    pub settings: DesignSettings,

    /// Load cases in collection order
    pub loads: LoadCollection,
}

impl LoadProject {
    /// Create a new empty project with default EN 1990 settings.
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, structure: impl Into<String>) -> Self {
        let now = Utc::now();
        LoadProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                structure: structure.into(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            loads: LoadCollection::new(),
        }
    }

    /// Add a load and mark the project modified
    pub fn add_load(&mut self, load: Load) -> CalcResult<()> {
        self.loads.add(load)?;
        self.touch();
        Ok(())
    }

    /// Remove a load by name and mark the project modified
    pub fn remove_load(&mut self, name: &str) -> CalcResult<Load> {
        let load = self.loads.remove(name)?;
        self.touch();
        Ok(load)
    }

    /// Add a permanent action using the project's partial factors
    pub fn add_permanent(&mut self, name: impl Into<String>) -> CalcResult<()> {
        let load = Load::permanent(name, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// Add an imposed load of the given category
    pub fn add_imposed(&mut self, name: impl Into<String>, category: ImposedCategory) -> CalcResult<()> {
        let load = Load::imposed(name, category, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// Add a snow load for the project's snow site class
    pub fn add_snow(&mut self, name: impl Into<String>) -> CalcResult<()> {
        let load = Load::snow(name, self.settings.snow_site, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// Add a wind action
    pub fn add_wind(&mut self, name: impl Into<String>) -> CalcResult<()> {
        let load = Load::wind(name, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// Add a thermal action
    pub fn add_temperature(&mut self, name: impl Into<String>) -> CalcResult<()> {
        let load = Load::temperature(name, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// Add a seismic action
    pub fn add_earthquake(&mut self, name: impl Into<String>) -> CalcResult<()> {
        let load = Load::earthquake(name, &self.settings.partial_factors);
        self.add_load(load)
    }

    /// ULS combinations under the project's generation settings
    pub fn uls_combinations(&self) -> CombinationSet {
        self.loads.get_uls_combinations_with(&self.settings.combinations)
    }

    /// All SLS combinations under the project's generation settings
    pub fn sls_combinations(&self) -> CombinationSet {
        self.loads.get_sls_combinations_with(&self.settings.combinations)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for LoadProject {
    fn default() -> Self {
        LoadProject::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Structure or building description
    pub structure: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

//! Load cases and load combinations per EN 1990
//!
//! This module provides the load case records a structure is described by and
//! the engine that turns them into Eurocode limit-state combinations.
//!
//! # Overview
//!
//! - [`LoadType`] - Action categories (permanent, imposed, wind, snow, ...)
//! - [`Load`] - One load case with its partial and ψ factors
//! - [`LoadCollection`] - The load cases of a structure, keyed by name
//! - [`LoadCombination`] - A generated combination: (load, factor) pairs
//! - [`CombinationSet`] - Generated combinations keyed (and deduplicated) by name
//!
//! # Example
//!
//! ```
//! use eurocode_core::loads::{Load, LoadCollection, LoadType};
//!
//! let mut loads = LoadCollection::new();
//! loads.add(Load::new("G", LoadType::Permanent, 1.0, 1.35, 0.0, 0.0, 0.0)).unwrap();
//! loads.add(Load::new("Q", LoadType::Live, 0.0, 1.5, 0.7, 0.5, 0.3)).unwrap();
//! loads.add(Load::new("W", LoadType::Wind, 0.0, 1.5, 0.6, 0.4, 0.0)).unwrap();
//!
//! let uls = loads.get_uls_combinations();
//! assert_eq!(uls.len(), 2);
//! assert!(uls.contains("ULS: +1.35_G+1.50_Q+0.90_W"));
//! assert!(uls.contains("ULS: +1.35_G+1.05_Q+1.50_W"));
//! ```

pub mod collection;
pub mod combinations;
pub mod generation;
pub mod load_types;

pub use collection::LoadCollection;
pub use combinations::{
    find_governing_combination,
    find_governing_min_max,
    find_minimum_combination,
    format_factor,
    CombinationFactor,
    CombinationSet,
    GoverningResults,
    LoadCombination,
};
pub use load_types::{CombinationType, LoadType};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::{ImposedCategory, PartialFactors, PsiFactors, SnowSite};

/// A single load case: one physical action with its factors.
///
/// Factors are dimensionless. ψ values are conventionally in [0, 1] but are
/// not range checked; a NaN factor is carried through into the combinations.
///
/// # JSON Format
/// ```json
/// {
///   "name": "Q1",
///   "load_type": "LIVE",
///   "gamma_favorable": 0.0,
///   "gamma_unfavorable": 1.5,
///   "psi0": 0.7,
///   "psi1": 0.5,
///   "psi2": 0.3,
///   "included_in_combinations": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Unique identifier within a collection
    pub name: String,

    /// Action category
    pub load_type: LoadType,

    /// Partial factor when the action reduces the design effect
    pub gamma_favorable: f64,

    /// Partial factor when the action increases the design effect
    pub gamma_unfavorable: f64,

    /// Combination value coefficient
    pub psi0: f64,

    /// Frequent value coefficient
    pub psi1: f64,

    /// Quasi-permanent value coefficient
    pub psi2: f64,

    /// Loads with this flag cleared are skipped by the combination generators
    #[serde(default = "default_included")]
    pub included_in_combinations: bool,
}

fn default_included() -> bool {
    true
}

impl Load {
    /// Create a load from explicit factors
    pub fn new(
        name: impl Into<String>,
        load_type: LoadType,
        gamma_favorable: f64,
        gamma_unfavorable: f64,
        psi0: f64,
        psi1: f64,
        psi2: f64,
    ) -> Self {
        Load {
            name: name.into(),
            load_type,
            gamma_favorable,
            gamma_unfavorable,
            psi0,
            psi1,
            psi2,
            included_in_combinations: true,
        }
    }

    /// Permanent action with γG,sup / γG,inf and no ψ reduction
    ///
    /// ```
    /// use eurocode_core::loads::{Load, LoadType};
    /// use eurocode_core::settings::PartialFactors;
    ///
    /// let g = Load::permanent("G1", &PartialFactors::default());
    /// assert_eq!(g.load_type, LoadType::Permanent);
    /// assert_eq!(g.gamma_unfavorable, 1.35);
    /// assert_eq!(g.gamma_favorable, 1.0);
    /// ```
    pub fn permanent(name: impl Into<String>, factors: &PartialFactors) -> Self {
        Load::new(
            name,
            LoadType::Permanent,
            factors.gamma_g_inf,
            factors.gamma_g_sup,
            0.0,
            0.0,
            0.0,
        )
    }

    /// Imposed load of a given EN 1991-1-1 category
    pub fn imposed(name: impl Into<String>, category: ImposedCategory, factors: &PartialFactors) -> Self {
        Load::variable(name, LoadType::Live, category.psi(), factors)
    }

    /// Snow load with the ψ row for the site class
    pub fn snow(name: impl Into<String>, site: SnowSite, factors: &PartialFactors) -> Self {
        Load::variable(name, LoadType::Snow, site.psi(), factors)
    }

    /// Wind action on a building
    pub fn wind(name: impl Into<String>, factors: &PartialFactors) -> Self {
        Load::variable(name, LoadType::Wind, PsiFactors::WIND, factors)
    }

    /// Thermal (non-fire) action on a building
    pub fn temperature(name: impl Into<String>, factors: &PartialFactors) -> Self {
        Load::variable(name, LoadType::Temperature, PsiFactors::TEMPERATURE, factors)
    }

    /// Seismic action, applied at γE in the seismic combination
    pub fn earthquake(name: impl Into<String>, factors: &PartialFactors) -> Self {
        Load::new(name, LoadType::Earthquake, 0.0, factors.gamma_e, 0.0, 0.0, 0.0)
    }

    fn variable(name: impl Into<String>, load_type: LoadType, psi: PsiFactors, factors: &PartialFactors) -> Self {
        Load::new(
            name,
            load_type,
            factors.gamma_q_inf,
            factors.gamma_q_sup,
            psi.psi0,
            psi.psi1,
            psi.psi2,
        )
    }

    /// Replace the ψ factors (builder pattern)
    pub fn with_psi(mut self, psi: PsiFactors) -> Self {
        self.psi0 = psi.psi0;
        self.psi1 = psi.psi1;
        self.psi2 = psi.psi2;
        self
    }

    /// Set whether the generators consider this load (builder pattern)
    pub fn with_included(mut self, included: bool) -> Self {
        self.included_in_combinations = included;
        self
    }

    /// Keep the load in the collection but leave it out of combinations
    pub fn excluded(self) -> Self {
        self.with_included(false)
    }

    /// The three ψ factors as one value
    pub fn psi(&self) -> PsiFactors {
        PsiFactors::new(self.psi0, self.psi1, self.psi2)
    }

    /// Validate the load before it enters a collection
    ///
    /// Only the name is checked; factor values are taken as given.
    pub fn validate(&self) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::invalid_input(
                "name",
                format!("{:?}", self.name),
                "Load name cannot be blank",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Load {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): γ={:.2}/{:.2} ψ={:.2}/{:.2}/{:.2}",
            self.name,
            self.load_type.code(),
            self.gamma_favorable,
            self.gamma_unfavorable,
            self.psi0,
            self.psi1,
            self.psi2
        )
    }
}

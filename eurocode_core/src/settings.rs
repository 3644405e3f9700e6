//! # Design Settings
//!
//! Explicit configuration passed to the combination generators and to the
//! load presets. Nothing here is global state: callers construct a value
//! (usually via `Default`) and hand it in.
//!
//! - [`CombinationSettings`] - knobs of the generation algorithm
//! - [`PartialFactors`] - EN 1990 Table A1.2(B) partial factors
//! - [`PsiFactors`], [`ImposedCategory`], [`SnowSite`] - EN 1990 Table A1.1
//! - [`DesignSettings`] - everything above bundled for a load project

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Terms whose resolved factor is smaller than this are dropped.
pub const COMBO_TOLERANCE: f64 = 0.001;

/// Settings that control combination generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationSettings {
    /// Magnitude below which a resolved factor is omitted from a combination
    pub tolerance: f64,
}

impl CombinationSettings {
    /// Check that the tolerance is a finite, non-negative number
    pub fn validate(&self) -> CalcResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CalcError::invalid_input(
                "tolerance",
                self.tolerance.to_string(),
                "Tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for CombinationSettings {
    fn default() -> Self {
        CombinationSettings {
            tolerance: COMBO_TOLERANCE,
        }
    }
}

/// Partial factors for actions, EN 1990 Table A1.2(B) (set B, eq. 6.10).
///
/// # Example
/// ```
/// use eurocode_core::settings::PartialFactors;
///
/// let factors = PartialFactors::default();
/// assert_eq!(factors.gamma_g_sup, 1.35);
/// assert_eq!(factors.gamma_q_sup, 1.50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialFactors {
    /// Permanent action, unfavourable
    pub gamma_g_sup: f64,
    /// Permanent action, favourable
    pub gamma_g_inf: f64,
    /// Variable action, unfavourable
    pub gamma_q_sup: f64,
    /// Variable action, favourable
    pub gamma_q_inf: f64,
    /// Seismic action (importance factor applied to the design spectrum)
    pub gamma_e: f64,
}

impl Default for PartialFactors {
    fn default() -> Self {
        PartialFactors {
            gamma_g_sup: 1.35,
            gamma_g_inf: 1.00,
            gamma_q_sup: 1.50,
            gamma_q_inf: 0.00,
            gamma_e: 1.00,
        }
    }
}

/// Combination (ψ0), frequent (ψ1) and quasi-permanent (ψ2) coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsiFactors {
    pub psi0: f64,
    pub psi1: f64,
    pub psi2: f64,
}

impl PsiFactors {
    pub const fn new(psi0: f64, psi1: f64, psi2: f64) -> Self {
        PsiFactors { psi0, psi1, psi2 }
    }

    /// All zero (permanent and seismic actions)
    pub const ZERO: PsiFactors = PsiFactors::new(0.0, 0.0, 0.0);

    /// Wind loads on buildings, EN 1990 Table A1.1
    pub const WIND: PsiFactors = PsiFactors::new(0.6, 0.2, 0.0);

    /// Temperature (non-fire) in buildings, EN 1990 Table A1.1
    pub const TEMPERATURE: PsiFactors = PsiFactors::new(0.6, 0.5, 0.0);
}

/// Imposed load categories of EN 1991-1-1, with their Table A1.1 ψ values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImposedCategory {
    /// A - domestic, residential areas
    A,
    /// B - office areas
    B,
    /// C - congregation areas
    C,
    /// D - shopping areas
    D,
    /// E - storage areas
    E,
    /// F - traffic area, vehicle weight ≤ 30 kN
    F,
    /// G - traffic area, 30 kN < vehicle weight ≤ 160 kN
    G,
    /// H - roofs
    H,
}

impl ImposedCategory {
    /// ψ factors for this category
    ///
    /// ```
    /// use eurocode_core::settings::ImposedCategory;
    ///
    /// let psi = ImposedCategory::E.psi();
    /// assert_eq!((psi.psi0, psi.psi1, psi.psi2), (1.0, 0.9, 0.8));
    /// ```
    pub fn psi(&self) -> PsiFactors {
        match self {
            ImposedCategory::A | ImposedCategory::B => PsiFactors::new(0.7, 0.5, 0.3),
            ImposedCategory::C | ImposedCategory::D => PsiFactors::new(0.7, 0.7, 0.6),
            ImposedCategory::E => PsiFactors::new(1.0, 0.9, 0.8),
            ImposedCategory::F => PsiFactors::new(0.7, 0.7, 0.6),
            ImposedCategory::G => PsiFactors::new(0.7, 0.5, 0.3),
            ImposedCategory::H => PsiFactors::ZERO,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ImposedCategory::A => "Domestic, residential areas",
            ImposedCategory::B => "Office areas",
            ImposedCategory::C => "Congregation areas",
            ImposedCategory::D => "Shopping areas",
            ImposedCategory::E => "Storage areas",
            ImposedCategory::F => "Traffic area, vehicle weight <= 30 kN",
            ImposedCategory::G => "Traffic area, 30 kN < vehicle weight <= 160 kN",
            ImposedCategory::H => "Roofs",
        }
    }
}

/// Site classes that select the snow row of Table A1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnowSite {
    /// Finland, Iceland, Norway, Sweden
    Nordic,
    /// Other CEN member states, altitude above 1000 m a.s.l.
    HighAltitude,
    /// Other CEN member states, altitude up to 1000 m a.s.l.
    #[default]
    LowAltitude,
}

impl SnowSite {
    pub fn psi(&self) -> PsiFactors {
        match self {
            SnowSite::Nordic | SnowSite::HighAltitude => PsiFactors::new(0.7, 0.5, 0.2),
            SnowSite::LowAltitude => PsiFactors::new(0.5, 0.2, 0.0),
        }
    }
}

/// Settings stored with a load project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSettings {
    /// Governing standard (e.g., "EN 1990:2002+A1:2005")
    pub code: String,

    /// National annex identifier, if any (e.g., "PT", "UK")
    pub national_annex: Option<String>,

    /// Partial factors used by the load presets
    pub partial_factors: PartialFactors,

    /// Snow site class used by the snow preset
    pub snow_site: SnowSite,

    /// Combination generation settings
    pub combinations: CombinationSettings,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: "EN 1990:2002+A1:2005".to_string(),
            national_annex: None,
            partial_factors: PartialFactors::default(),
            snow_site: SnowSite::default(),
            combinations: CombinationSettings::default(),
        }
    }
}

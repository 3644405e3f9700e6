//! Action and combination classifications per EN 1990
//!
//! [`LoadType`] tags each load case with the category the combination rules
//! select on. [`CombinationType`] is metadata carried by generated
//! combinations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Action categories used by the combination engine.
///
/// # Example
/// ```
/// use eurocode_core::loads::LoadType;
///
/// let wind: LoadType = "wind".parse().unwrap();
/// assert_eq!(wind, LoadType::Wind);
/// assert_eq!(wind.code(), "W");
/// assert!(wind.is_variable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadType {
    /// G - Permanent action (self-weight, finishes, fixed equipment)
    Permanent,
    /// Q - Imposed (live) load
    Live,
    /// W - Wind action
    Wind,
    /// S - Snow load
    Snow,
    /// AE - Seismic action
    Earthquake,
    /// T - Thermal action
    Temperature,
    /// F - Fire
    Fire,
    /// A - Accidental action (impact, explosion)
    Accidental,
    /// O - Any other variable action
    Other,
}

impl LoadType {
    /// All load types in declaration order
    pub const ALL: [LoadType; 9] = [
        LoadType::Permanent,
        LoadType::Live,
        LoadType::Wind,
        LoadType::Snow,
        LoadType::Earthquake,
        LoadType::Temperature,
        LoadType::Fire,
        LoadType::Accidental,
        LoadType::Other,
    ];

    /// Short symbol (G, Q, W, S, E, T, F, A, O)
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Permanent => "G",
            LoadType::Live => "Q",
            LoadType::Wind => "W",
            LoadType::Snow => "S",
            LoadType::Earthquake => "E",
            LoadType::Temperature => "T",
            LoadType::Fire => "F",
            LoadType::Accidental => "A",
            LoadType::Other => "O",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Permanent => "Permanent action",
            LoadType::Live => "Imposed load",
            LoadType::Wind => "Wind action",
            LoadType::Snow => "Snow load",
            LoadType::Earthquake => "Seismic action",
            LoadType::Temperature => "Thermal action",
            LoadType::Fire => "Fire",
            LoadType::Accidental => "Accidental action",
            LoadType::Other => "Other variable action",
        }
    }

    /// Whether this category takes part in the leading/companion rule
    ///
    /// Fire and accidental actions are classified but never enter the
    /// fundamental or serviceability combinations.
    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            LoadType::Live | LoadType::Wind | LoadType::Snow | LoadType::Temperature | LoadType::Other
        )
    }

    /// Parse a load type from its name or code, ignoring case, `-`, `_` and spaces.
    ///
    /// ```
    /// use eurocode_core::loads::LoadType;
    ///
    /// assert_eq!(LoadType::from_string("PERMANENT").unwrap(), LoadType::Permanent);
    /// assert_eq!(LoadType::from_string("g").unwrap(), LoadType::Permanent);
    /// assert!(LoadType::from_string("rain").is_err());
    /// ```
    pub fn from_string(value: &str) -> CalcResult<LoadType> {
        let load_type = match normalize(value).as_str() {
            "PERMANENT" | "G" => LoadType::Permanent,
            "LIVE" | "Q" => LoadType::Live,
            "WIND" | "W" => LoadType::Wind,
            "SNOW" | "S" => LoadType::Snow,
            "EARTHQUAKE" | "E" => LoadType::Earthquake,
            "TEMPERATURE" | "T" => LoadType::Temperature,
            "FIRE" | "F" => LoadType::Fire,
            "ACCIDENTAL" | "A" => LoadType::Accidental,
            "OTHER" | "O" => LoadType::Other,
            _ => return Err(CalcError::unknown_variant("load type", value)),
        };
        Ok(load_type)
    }
}

impl FromStr for LoadType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoadType::from_string(s)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of limit-state combination.
///
/// Carried as metadata; which generator was called decides the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinationType {
    /// Ultimate limit state (fundamental and seismic)
    #[serde(rename = "ULS")]
    Uls,
    /// Serviceability, characteristic (rare) combination
    #[serde(rename = "SLS-K")]
    SlsCharacteristic,
    /// Serviceability, frequent combination
    #[serde(rename = "SLS-FR")]
    SlsFrequent,
    /// Serviceability, quasi-permanent combination
    #[serde(rename = "SLS-QP")]
    SlsQuasiPermanent,
    /// Fatigue limit state
    #[serde(rename = "FLS")]
    Fatigue,
    /// Accidental limit state
    #[serde(rename = "ALS")]
    Accidental,
}

impl CombinationType {
    /// All combination types in declaration order
    pub const ALL: [CombinationType; 6] = [
        CombinationType::Uls,
        CombinationType::SlsCharacteristic,
        CombinationType::SlsFrequent,
        CombinationType::SlsQuasiPermanent,
        CombinationType::Fatigue,
        CombinationType::Accidental,
    ];

    /// Short code (ULS, SLS-K, SLS-FR, SLS-QP, FLS, ALS)
    pub fn code(&self) -> &'static str {
        match self {
            CombinationType::Uls => "ULS",
            CombinationType::SlsCharacteristic => "SLS-K",
            CombinationType::SlsFrequent => "SLS-FR",
            CombinationType::SlsQuasiPermanent => "SLS-QP",
            CombinationType::Fatigue => "FLS",
            CombinationType::Accidental => "ALS",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CombinationType::Uls => "Ultimate limit state",
            CombinationType::SlsCharacteristic => "Serviceability - characteristic",
            CombinationType::SlsFrequent => "Serviceability - frequent",
            CombinationType::SlsQuasiPermanent => "Serviceability - quasi-permanent",
            CombinationType::Fatigue => "Fatigue limit state",
            CombinationType::Accidental => "Accidental limit state",
        }
    }

    /// Whether this is one of the serviceability kinds
    pub fn is_serviceability(&self) -> bool {
        matches!(
            self,
            CombinationType::SlsCharacteristic
                | CombinationType::SlsFrequent
                | CombinationType::SlsQuasiPermanent
        )
    }

    /// Parse a combination type from its code or name.
    ///
    /// ```
    /// use eurocode_core::loads::CombinationType;
    ///
    /// assert_eq!(CombinationType::from_string("SLS-K").unwrap(), CombinationType::SlsCharacteristic);
    /// assert_eq!(CombinationType::from_string("sls_quasi_permanent").unwrap(), CombinationType::SlsQuasiPermanent);
    /// assert!(CombinationType::from_string("SLS").is_err());
    /// ```
    pub fn from_string(value: &str) -> CalcResult<CombinationType> {
        let combination_type = match normalize(value).as_str() {
            "ULS" => CombinationType::Uls,
            "SLSK" | "SLSCHARACTERISTIC" => CombinationType::SlsCharacteristic,
            "SLSFR" | "SLSFREQUENT" => CombinationType::SlsFrequent,
            "SLSQP" | "SLSQUASIPERMANENT" => CombinationType::SlsQuasiPermanent,
            "FLS" | "FATIGUE" => CombinationType::Fatigue,
            "ALS" | "ACCIDENTAL" => CombinationType::Accidental,
            _ => return Err(CalcError::unknown_variant("combination type", value)),
        };
        Ok(combination_type)
    }
}

impl FromStr for CombinationType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CombinationType::from_string(s)
    }
}

impl std::fmt::Display for CombinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

//! Generated load combinations
//!
//! A [`LoadCombination`] is built term by term by the generators in
//! [`super::generation`]. Its name spells out every term and doubles as the
//! deduplication key of [`CombinationSet`]:
//!
//! ```text
//! <PREFIX>: +<factor>_<load>+<factor>_<load>...
//! ```
//!
//! with PREFIX one of `ULS`, `ULS-E`, `SLS-K`, `SLS-FR`, `SLS-QP`. Terms
//! appear permanent loads first, then variable loads, each in collection order.
//! Factors print with two decimals, or three when the third one is
//! significant (see [`format_factor`]), so distinct factor sets never share a
//! name.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::load_types::CombinationType;
use super::Load;

/// One term of a combination: a load and the factor applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationFactor {
    pub load: Load,
    pub factor: f64,
}

/// A factored set of loads for one limit-state check.
///
/// # Example
/// ```
/// use eurocode_core::loads::{CombinationType, Load, LoadCombination, LoadType};
/// use std::collections::HashMap;
///
/// let g = Load::new("G", LoadType::Permanent, 1.0, 1.35, 0.0, 0.0, 0.0);
/// let q = Load::new("Q", LoadType::Live, 0.0, 1.5, 0.7, 0.5, 0.3);
///
/// let mut combo = LoadCombination::new("ULS", CombinationType::Uls);
/// combo.push(g, 1.35);
/// combo.push(q, 1.5);
/// assert_eq!(combo.name, "ULS: +1.35_G+1.50_Q");
///
/// // Scale and sum per-load results (e.g. bending moments in kNm)
/// let moments: HashMap<String, f64> = [("G".to_string(), 100.0), ("Q".to_string(), 40.0)].into();
/// assert!((combo.apply(&moments) - 195.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier, e.g. "ULS: +1.35_G+1.50_Q+0.90_W"
    pub name: String,

    /// Limit-state kind
    pub combination_type: CombinationType,

    /// Participating loads with their resolved factors, in term order
    pub factors: Vec<CombinationFactor>,
}

impl LoadCombination {
    /// Start an empty combination whose name is `"<prefix>: "`
    pub fn new(prefix: &str, combination_type: CombinationType) -> Self {
        LoadCombination {
            name: format!("{}: ", prefix),
            combination_type,
            factors: Vec::new(),
        }
    }

    /// Append a term to both the name and the factor list.
    ///
    /// No tolerance check happens here; the generators decide which terms
    /// are pushed.
    pub fn push(&mut self, load: Load, factor: f64) {
        self.name.push_str(&format!("+{}_{}", format_factor(factor), load.name));
        self.factors.push(CombinationFactor { load, factor });
    }

    /// The prefix the name was started with (e.g. "ULS-E")
    pub fn prefix(&self) -> &str {
        self.name.split(": ").next().unwrap_or_default()
    }

    /// Get the term for a load name
    pub fn get(&self, load_name: &str) -> Option<&CombinationFactor> {
        self.factors.iter().find(|term| term.load.name == load_name)
    }

    /// Factor applied to a load (0.0 if the load does not take part)
    pub fn factor(&self, load_name: &str) -> f64 {
        self.get(load_name).map(|term| term.factor).unwrap_or(0.0)
    }

    /// Check if the load takes part in this combination
    pub fn includes(&self, load_name: &str) -> bool {
        self.get(load_name).is_some()
    }

    /// Participating load names in term order
    pub fn load_names(&self) -> impl Iterator<Item = &str> {
        self.factors.iter().map(|term| term.load.name.as_str())
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Apply this combination to per-load results, returning the factored sum
    ///
    /// Loads without an entry in `effects` contribute nothing.
    pub fn apply(&self, effects: &HashMap<String, f64>) -> f64 {
        self.factors
            .iter()
            .map(|term| term.factor * effects.get(&term.load.name).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Render a factor for a combination name.
///
/// Two decimals by default; three when two would lose the stored value.
/// Injective over factors rounded to three decimals, which is what the
/// generators store.
///
/// ```
/// use eurocode_core::loads::format_factor;
///
/// assert_eq!(format_factor(1.5), "1.50");
/// assert_eq!(format_factor(1.5 * 0.7), "1.05");
/// assert_eq!(format_factor(1.497), "1.497");
/// ```
pub fn format_factor(factor: f64) -> String {
    let two_places = (factor * 100.0).round() / 100.0;
    if (two_places - factor).abs() < 1e-9 {
        format!("{:.2}", factor)
    } else {
        format!("{:.3}", factor)
    }
}

impl std::fmt::Display for LoadCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.combination_type)
    }
}

/// Generated combinations keyed by name, in generation order.
///
/// Inserting a combination whose name is already present is a no-op; this is
/// how the generators collapse identical combinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationSet {
    combinations: IndexMap<String, LoadCombination>,
}

impl CombinationSet {
    pub fn new() -> Self {
        CombinationSet::default()
    }

    /// Insert a combination unless its name is already present.
    ///
    /// Returns `true` when the combination was new.
    pub fn insert(&mut self, combination: LoadCombination) -> bool {
        if self.combinations.contains_key(&combination.name) {
            return false;
        }
        self.combinations.insert(combination.name.clone(), combination);
        true
    }

    /// Insert every combination of `other`, keeping first occurrences
    pub fn merge(&mut self, other: CombinationSet) {
        for combination in other.combinations.into_values() {
            self.insert(combination);
        }
    }

    pub fn get(&self, name: &str) -> Option<&LoadCombination> {
        self.combinations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.combinations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Iterate in generation order
    pub fn iter(&self) -> impl Iterator<Item = &LoadCombination> {
        self.combinations.values()
    }

    /// Combination names in generation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.combinations.keys().map(String::as_str)
    }

    /// Combinations of one kind
    pub fn of_type(&self, combination_type: CombinationType) -> impl Iterator<Item = &LoadCombination> {
        self.iter()
            .filter(move |combination| combination.combination_type == combination_type)
    }

    pub fn into_vec(self) -> Vec<LoadCombination> {
        self.combinations.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a CombinationSet {
    type Item = &'a LoadCombination;
    type IntoIter = indexmap::map::Values<'a, String, LoadCombination>;

    fn into_iter(self) -> Self::IntoIter {
        self.combinations.values()
    }
}

/// Find the governing (maximum) combination result
///
/// Applies every combination to the per-load effects and returns the maximum
/// factored value with the name of the combination that produced it.
///
/// # Example
/// ```
/// use eurocode_core::loads::{find_governing_combination, Load, LoadCollection, LoadType};
/// use std::collections::HashMap;
///
/// let loads = LoadCollection::new()
///     .with_load(Load::new("G", LoadType::Permanent, 1.0, 1.35, 0.0, 0.0, 0.0)).unwrap()
///     .with_load(Load::new("Q", LoadType::Live, 0.0, 1.5, 0.7, 0.5, 0.3)).unwrap()
///     .with_load(Load::new("W", LoadType::Wind, 0.0, 1.5, 0.6, 0.2, 0.0)).unwrap();
///
/// let moments: HashMap<String, f64> =
///     [("G".to_string(), 20.0), ("Q".to_string(), 50.0), ("W".to_string(), 10.0)].into();
///
/// let (max_moment, name) = find_governing_combination(&loads.get_uls_combinations(), &moments);
/// // 1.35*20 + 1.5*50 + 0.9*10 = 111
/// assert!((max_moment - 111.0).abs() < 1e-9);
/// assert_eq!(name, "ULS: +1.35_G+1.50_Q+0.90_W");
/// ```
pub fn find_governing_combination(
    combinations: &CombinationSet,
    effects: &HashMap<String, f64>,
) -> (f64, String) {
    combinations
        .iter()
        .map(|combo| (combo.apply(effects), combo.name.clone()))
        .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, String::new()))
}

/// Find the minimum combination result (critical for uplift and overturning)
pub fn find_minimum_combination(
    combinations: &CombinationSet,
    effects: &HashMap<String, f64>,
) -> (f64, String) {
    combinations
        .iter()
        .map(|combo| (combo.apply(effects), combo.name.clone()))
        .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, String::new()))
}

/// Maximum and minimum combination results found in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningResults {
    pub max_value: f64,
    pub max_combo: String,
    pub min_value: f64,
    pub min_combo: String,
}

/// Find both the maximum and minimum combination results
///
/// Returns `None` for an empty set.
pub fn find_governing_min_max(
    combinations: &CombinationSet,
    effects: &HashMap<String, f64>,
) -> Option<GoverningResults> {
    let mut results: Option<GoverningResults> = None;

    for combo in combinations {
        let value = combo.apply(effects);
        match results.as_mut() {
            None => {
                results = Some(GoverningResults {
                    max_value: value,
                    max_combo: combo.name.clone(),
                    min_value: value,
                    min_combo: combo.name.clone(),
                });
            }
            Some(found) => {
                if value > found.max_value {
                    found.max_value = value;
                    found.max_combo = combo.name.clone();
                }
                if value < found.min_value {
                    found.min_value = value;
                    found.min_combo = combo.name.clone();
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadType;
    use approx::assert_relative_eq;

    fn dead() -> Load {
        Load::new("G", LoadType::Permanent, 1.0, 1.35, 0.0, 0.0, 0.0)
    }

    fn wind() -> Load {
        Load::new("W", LoadType::Wind, 0.0, 1.5, 0.6, 0.2, 0.0)
    }

    fn effects(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(name, value)| (name.to_string(), *value)).collect()
    }

    #[test]
    fn test_push_builds_name() {
        let mut combo = LoadCombination::new("SLS-QP", CombinationType::SlsQuasiPermanent);
        assert_eq!(combo.name, "SLS-QP: ");
        assert!(combo.is_empty());

        combo.push(dead(), 1.0);
        combo.push(wind(), 0.3);
        assert_eq!(combo.name, "SLS-QP: +1.00_G+0.30_W");
        assert_eq!(combo.prefix(), "SLS-QP");
        assert_eq!(combo.len(), 2);
        assert_eq!(combo.load_names().collect::<Vec<_>>(), vec!["G", "W"]);
    }

    #[test]
    fn test_format_factor_keeps_third_decimal() {
        assert_eq!(format_factor(0.9), "0.90");
        assert_eq!(format_factor(-0.5), "-0.50");
        assert_eq!(format_factor(0.075), "0.075");
        assert_eq!(format_factor(1.497), "1.497");
        assert_ne!(format_factor(1.497), format_factor(1.5));
        assert_eq!(format_factor(f64::NAN), "NaN");
    }

    #[test]
    fn test_negative_factor_keeps_sign_in_name() {
        let mut combo = LoadCombination::new("ULS", CombinationType::Uls);
        combo.push(wind(), -0.5);
        assert_eq!(combo.name, "ULS: +-0.50_W");
    }

    #[test]
    fn test_factor_lookup() {
        let mut combo = LoadCombination::new("ULS", CombinationType::Uls);
        combo.push(dead(), 1.35);
        assert_eq!(combo.factor("G"), 1.35);
        assert_eq!(combo.factor("W"), 0.0);
        assert!(combo.includes("G"));
        assert!(!combo.includes("W"));
    }

    #[test]
    fn test_apply_ignores_missing_effects() {
        let mut combo = LoadCombination::new("ULS", CombinationType::Uls);
        combo.push(dead(), 1.35);
        combo.push(wind(), 1.5);
        assert_relative_eq!(combo.apply(&effects(&[("G", 10.0)])), 13.5, epsilon = 1e-12);
    }

    #[test]
    fn test_set_deduplicates_by_name() {
        let mut set = CombinationSet::new();
        let mut a = LoadCombination::new("ULS", CombinationType::Uls);
        a.push(dead(), 1.35);
        let b = a.clone();

        assert!(set.insert(a));
        assert!(!set.insert(b));
        assert_eq!(set.len(), 1);
        assert!(set.contains("ULS: +1.35_G"));
    }

    #[test]
    fn test_merge_keeps_generation_order() {
        let mut first = CombinationSet::new();
        let mut uls = LoadCombination::new("ULS", CombinationType::Uls);
        uls.push(dead(), 1.35);
        first.insert(uls.clone());

        let mut second = CombinationSet::new();
        let mut sls = LoadCombination::new("SLS-K", CombinationType::SlsCharacteristic);
        sls.push(dead(), 1.0);
        second.insert(sls);
        second.insert(uls);

        first.merge(second);
        assert_eq!(
            first.names().collect::<Vec<_>>(),
            vec!["ULS: +1.35_G", "SLS-K: +1.00_G"]
        );
        assert_eq!(first.of_type(CombinationType::SlsCharacteristic).count(), 1);
    }

    #[test]
    fn test_governing_on_empty_set() {
        let set = CombinationSet::new();
        let (value, name) = find_governing_combination(&set, &effects(&[("G", 1.0)]));
        assert_eq!(value, 0.0);
        assert!(name.is_empty());
        assert!(find_governing_min_max(&set, &HashMap::new()).is_none());
    }

    #[test]
    fn test_min_max_uplift() {
        let mut set = CombinationSet::new();

        let mut gravity = LoadCombination::new("ULS", CombinationType::Uls);
        gravity.push(dead(), 1.35);
        set.insert(gravity);

        let mut uplift = LoadCombination::new("ULS", CombinationType::Uls);
        uplift.push(dead(), 1.0);
        uplift.push(wind(), -1.5);
        set.insert(uplift);

        // Roof: G = 10 kN/m down, W = 30 kN/m suction
        let effects = effects(&[("G", 10.0), ("W", 30.0)]);
        let results = find_governing_min_max(&set, &effects).unwrap();
        assert_relative_eq!(results.max_value, 13.5, epsilon = 1e-12);
        assert_eq!(results.max_combo, "ULS: +1.35_G");
        assert_relative_eq!(results.min_value, -35.0, epsilon = 1e-12);
        assert_eq!(results.min_combo, "ULS: +1.00_G+-1.50_W");

        let (min_value, min_name) = find_minimum_combination(&set, &effects);
        assert_eq!(min_value, results.min_value);
        assert_eq!(min_name, results.min_combo);
    }

    #[test]
    fn test_set_serializes_as_map() {
        let mut set = CombinationSet::new();
        let mut combo = LoadCombination::new("ULS", CombinationType::Uls);
        combo.push(dead(), 1.35);
        set.insert(combo);

        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("ULS: +1.35_G").is_some());
        let parsed: CombinationSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, set);
    }
}

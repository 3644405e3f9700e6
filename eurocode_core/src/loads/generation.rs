//! EN 1990 combination generators
//!
//! Every generator follows the same pattern. Variable loads are grouped so
//! that at most one wind and one temperature load act together: one group per
//! (wind, temperature) pair, or one per wind (or temperature) load when the
//! other category is empty, or a single empty group when both are. For each
//! group the variable set is
//!
//! ```text
//! live ++ group ++ snow ++ other
//! ```
//!
//! and each position in that set takes a turn as the leading action.
//!
//! | Generator        | Prefix | Permanent | Leading | Companion |
//! |------------------|--------|-----------|---------|-----------|
//! | ULS fundamental  | ULS    | γ,unf     | γ,unf   | γ,unf·ψ0  |
//! | ULS seismic      | ULS-E  | 1.0       | -       | ψ2        |
//! | SLS character.   | SLS-K  | 1.0       | 1.0     | ψ0        |
//! | SLS frequent     | SLS-FR | 1.0       | ψ1      | ψ2        |
//! | SLS quasi-perm.  | SLS-QP | 1.0       | -       | ψ2        |
//!
//! The seismic combination adds one earthquake load at its own γ,unf; it is
//! produced once per (group, earthquake load) rather than per leading action.
//!
//! Factors are rounded to three decimals and a term whose rounded factor is
//! below the tolerance is left out of both name and factor list. A set with
//! no variable loads produces no fundamental or serviceability combinations.
//! Loads flagged out of combinations are ignored throughout.

use log::{debug, trace, warn};

use super::collection::LoadCollection;
use super::combinations::{CombinationSet, LoadCombination};
use super::load_types::{CombinationType, LoadType};
use super::Load;
use crate::settings::{CombinationSettings, COMBO_TOLERANCE};

/// Factor rule for the generators with a leading action.
struct LeadingRule {
    prefix: &'static str,
    combination_type: CombinationType,
    permanent: fn(&Load) -> f64,
    leading: fn(&Load) -> f64,
    companion: fn(&Load) -> f64,
}

const ULS_FUNDAMENTAL: LeadingRule = LeadingRule {
    prefix: "ULS",
    combination_type: CombinationType::Uls,
    permanent: |load| load.gamma_unfavorable,
    leading: |load| load.gamma_unfavorable,
    companion: |load| load.gamma_unfavorable * load.psi0,
};

const SLS_CHARACTERISTIC: LeadingRule = LeadingRule {
    prefix: "SLS-K",
    combination_type: CombinationType::SlsCharacteristic,
    permanent: |_| 1.0,
    leading: |_| 1.0,
    companion: |load| load.psi0,
};

const SLS_FREQUENT: LeadingRule = LeadingRule {
    prefix: "SLS-FR",
    combination_type: CombinationType::SlsFrequent,
    permanent: |_| 1.0,
    leading: |load| load.psi1,
    companion: |load| load.psi2,
};

const ULS_SEISMIC_PREFIX: &str = "ULS-E";
const SLS_QUASI_PERMANENT_PREFIX: &str = "SLS-QP";

/// Round a resolved factor to three decimals
fn round_factor(factor: f64) -> f64 {
    (factor * 1000.0).round() / 1000.0
}

/// Active loads partitioned by the categories the rules select on.
struct Partition<'a> {
    permanent: Vec<&'a Load>,
    live: Vec<&'a Load>,
    wind: Vec<&'a Load>,
    temperature: Vec<&'a Load>,
    snow: Vec<&'a Load>,
    other: Vec<&'a Load>,
    earthquake: Vec<&'a Load>,
}

impl<'a> Partition<'a> {
    fn of(collection: &'a LoadCollection) -> Self {
        Partition {
            permanent: collection.active_by_type(LoadType::Permanent),
            live: collection.active_by_type(LoadType::Live),
            wind: collection.active_by_type(LoadType::Wind),
            temperature: collection.active_by_type(LoadType::Temperature),
            snow: collection.active_by_type(LoadType::Snow),
            other: collection.active_by_type(LoadType::Other),
            earthquake: collection.active_by_type(LoadType::Earthquake),
        }
    }

    /// Wind/temperature groups: the Cartesian product, or its non-empty side
    fn groups(&self) -> Vec<Vec<&'a Load>> {
        match (self.wind.is_empty(), self.temperature.is_empty()) {
            (false, false) => self
                .wind
                .iter()
                .flat_map(|w| self.temperature.iter().map(move |t| vec![*w, *t]))
                .collect(),
            (false, true) => self.wind.iter().map(|w| vec![*w]).collect(),
            (true, false) => self.temperature.iter().map(|t| vec![*t]).collect(),
            (true, true) => vec![Vec::new()],
        }
    }

    /// One variable set per group, in leading-index order
    fn variable_sets(&self) -> Vec<Vec<&'a Load>> {
        self.groups()
            .into_iter()
            .map(|group| {
                self.live
                    .iter()
                    .copied()
                    .chain(group)
                    .chain(self.snow.iter().copied())
                    .chain(self.other.iter().copied())
                    .collect()
            })
            .collect()
    }
}

/// Builds combinations for one collection under one set of settings.
struct Generator<'a> {
    partition: Partition<'a>,
    tolerance: f64,
}

impl<'a> Generator<'a> {
    /// An unusable tolerance falls back to [`COMBO_TOLERANCE`]
    fn new(collection: &'a LoadCollection, settings: &CombinationSettings) -> Self {
        let tolerance = match settings.validate() {
            Ok(()) => settings.tolerance,
            Err(e) => {
                warn!("{}; using the default tolerance {}", e, COMBO_TOLERANCE);
                COMBO_TOLERANCE
            }
        };
        Generator {
            partition: Partition::of(collection),
            tolerance,
        }
    }

    /// Push a term unless its rounded factor falls below the tolerance
    fn push_term(&self, combo: &mut LoadCombination, load: &Load, factor: f64) {
        let factor = round_factor(factor);
        if factor.abs() < self.tolerance {
            return;
        }
        if !factor.is_finite() {
            warn!("load '{}' resolves to a non-finite factor in {}", load.name, combo.prefix());
        }
        combo.push(load.clone(), factor);
    }

    fn push_permanent(&self, combo: &mut LoadCombination, factor: fn(&Load) -> f64) {
        for load in &self.partition.permanent {
            self.push_term(combo, load, factor(load));
        }
    }

    fn record(combinations: &mut CombinationSet, combo: LoadCombination) {
        trace!("candidate combination {}", combo.name);
        combinations.insert(combo);
    }

    fn leading(&self, rule: &LeadingRule, combinations: &mut CombinationSet) {
        for variable in self.partition.variable_sets() {
            for leading_index in 0..variable.len() {
                let mut combo = LoadCombination::new(rule.prefix, rule.combination_type);
                self.push_permanent(&mut combo, rule.permanent);

                for (i, load) in variable.iter().enumerate() {
                    let factor = if i == leading_index {
                        (rule.leading)(load)
                    } else {
                        (rule.companion)(load)
                    };
                    self.push_term(&mut combo, load, factor);
                }

                Self::record(combinations, combo);
            }
        }
    }

    fn seismic(&self, combinations: &mut CombinationSet) {
        for variable in self.partition.variable_sets() {
            for earthquake in &self.partition.earthquake {
                let mut combo = LoadCombination::new(ULS_SEISMIC_PREFIX, CombinationType::Uls);
                self.push_permanent(&mut combo, |_| 1.0);

                for load in &variable {
                    self.push_term(&mut combo, load, load.psi2);
                }

                // The seismic action is always present, even at a zero factor
                combo.push((*earthquake).clone(), round_factor(earthquake.gamma_unfavorable));

                Self::record(combinations, combo);
            }
        }
    }

    fn quasi_permanent(&self, combinations: &mut CombinationSet) {
        for variable in self.partition.variable_sets() {
            if variable.is_empty() {
                continue;
            }
            let mut combo = LoadCombination::new(SLS_QUASI_PERMANENT_PREFIX, CombinationType::SlsQuasiPermanent);
            self.push_permanent(&mut combo, |_| 1.0);

            for load in &variable {
                self.push_term(&mut combo, load, load.psi2);
            }

            Self::record(combinations, combo);
        }
    }
}

impl LoadCollection {
    /// Ultimate limit state combinations with default settings.
    ///
    /// Fundamental combinations (one per leading variable action in every
    /// wind/temperature group) followed by the seismic combinations (one per
    /// group and earthquake load).
    ///
    /// # Example
    /// ```
    /// use eurocode_core::loads::{Load, LoadCollection, LoadType};
    ///
    /// let loads = LoadCollection::new()
    ///     .with_load(Load::new("G", LoadType::Permanent, 1.0, 1.35, 0.0, 0.0, 0.0)).unwrap()
    ///     .with_load(Load::new("Q", LoadType::Live, 0.0, 1.5, 0.7, 0.5, 0.3)).unwrap()
    ///     .with_load(Load::new("E", LoadType::Earthquake, 0.0, 1.0, 0.0, 0.0, 0.0)).unwrap();
    ///
    /// let uls = loads.get_uls_combinations();
    /// let names: Vec<&str> = uls.names().collect();
    /// assert_eq!(names, vec!["ULS: +1.35_G+1.50_Q", "ULS-E: +1.00_G+0.30_Q+1.00_E"]);
    /// ```
    pub fn get_uls_combinations(&self) -> CombinationSet {
        self.get_uls_combinations_with(&CombinationSettings::default())
    }

    /// Ultimate limit state combinations with explicit settings
    pub fn get_uls_combinations_with(&self, settings: &CombinationSettings) -> CombinationSet {
        let generator = Generator::new(self, settings);
        let mut combinations = CombinationSet::new();
        generator.leading(&ULS_FUNDAMENTAL, &mut combinations);
        let fundamental = combinations.len();
        generator.seismic(&mut combinations);
        debug!(
            "generated {} ULS combinations ({} fundamental, {} seismic) from {} loads",
            combinations.len(),
            fundamental,
            combinations.len() - fundamental,
            self.len()
        );
        combinations
    }

    /// Characteristic serviceability combinations with default settings
    pub fn get_sls_characteristic_combinations(&self) -> CombinationSet {
        self.get_sls_characteristic_combinations_with(&CombinationSettings::default())
    }

    /// Characteristic serviceability combinations with explicit settings
    pub fn get_sls_characteristic_combinations_with(&self, settings: &CombinationSettings) -> CombinationSet {
        let mut combinations = CombinationSet::new();
        Generator::new(self, settings).leading(&SLS_CHARACTERISTIC, &mut combinations);
        debug!("generated {} SLS-K combinations", combinations.len());
        combinations
    }

    /// Frequent serviceability combinations with default settings
    pub fn get_sls_frequent_combinations(&self) -> CombinationSet {
        self.get_sls_frequent_combinations_with(&CombinationSettings::default())
    }

    /// Frequent serviceability combinations with explicit settings
    pub fn get_sls_frequent_combinations_with(&self, settings: &CombinationSettings) -> CombinationSet {
        let mut combinations = CombinationSet::new();
        Generator::new(self, settings).leading(&SLS_FREQUENT, &mut combinations);
        debug!("generated {} SLS-FR combinations", combinations.len());
        combinations
    }

    /// Quasi-permanent serviceability combinations with default settings
    pub fn get_sls_quasi_permanent_combinations(&self) -> CombinationSet {
        self.get_sls_quasi_permanent_combinations_with(&CombinationSettings::default())
    }

    /// Quasi-permanent serviceability combinations with explicit settings
    pub fn get_sls_quasi_permanent_combinations_with(&self, settings: &CombinationSettings) -> CombinationSet {
        let mut combinations = CombinationSet::new();
        Generator::new(self, settings).quasi_permanent(&mut combinations);
        debug!("generated {} SLS-QP combinations", combinations.len());
        combinations
    }

    /// All serviceability combinations: characteristic, frequent, then quasi-permanent
    pub fn get_sls_combinations(&self) -> CombinationSet {
        self.get_sls_combinations_with(&CombinationSettings::default())
    }

    /// All serviceability combinations with explicit settings
    pub fn get_sls_combinations_with(&self, settings: &CombinationSettings) -> CombinationSet {
        let generator = Generator::new(self, settings);
        let mut combinations = CombinationSet::new();
        generator.leading(&SLS_CHARACTERISTIC, &mut combinations);
        generator.leading(&SLS_FREQUENT, &mut combinations);
        generator.quasi_permanent(&mut combinations);
        combinations
    }
}

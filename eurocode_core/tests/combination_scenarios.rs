use std::collections::{HashMap, HashSet};

use approx::assert_relative_eq;
use eurocode_core::loads::{
    find_governing_combination, format_factor, CombinationSet, CombinationType, Load, LoadCollection,
    LoadCombination, LoadType,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load(name: &str, load_type: LoadType, gamma_fav: f64, gamma_unf: f64, psi: (f64, f64, f64)) -> Load {
    Load::new(name, load_type, gamma_fav, gamma_unf, psi.0, psi.1, psi.2)
}

/// G + Q + W, the worked example used throughout
fn simple_building() -> LoadCollection {
    LoadCollection::try_from(vec![
        load("G", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
        load("Q", LoadType::Live, 0.0, 1.5, (0.7, 0.5, 0.3)),
        load("W", LoadType::Wind, 0.0, 1.5, (0.6, 0.4, 0.0)),
    ])
    .unwrap()
}

/// Two wind directions, two thermal cases, snow and two seismic directions
fn full_building() -> LoadCollection {
    LoadCollection::try_from(vec![
        load("DW", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
        load("LL", LoadType::Live, 0.0, 1.5, (0.7, 0.5, 0.3)),
        load("W0", LoadType::Wind, 0.0, 1.5, (0.6, 0.4, 0.0)),
        load("W90", LoadType::Wind, 0.0, 1.5, (0.6, 0.4, 0.0)),
        load("Tint", LoadType::Temperature, 0.0, 1.5, (0.3, 0.0, 0.2)),
        load("Text", LoadType::Temperature, 0.0, 1.5, (0.3, 0.0, 0.1)),
        load("S", LoadType::Snow, 0.0, 1.5, (0.6, 0.3, 0.0)),
        load("E1", LoadType::Earthquake, 0.0, 1.0, (0.0, 0.0, 0.0)),
        load("E2", LoadType::Earthquake, 0.0, 1.0, (0.0, 0.0, 0.0)),
    ])
    .unwrap()
}

fn all_generated(loads: &LoadCollection) -> Vec<CombinationSet> {
    vec![
        loads.get_uls_combinations(),
        loads.get_sls_characteristic_combinations(),
        loads.get_sls_frequent_combinations(),
        loads.get_sls_quasi_permanent_combinations(),
    ]
}

fn rebuilt_name(combo: &LoadCombination) -> String {
    let mut name = format!("{}: ", combo.prefix());
    for term in &combo.factors {
        name.push_str(&format!("+{}_{}", format_factor(term.factor), term.load.name));
    }
    name
}

#[test]
fn test_worked_example_uls() {
    let uls = simple_building().get_uls_combinations();

    assert_eq!(
        uls.names().collect::<Vec<_>>(),
        vec!["ULS: +1.35_G+1.50_Q+0.90_W", "ULS: +1.35_G+1.05_Q+1.50_W"]
    );

    let q_leading = uls.get("ULS: +1.35_G+1.50_Q+0.90_W").unwrap();
    assert_eq!(q_leading.combination_type, CombinationType::Uls);
    assert_relative_eq!(q_leading.factor("G"), 1.35);
    assert_relative_eq!(q_leading.factor("Q"), 1.5);
    assert_relative_eq!(q_leading.factor("W"), 0.9);

    let w_leading = uls.get("ULS: +1.35_G+1.05_Q+1.50_W").unwrap();
    assert_relative_eq!(w_leading.factor("Q"), 1.05);
    assert_relative_eq!(w_leading.factor("W"), 1.5);
}

#[test]
fn test_worked_example_sls() {
    let loads = simple_building();

    assert_eq!(
        loads.get_sls_characteristic_combinations().names().collect::<Vec<_>>(),
        vec!["SLS-K: +1.00_G+1.00_Q+0.60_W", "SLS-K: +1.00_G+0.70_Q+1.00_W"]
    );
    assert_eq!(
        loads.get_sls_frequent_combinations().names().collect::<Vec<_>>(),
        vec!["SLS-FR: +1.00_G+0.50_Q", "SLS-FR: +1.00_G+0.30_Q+0.40_W"]
    );
    assert_eq!(
        loads.get_sls_quasi_permanent_combinations().names().collect::<Vec<_>>(),
        vec!["SLS-QP: +1.00_G+0.30_Q"]
    );
}

#[test]
fn test_leading_load_completeness() {
    let loads = LoadCollection::try_from(vec![
        load("Q", LoadType::Live, 0.0, 1.5, (0.7, 0.5, 0.3)),
        load("W", LoadType::Wind, 0.0, 1.4, (0.5, 0.2, 0.0)),
    ])
    .unwrap();

    let uls = loads.get_uls_combinations();
    assert_eq!(uls.len(), 2);

    let combos = uls.into_vec();
    // Q leading, W companion at 1.4 * 0.5
    assert_relative_eq!(combos[0].factor("Q"), 1.5);
    assert_relative_eq!(combos[0].factor("W"), 0.7);
    // W leading, Q companion at 1.5 * 0.7
    assert_relative_eq!(combos[1].factor("Q"), 1.05);
    assert_relative_eq!(combos[1].factor("W"), 1.4);
}

#[test]
fn test_full_building_counts() {
    init_logging();
    let loads = full_building();

    // 4 wind/temperature groups x 4 leading actions, plus 2 thermal x 2 seismic
    // (wind has ψ2 = 0 so both wind directions collapse in the seismic case)
    let uls = loads.get_uls_combinations();
    assert_eq!(uls.len(), 20);
    assert_eq!(uls.iter().filter(|c| c.prefix() == "ULS").count(), 16);
    assert_eq!(uls.iter().filter(|c| c.prefix() == "ULS-E").count(), 4);

    assert_eq!(loads.get_sls_characteristic_combinations().len(), 16);
    assert_eq!(loads.get_sls_frequent_combinations().len(), 9);
    assert_eq!(loads.get_sls_quasi_permanent_combinations().len(), 2);
    assert_eq!(loads.get_sls_combinations().len(), 16 + 9 + 2);
}

#[test]
fn test_names_are_faithful_and_unique() {
    let loads = full_building();

    for set in all_generated(&loads) {
        let mut factor_sets = HashSet::new();
        for combo in &set {
            assert_eq!(rebuilt_name(combo), combo.name);

            let mut key: Vec<(String, i64)> = combo
                .factors
                .iter()
                .map(|term| (term.load.name.clone(), (term.factor * 1000.0).round() as i64))
                .collect();
            key.sort();
            assert!(factor_sets.insert((combo.prefix().to_string(), key)), "duplicate: {}", combo.name);
        }
    }
}

#[test]
fn test_factors_differing_in_third_decimal_stay_distinct() {
    // Companion factor 1.5 * 0.998 = 1.497 would print as 1.50 at two decimals
    let loads = LoadCollection::try_from(vec![
        load("Q1", LoadType::Live, 0.0, 1.5, (0.998, 0.5, 0.3)),
        load("Q2", LoadType::Live, 0.0, 1.5, (0.998, 0.5, 0.3)),
    ])
    .unwrap();

    let uls = loads.get_uls_combinations();
    assert_eq!(
        uls.names().collect::<Vec<_>>(),
        vec!["ULS: +1.50_Q1+1.497_Q2", "ULS: +1.497_Q1+1.50_Q2"]
    );
    for combo in &uls {
        assert_eq!(rebuilt_name(combo), combo.name);
    }

    let effects: HashMap<String, f64> = [("Q1".to_string(), 10.0), ("Q2".to_string(), 20.0)].into();
    let (max_value, governing) = find_governing_combination(&uls, &effects);
    // 1.497 * 10 + 1.5 * 20
    assert_relative_eq!(max_value, 44.97, epsilon = 1e-9);
    assert_eq!(governing, "ULS: +1.497_Q1+1.50_Q2");
}

#[test]
fn test_near_zero_terms_omitted() {
    let loads = LoadCollection::try_from(vec![
        load("G", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
        load("Q", LoadType::Live, 0.0, 1.5, (0.7, 0.5, 0.3)),
        load("O", LoadType::Other, 0.0, 1.5, (0.0003, 0.0004, 0.0002)),
    ])
    .unwrap();

    for set in all_generated(&loads) {
        for combo in &set {
            for term in &combo.factors {
                assert!(term.factor.abs() >= 0.001, "{} in {}", term.load.name, combo.name);
            }
            // O only ever appears when it leads a ULS or SLS-K combination
            if combo.includes("O") {
                assert!(combo.name.contains("_O"));
                assert!(combo.factor("O") >= 1.0, "{}", combo.name);
            } else {
                assert!(!combo.name.contains("_O"), "{}", combo.name);
            }
        }
    }
}

#[test]
fn test_seismic_isolation() {
    init_logging();
    let loads = full_building();
    let uls = loads.get_uls_combinations();

    let seismic: Vec<&LoadCombination> = uls.iter().filter(|c| c.name.starts_with("ULS-E: ")).collect();
    assert!(!seismic.is_empty());

    for combo in seismic {
        assert_eq!(combo.combination_type, CombinationType::Uls);

        let earthquakes: Vec<_> = combo
            .factors
            .iter()
            .filter(|term| term.load.load_type == LoadType::Earthquake)
            .collect();
        assert_eq!(earthquakes.len(), 1, "{}", combo.name);
        assert_eq!(earthquakes[0].factor, earthquakes[0].load.gamma_unfavorable);

        for term in combo.factors.iter().filter(|t| t.load.load_type == LoadType::Permanent) {
            assert_eq!(term.factor, 1.0);
        }
        for term in combo.factors.iter().filter(|t| t.load.load_type.is_variable()) {
            assert_eq!(term.factor, term.load.psi2);
        }
    }

    // No fundamental combination ever carries an earthquake load
    for combo in uls.iter().filter(|c| c.prefix() == "ULS") {
        assert!(combo.factors.iter().all(|t| t.load.load_type != LoadType::Earthquake));
    }
}

#[test]
fn test_sls_records_every_leading_candidate() {
    let loads = LoadCollection::try_from(vec![
        load("G", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
        load("Q1", LoadType::Live, 0.0, 1.5, (0.7, 0.5, 0.3)),
        load("Q2", LoadType::Live, 0.0, 1.5, (0.6, 0.4, 0.2)),
        load("S", LoadType::Snow, 0.0, 1.5, (0.5, 0.2, 0.1)),
    ])
    .unwrap();

    let characteristic = loads.get_sls_characteristic_combinations();
    assert_eq!(
        characteristic.names().collect::<Vec<_>>(),
        vec![
            "SLS-K: +1.00_G+1.00_Q1+0.60_Q2+0.50_S",
            "SLS-K: +1.00_G+0.70_Q1+1.00_Q2+0.50_S",
            "SLS-K: +1.00_G+0.70_Q1+0.60_Q2+1.00_S",
        ]
    );

    let frequent = loads.get_sls_frequent_combinations();
    assert_eq!(
        frequent.names().collect::<Vec<_>>(),
        vec![
            "SLS-FR: +1.00_G+0.50_Q1+0.20_Q2+0.10_S",
            "SLS-FR: +1.00_G+0.30_Q1+0.40_Q2+0.10_S",
            "SLS-FR: +1.00_G+0.30_Q1+0.20_Q2+0.20_S",
        ]
    );

    // No leading action in the quasi-permanent case
    let quasi_permanent = loads.get_sls_quasi_permanent_combinations();
    assert_eq!(
        quasi_permanent.names().collect::<Vec<_>>(),
        vec!["SLS-QP: +1.00_G+0.30_Q1+0.20_Q2+0.10_S"]
    );
}

#[test]
fn test_permanent_only_yields_nothing() {
    let loads = LoadCollection::try_from(vec![
        load("G1", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
        load("G2", LoadType::Permanent, 1.0, 1.35, (0.0, 0.0, 0.0)),
    ])
    .unwrap();

    for set in all_generated(&loads) {
        assert!(set.is_empty());
    }
    assert!(LoadCollection::new().get_uls_combinations().is_empty());
}

#[test]
fn test_unclassified_actions_never_combined() {
    let mut loads = simple_building();
    loads.add(load("F", LoadType::Fire, 0.0, 1.0, (1.0, 1.0, 1.0))).unwrap();
    loads.add(load("A", LoadType::Accidental, 0.0, 1.0, (1.0, 1.0, 1.0))).unwrap();

    assert_eq!(loads.get_uls_combinations(), simple_building().get_uls_combinations());
    assert_eq!(loads.get_sls_combinations(), simple_building().get_sls_combinations());
}

#[test]
fn test_generation_is_deterministic_and_shareable() {
    let loads = full_building();
    let expected = loads.get_uls_combinations().into_vec();
    let shared = &loads;

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..4 {
            handles.push(scope.spawn(move || shared.get_uls_combinations().into_vec()));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_remove_changes_generated_set() {
    let mut loads = full_building();
    loads.remove("E1").unwrap();
    loads.remove("E2").unwrap();

    let uls = loads.get_uls_combinations();
    assert_eq!(uls.len(), 16);
    assert!(uls.iter().all(|c| c.prefix() == "ULS"));
}

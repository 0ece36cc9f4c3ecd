//! Property tests for the mass matcher.

use chemometrics::matcher::mode::{
    ACCEPTED_ID, COMPOUND, FORMULA, MONOISOTOPIC_MASS, MSMS_INFO, NAME, NEUTRAL_MASS,
};
use chemometrics::{calculate_mass_accuracy, report, CellValue, Table};
use proptest::prelude::*;
use regex::Regex;

fn theoretical(masses: &[f64]) -> Table {
    Table::from_columns(vec![
        (NAME, masses.iter().enumerate().map(|(i, _)| CellValue::String(format!("T{i}"))).collect()),
        (FORMULA, vec![CellValue::Null; masses.len()]),
        (MONOISOTOPIC_MASS, masses.iter().map(|m| CellValue::Float(*m)).collect()),
    ])
    .unwrap()
}

fn experimental(features: &[(f64, bool, bool)]) -> Table {
    Table::from_columns(vec![
        (COMPOUND, (0..features.len()).map(|i| CellValue::String(format!("F{i}"))).collect()),
        (NEUTRAL_MASS, features.iter().map(|f| CellValue::Float(f.0)).collect()),
        (
            ACCEPTED_ID,
            features.iter().map(|f| if f.1 { CellValue::from("ID") } else { CellValue::Null }).collect(),
        ),
        (
            MSMS_INFO,
            features.iter().map(|f| if f.2 { CellValue::from("Yes") } else { CellValue::Null }).collect(),
        ),
    ])
    .unwrap()
}

/// Experimental masses clustered around a few theoretical values so that
/// hits and misses both occur.
fn scenario() -> impl Strategy<Value = (Vec<f64>, Vec<(f64, bool, bool)>)> {
    prop::collection::vec(50.0f64..1000.0, 1..6).prop_flat_map(|theo| {
        let n = theo.len();
        let features = prop::collection::vec(
            (0..n, -20.0f64..20.0, any::<bool>(), any::<bool>()),
            0..20,
        );
        (Just(theo.clone()), features).prop_map(move |(theo, raw)| {
            let features = raw
                .into_iter()
                .map(|(i, ppm, annotated, msms)| (theo[i] * (1.0 + ppm * 1e-6), annotated, msms))
                .collect();
            (theo, features)
        })
    })
}

proptest! {
    #[test]
    fn hit_iff_strictly_within_tolerance(
        (theo, features) in scenario(),
        tolerance in 0.0f64..15.0,
    ) {
        let result = calculate_mass_accuracy(
            &theoretical(&theo),
            &experimental(&features),
            MONOISOTOPIC_MASS,
            NEUTRAL_MASS,
            tolerance,
        ).unwrap();

        for &t in &theo {
            for (i, &(e, annotated, msms)) in features.iter().enumerate() {
                let label = CellValue::String(format!("F{i}"));
                let found = result
                    .records()
                    .any(|r| r.theoretical_mass == t && r.compound == label);
                let eligible = !annotated && msms;
                let inside = 1e6 * (e - t).abs() / e < tolerance;
                prop_assert_eq!(found, eligible && inside);
            }
        }
        prop_assert!(result.len() <= theo.len());
    }

    #[test]
    fn reported_error_has_two_decimals((theo, features) in scenario(), tolerance in 0.0f64..25.0) {
        let result = calculate_mass_accuracy(
            &theoretical(&theo),
            &experimental(&features),
            MONOISOTOPIC_MASS,
            NEUTRAL_MASS,
            tolerance,
        ).unwrap();

        let mut out = Vec::new();
        report::write_csv(&result, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let two_decimals = Regex::new(r"^\d+\.\d{2}$").unwrap();
        for line in text.lines().skip(1) {
            let error = line.rsplit(',').next().unwrap();
            prop_assert!(two_decimals.is_match(error), "{} in {}", error, line);
        }
    }

    #[test]
    fn raising_tolerance_keeps_every_match(
        (theo, features) in scenario(),
        low in 0.0f64..10.0,
        extra in 0.0f64..10.0,
    ) {
        let run = |tolerance: f64| {
            calculate_mass_accuracy(
                &theoretical(&theo),
                &experimental(&features),
                MONOISOTOPIC_MASS,
                NEUTRAL_MASS,
                tolerance,
            ).unwrap()
        };
        let narrow = run(low);
        let wide = run(low + extra);
        for record in narrow.records() {
            prop_assert!(wide.records().any(|r| r == record));
        }
    }
}

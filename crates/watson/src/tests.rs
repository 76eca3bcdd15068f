use approx::{abs_diff_ne, assert_abs_diff_eq};
use test_case::test_case;

use super::*;

fn co2() -> WatsonHamiltonian {
    watson!(4;
        [352.3005875, 2, 2],
        [-352.3005875, -2, -2],
        [631.6153975, 1, 1],
        [-631.6153975, -1, -1],
        [-15.341901966295344, 2, 2, 2],
        [-88.2017421687633, 1, 1, 2],
        [26.25167512727164, 4, 3, 2],
        [0.4207357291666667, 2, 2, 2, 2],
        [4.9425425, 1, 1, 2, 2],
        [2.7821204166666664, 4, 4, 4, 3],
    )
    .unwrap()
}

fn table(energy: &VibrationalEnergy, n: usize) -> Vec<(f64, Vec<i32>)> {
    energy
        .get_vibrational_integral(n)
        .unwrap()
        .iter()
        .map(|fc| (fc.coeff(), fc.modes().to_vec()))
        .collect()
}

#[test]
fn body_order_counts_distinct_modes() {
    let energy = co2().vibrational_energy();
    assert_eq!(
        table(&energy, 1),
        vec![
            (352.3005875, vec![2, 2]),
            (-352.3005875, vec![-2, -2]),
            (631.6153975, vec![1, 1]),
            (-631.6153975, vec![-1, -1]),
            (-15.341901966295344, vec![2, 2, 2]),
            (0.4207357291666667, vec![2, 2, 2, 2]),
        ]
    );
    assert_eq!(
        table(&energy, 2),
        vec![
            (-88.2017421687633, vec![1, 1, 2]),
            (4.9425425, vec![1, 1, 2, 2]),
            (2.7821204166666664, vec![4, 4, 4, 3]),
        ]
    );
    assert_eq!(table(&energy, 3), vec![(26.25167512727164, vec![4, 3, 2])]);
    assert!(energy.get_vibrational_integral(4).is_none());
    assert_eq!(energy.num_modes(), 4);
}

#[test]
fn rederive_is_deterministic() {
    let w = co2();
    let a = VibrationalEnergy::from(&w);
    let b = w.vibrational_energy();
    assert_eq!(a, b);
    assert_abs_diff_eq!(a, b);
}

#[test]
fn empty_tables() {
    let w = WatsonHamiltonian::new(Vec::new(), 2).unwrap();
    let energy = w.vibrational_energy();
    for n in 1..=3 {
        let ints = energy.get_vibrational_integral(n).unwrap();
        assert_eq!(ints.num_body(), n);
        assert!(ints.is_empty());
    }
    assert_eq!(energy.max_body(), 3);
}

#[test]
fn four_body() {
    let w = watson!(4; [1.5, 1, 2, 3, 4], [0.5, 1, 1]).unwrap();
    let energy = w.vibrational_energy();
    assert_eq!(energy.max_body(), 4);
    assert_eq!(table(&energy, 4), vec![(1.5, vec![1, 2, 3, 4])]);
}

#[test_case(vec![1] => WatsonError::IndexCount(1); "too few")]
#[test_case(vec![1, 2, 3, 4, 1] => WatsonError::IndexCount(5); "too many")]
#[test_case(vec![1, 0] => WatsonError::ZeroIndex; "zero")]
fn bad_force_constant(modes: Vec<i32>) -> WatsonError {
    ForceConstant::new(1.0, modes).unwrap_err()
}

#[test]
fn mode_out_of_range() {
    let got = watson!(2; [1.0, 1, 1], [2.0, -3, -3]).unwrap_err();
    assert_eq!(
        got,
        WatsonError::ModeOutOfRange {
            mode: -3,
            num_modes: 2
        }
    );
}

#[test]
fn mirror() {
    let fc = ForceConstant::new(352.3005875, vec![2, 2]).unwrap();
    let got = fc.mirror();
    assert_eq!(got.coeff(), -352.3005875);
    assert_eq!(got.modes(), &[-2, -2]);
    assert_eq!(got.num_body(), 1);
}

#[test]
fn close_within_tolerance() {
    let a = watson!(4; [352.3005875, 2, 2], [-88.2017421687633, 1, 1, 2])
        .unwrap()
        .vibrational_energy();
    let b = watson!(4; [352.30058753, 2, 2], [-88.20174214, 1, 1, 2])
        .unwrap()
        .vibrational_energy();
    assert_abs_diff_eq!(a, b);

    let c = watson!(4; [352.3006, 2, 2], [-88.2017421687633, 1, 1, 2])
        .unwrap()
        .vibrational_energy();
    assert!(abs_diff_ne!(a, c));
}

#[test]
fn modes_must_match_exactly() {
    let a = watson!(4; [42.40478531359112, 4, 4, 2]).unwrap();
    let b = watson!(4; [42.40478531359112, 4, 2, 4]).unwrap();
    assert!(abs_diff_ne!(a.vibrational_energy(), b.vibrational_energy()));
}

/// extra records on either side are a difference, not silently dropped
#[test]
fn length_mismatch_is_not_close() {
    let short = watson!(4; [631.6153975, 1, 1]).unwrap().vibrational_energy();
    let long = watson!(4; [631.6153975, 1, 1], [115.653915, 4, 4])
        .unwrap()
        .vibrational_energy();
    let (s, l) = (
        short.get_vibrational_integral(1).unwrap(),
        long.get_vibrational_integral(1).unwrap(),
    );
    assert!(abs_diff_ne!(s, l));
    assert!(abs_diff_ne!(l, s));
}

#[test]
fn add_replaces_table() {
    let mut energy = co2().vibrational_energy();
    let fc = ForceConstant::new(1.0, vec![1, 2, 3]).unwrap();
    energy.add_vibrational_integral(VibrationalIntegrals::new(3, vec![fc]));
    assert_eq!(table(&energy, 3), vec![(1.0, vec![1, 2, 3])]);
    assert_eq!(table(&energy, 2).len(), 3);
}

#[test]
fn display() {
    let w = watson!(4; [352.3005875, 2, 2], [-88.2017421687633, 1, 1, 2])
        .unwrap();
    let got = w.vibrational_energy().to_string();
    let want = "Vibrational Energy (4 modes):
1-Body Terms:
    2    2              352.300587500000
2-Body Terms:
    1    1    2         -88.201742168763
3-Body Terms:
";
    assert_eq!(got, want);
}

#[test]
fn deserialize_validates() {
    let got: Result<ForceConstant, _> =
        serde_json::from_str(r#"{"coeff": 1.0, "modes": [1]}"#);
    assert!(got.is_err());

    let got: WatsonHamiltonian = serde_json::from_str(
        r#"{"data": [{"coeff": 1.0, "modes": [1, 1]}], "num_modes": 1}"#,
    )
    .unwrap();
    assert_eq!(got.len(), 1);

    let got: Result<WatsonHamiltonian, _> = serde_json::from_str(
        r#"{"data": [{"coeff": 1.0, "modes": [2, 2]}], "num_modes": 1}"#,
    );
    assert!(got.is_err());
}

#[test]
fn deserialize_energy() {
    // the missing 2- and 3-body tables are filled back in
    let got: VibrationalEnergy = serde_json::from_str(
        r#"{"num_modes": 2, "integrals": {"1": {"num_body": 1,
            "integrals": [{"coeff": 1.0, "modes": [1, 1]}]}}}"#,
    )
    .unwrap();
    assert_eq!(got.max_body(), 3);
    assert_eq!(got.get_vibrational_integral(1).unwrap().len(), 1);
    assert!(got.get_vibrational_integral(2).unwrap().is_empty());

    let got: Result<VibrationalEnergy, _> = serde_json::from_str(
        r#"{"num_modes": 2, "integrals": {"2": {"num_body": 1,
            "integrals": []}}}"#,
    );
    assert!(got.is_err());

    let got: Result<VibrationalEnergy, _> = serde_json::from_str(
        r#"{"num_modes": 2, "integrals": {"2": {"num_body": 2,
            "integrals": [{"coeff": 1.0, "modes": [1, 1]}]}}}"#,
    );
    let err = got.unwrap_err().to_string();
    assert!(err.contains("1-body terms in the table of 2-body"), "{err}");
}

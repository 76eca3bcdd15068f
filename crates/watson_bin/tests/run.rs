use assert_cmd::Command;
use insta::{assert_snapshot, with_settings};
use watson::VibrationalEnergy;

const LOG_FILE: &str = "../gaussian/testfiles/co2_anharm.log";

fn watson(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("watson").unwrap();
    let assert = cmd.args(args).assert();
    let output = assert.get_output();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn log_text() {
    let got = watson(&[LOG_FILE]);
    // the coefficients are checked in the gaussian crate, so only the table
    // layout is snapshot here. the filter also eats the padding after short
    // mode lists
    with_settings!({
        filters => vec![(r"(?m) +-?\d+\.\d{12}$", " [coeff]")],
    }, {
        assert_snapshot!(got, @r"
        Vibrational Energy (4 modes):
        1-Body Terms:
            2    2 [coeff]
           -2   -2 [coeff]
            1    1 [coeff]
           -1   -1 [coeff]
            4    4 [coeff]
           -4   -4 [coeff]
            3    3 [coeff]
           -3   -3 [coeff]
            2    2    2 [coeff]
            2    2    2    2 [coeff]
            1    1    1    1 [coeff]
            4    4    4    4 [coeff]
            3    3    3    3 [coeff]
        2-Body Terms:
            1    1    2 [coeff]
            4    4    2 [coeff]
            3    3    2 [coeff]
            1    1    2    2 [coeff]
            4    4    2    2 [coeff]
            3    3    2    2 [coeff]
            4    4    1    1 [coeff]
            3    3    1    1 [coeff]
            4    4    4    3 [coeff]
            4    4    3    3 [coeff]
            4    3    3    3 [coeff]
        3-Body Terms:
            4    3    2 [coeff]
        ");
    });
}

#[test]
fn log_json() {
    let got = watson(&["--json", LOG_FILE]);
    let got: VibrationalEnergy = serde_json::from_str(&got).unwrap();
    assert_eq!(got.num_modes(), 4);
    assert_eq!(got.max_body(), 3);
    let one = got.get_vibrational_integral(1).unwrap();
    assert_eq!(one.len(), 13);
    assert_eq!(one.integrals()[0].modes(), &[2, 2]);
    assert!((one.integrals()[0].coeff() - 352.3005875).abs() < 1e-7);
    assert_eq!(got.get_vibrational_integral(2).unwrap().len(), 11);
    assert_eq!(got.get_vibrational_integral(3).unwrap().len(), 1);
}

#[test]
fn no_normalize() {
    let got = watson(&["--json", "--no-normalize", LOG_FILE]);
    let got: VibrationalEnergy = serde_json::from_str(&got).unwrap();
    let one = got.get_vibrational_integral(1).unwrap();
    assert_eq!(one.integrals()[0].coeff(), 1409.20235 / 2.0);
}

#[test]
fn config() {
    let got = watson(&["--json", "../gaussian/testfiles/co2_log.toml"]);
    let got: VibrationalEnergy = serde_json::from_str(&got).unwrap();
    // co2_log.toml turns normalization off
    let one = got.get_vibrational_integral(1).unwrap();
    assert_eq!(one.integrals()[0].coeff(), 1409.20235 / 2.0);
}

#[test]
fn missing_file() {
    let mut cmd = Command::cargo_bin("watson").unwrap();
    cmd.arg("nothing.log").assert().failure();
}

#[test]
fn log_and_jcf() {
    let mut cmd = Command::cargo_bin("watson").unwrap();
    cmd.args(["--log", "--jcf", LOG_FILE]).assert().failure();
}

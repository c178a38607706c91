use assert_cmd::Command;
use predicates::str::{contains, is_match};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("wimprates").unwrap();
    cmd.env_remove("WIMPRATES_TABLES");
    cmd
}

#[test]
fn elastic_rate_at_one_kev() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--energies", "1"])
        .assert()
        .success()
        .stdout(is_match(r"3\.0[34]\d{2}e1").unwrap())
        .stdout(contains("events/(t yr keV)"));
}

#[test]
fn earth_speed_with_old_convention() {
    cmd()
        .args(["earth", "--v0", "220"])
        .assert()
        .success()
        .stdout(contains("v_earth = 234.4"));
}

#[test]
fn earth_monthly_table() {
    cmd()
        .args(["earth", "--monthly", "2024", "--average", "--samples", "500"])
        .assert()
        .success()
        .stdout(contains("Jun 2024"))
        .stdout(contains("Mean over one year"));
}

#[test]
fn unknown_mechanism_fails() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--mechanism", "neutrino_fog"])
        .assert()
        .failure()
        .stderr(contains("Unsupported detection mechanism"));
}

#[test]
fn unknown_interaction_fails() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--interaction", "SD_x_central"])
        .assert()
        .failure()
        .stderr(contains("Unsupported interaction"));
}

#[test]
fn dme_without_tables_fails() {
    cmd()
        .args(["dme", "--energies", "0.1", "--shell", "4d", "--mass", "1", "--sigma", "4e-44"])
        .assert()
        .failure()
        .stderr(contains("Unsupported target"));
}

#[test]
fn invalid_energy_range_fails() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--energies", "10-1:5"])
        .assert()
        .failure()
        .stderr(contains("Invalid range"));
}

#[test]
fn spectrum_exported_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spectrum.csv");
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--energies", "1-20:5", "--jobs", "2"])
        .arg("--output")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("saved to"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "E_keV,rate,warnings");
    assert_eq!(lines.len(), 6);
    let first: f64 = lines[1].split(',').nth(1).unwrap().parse().unwrap();
    let last: f64 = lines[5].split(',').nth(1).unwrap().parse().unwrap();
    assert!(first > last && last > 0.0);
}

#[test]
fn dme_with_synthetic_tables() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dme_xe_4d.csv"),
        "ln_k,ln_q,log10_ff2\n-5,-3,0\n-5,3,0\n5,-3,0\n5,3,0\n",
    )
    .unwrap();
    cmd()
        .args(["dme", "--energies", "0.1", "--shell", "4d", "--mass", "1", "--sigma", "4e-44"])
        .arg("--tables")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("events/(kg day keV)"));
}

#[test]
fn migdal_without_tables_fails_closed() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--mechanism", "migdal"])
        .assert()
        .failure()
        .stderr(contains("migdal_xe.csv"));
}

#[test]
fn approximate_flag_reports_approximations() {
    cmd()
        .args(["rate", "--mass", "50", "--sigma", "1e-45", "--mechanism", "bremsstrahlung"])
        .arg("--approximate")
        .assert()
        .success()
        .stdout(contains("Xe photon form factor from a built-in approximation"));
}

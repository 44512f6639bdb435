//! End-to-end tests that drive the `qibla` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const CONFIG: &str = r#"
tolerance_degrees = 5.0

[[venues]]
name = "Ponsonby"
location = { latitude = -36.85, longitude = 174.74 }

[venues.rules.events]
fajr = { offset_minutes = 20 }
dhuhr = { fixed_time = "13:30" }

[venues.rules.jumuah.seasonal]
summer = { fixed_time = "13:40" }
winter = { fixed_time = "12:40" }
"#;

const TIMES: &str = "fajr=05:00,sunrise=06:30,dhuhr=12:15,asr=15:40,maghrib=18:20,isha=19:45";

fn qibla_binary() -> String {
    env!("CARGO_BIN_EXE_qibla").to_string()
}

/// Command isolated from the user's config directory.
fn qibla(home: &Path) -> Command {
    let mut command = Command::new(qibla_binary());
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    command
}

fn write_config(home: &Path) -> std::path::PathBuf {
    let path = home.join("qibla.toml");
    std::fs::write(&path, CONFIG).unwrap();
    path
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "qibla should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_direction_from_coordinates() {
    let temp = TempDir::new().unwrap();
    let output = qibla(temp.path())
        .args(["direction", "--lat=-36.85", "--lon=174.76"])
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Qibla:     261.2° (W)"), "{stdout}");
    assert!(stdout.contains("Distance:  15364 km"), "{stdout}");
}

#[test]
fn test_direction_rejects_out_of_range_latitude() {
    let temp = TempDir::new().unwrap();
    let output = qibla(temp.path())
        .args(["direction", "--lat", "95", "--lon", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid --lat/--lon"), "{stderr}");
}

#[test]
fn test_next_rolls_over_after_isha() {
    let temp = TempDir::new().unwrap();
    let output = qibla(temp.path())
        .args(["next", "--times", TIMES, "--at", "20:00", "--json"])
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["name"], "fajr");
    assert_eq!(value["minutes_until"], 540);
    assert_eq!(value["is_tomorrow"], true);
}

#[test]
fn test_next_reads_timetable_file() {
    let temp = TempDir::new().unwrap();
    let timetable = temp.path().join("today.json");
    std::fs::write(&timetable, r#"{"fajr":"05:00","dhuhr":"12:15","asr":"15:40"}"#).unwrap();

    let output = qibla(temp.path())
        .arg("next")
        .arg("--timetable")
        .arg(&timetable)
        .args(["--at", "12:15"])
        .output()
        .unwrap();

    assert_eq!(stdout_of(&output), "Next: asr at 15:40 (in 3h 25m)\n");
}

#[test]
fn test_schedule_for_configured_venue() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = qibla(temp.path())
        .arg("--config")
        .arg(&config)
        .args([
            "schedule",
            "--venue",
            "ponsonby",
            "--times",
            TIMES,
            "--at",
            "12:15",
            "--date",
            "2025-07-04",
        ])
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Ponsonby on 2025-07-04 (winter)\n"), "{stdout}");
    assert!(stdout.contains("  fajr     05:00  iqama 05:20\n"), "{stdout}");
    assert!(stdout.contains("  dhuhr    12:15  iqama 13:30\n"), "{stdout}");
    assert!(stdout.contains("Jumuah: 12:40\n"), "{stdout}");
    assert!(stdout.ends_with("Next: asr at 15:40 (in 3h 25m)\n"), "{stdout}");
}

#[test]
fn test_schedule_summer_flag_switches_jumuah() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = qibla(temp.path())
        .arg("--config")
        .arg(&config)
        .args([
            "schedule", "--venue", "Ponsonby", "--times", TIMES, "--at", "09:00", "--summer",
            "--json",
        ])
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["is_summer"], true);
    assert_eq!(value["jumuah"], "13:40");
}

#[test]
fn test_config_env_override() {
    let temp = TempDir::new().unwrap();
    let output = qibla(temp.path())
        .env("QIBLA_TOLERANCE_DEGREES", "0.5")
        .args(["align", "--target", "90"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            child.stdin.take().unwrap().write_all(b"89\n")?;
            child.wait_with_output()
        })
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(stdout.contains(r#""is_aligned":false"#), "{stdout}");
}

#[test]
fn test_align_reports_bad_lines_and_continues() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let mut child = qibla(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["align", "--venue", "Ponsonby"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"261\nnorth\n400\n100\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = stdout_of(&output);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["is_aligned"], true);
    assert_eq!(lines[1]["is_aligned"], false);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2: `north` is not a heading"), "{stderr}");
    assert!(stderr.contains("line 3: invalid heading 400"), "{stderr}");
}

#[test]
fn test_venues_lists_config() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = qibla(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("venues")
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("- Ponsonby (-36.8500, 174.7400): qibla 261.2° W"),
        "{stdout}"
    );
}

#[test]
fn test_unknown_venue_fails() {
    let temp = TempDir::new().unwrap();
    let output = qibla(temp.path())
        .args(["direction", "--venue", "Nowhere"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown venue `Nowhere`"), "{stderr}");
}

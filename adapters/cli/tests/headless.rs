use std::{fs, path::PathBuf, process::Command};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("snake-arena-{}-{name}", std::process::id()))
}

#[test]
fn headless_run_prints_the_final_frame() {
    let log_file = scratch("headless.log");
    let settings = scratch("quiet.toml");
    fs::write(
        &settings,
        "[spawning]\nweights = { bird = 0, rat = 0, toad = 0, nothing = 1 }\n",
    )
    .expect("write settings");

    let output = Command::new(env!("CARGO_BIN_EXE_snake-arena"))
        .args(["--headless-ticks", "5", "--width", "20", "--height", "10"])
        .arg("--settings")
        .arg(&settings)
        .arg("--log-file")
        .arg(&log_file)
        .env("RUST_LOG", "debug")
        .output()
        .expect("failed to run snake-arena");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.first(), Some(&"Welcome to Snake Arena."));
    assert_eq!(lines.len(), 1 + 10 + 1);
    assert_eq!(lines[1 + 5], "    0000000>");
    assert!(lines[11].starts_with("score 0"));

    let log = fs::read_to_string(&log_file).expect("log file written");
    assert!(log.contains("headless run finished"));
    let _ = fs::remove_file(log_file);
    let _ = fs::remove_file(settings);
}

#[test]
fn settings_file_errors_are_reported() {
    let settings = scratch("bad-settings.toml");
    fs::write(&settings, "sim_hz = 0\n").expect("write settings");
    let log_file = scratch("bad-settings.log");

    let output = Command::new(env!("CARGO_BIN_EXE_snake-arena"))
        .args(["--headless-ticks", "1"])
        .arg("--settings")
        .arg(&settings)
        .arg("--log-file")
        .arg(&log_file)
        .output()
        .expect("failed to run snake-arena");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sim_hz"), "{stderr}");
    let _ = fs::remove_file(settings);
    let _ = fs::remove_file(log_file);
}

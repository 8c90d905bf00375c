use std::{fs, process::Command};

use tempfile::TempDir;

#[test]
fn scripted_session_completes_and_records_a_highscore() {
    let dir = TempDir::new().expect("temp dir");
    let rooms = dir.path().join("rooms");
    fs::create_dir_all(&rooms).expect("rooms dir");
    fs::write(rooms.join("room0.txt"), "BS\n").expect("level written");
    let scores = dir.path().join("data").join("highscores.txt");
    let config = dir.path().join("reef.toml");
    fs::write(
        &config,
        format!(
            "[engine]\ncrab_wander = false\n\n[highscores]\npath = {:?}\n",
            scores.display().to_string()
        ),
    )
    .expect("config written");

    let output = Command::new(env!("CARGO_BIN_EXE_reef"))
        .args(["--levels"])
        .arg(&rooms)
        .arg("--config")
        .arg(&config)
        .args(["--player", "Nemo", "--script", "ad", "--frames"])
        .output()
        .expect("reef runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("all levels completed: 2 moves"), "{stdout}");
    assert_eq!(
        fs::read_to_string(&scores).expect("highscores written"),
        "Nemo;500;2\n"
    );
}

#[test]
fn missing_levels_directory_fails() {
    let dir = TempDir::new().expect("temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_reef"))
        .arg("--levels")
        .arg(dir.path().join("nowhere"))
        .args(["--script", "."])
        .output()
        .expect("reef runs");

    assert!(!output.status.success());
}

//! Configuration loading and command-line overrides.

use std::io::Write;
use std::time::Duration;

use strictly_chessboard::{AppConfig, PlayerKind};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
start_fen = "8/8/8/4k3/8/8/R7/4K3 w - - 0 1"
white_name = "Alice"
black_name = "Bob"
termination_delay_ms = 10
engine_delay_ms = 0
log_file = "board.log"

[board]
reversed = true
black_player_human = false
coordinates_visible = false
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.start_fen(), "8/8/8/4k3/8/8/R7/4K3 w - - 0 1");
    assert_eq!(config.white_name(), "Alice");
    assert_eq!(config.black_name(), "Bob");
    assert_eq!(config.termination_delay(), Duration::from_millis(10));
    assert_eq!(config.engine_delay(), Duration::ZERO);
    assert_eq!(config.log_file().to_str(), Some("board.log"));

    let board = config.board();
    assert!(board.reversed);
    assert!(board.white_player_human);
    assert!(!board.black_player_human);
    assert!(board.last_move_visible);
    assert!(!board.coordinates_visible);
}

#[test]
fn test_partial_config_uses_defaults() {
    let file = write_config("white_name = \"Carol\"\n");
    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.white_name(), "Carol");
    assert_eq!(config.black_name(), "Black");
    assert_eq!(config.termination_delay(), Duration::from_millis(50));
    assert_eq!(config.board(), AppConfig::default().board());
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("white_name = [1, 2\n");
    let err = AppConfig::load_or_default(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_overrides() {
    let config = AppConfig::default().with_overrides(
        Some("k7/8/8/1Q6/8/8/8/7K w - - 0 1".to_string()),
        true,
        Some(PlayerKind::Engine),
        None,
    );
    assert_eq!(config.start_fen(), "k7/8/8/1Q6/8/8/8/7K w - - 0 1");
    assert!(config.board().reversed);
    assert!(!config.board().white_player_human);
    assert!(config.board().black_player_human);

    // Absent overrides leave the file's choices alone.
    let unchanged = config.clone().with_overrides(None, false, None, None);
    assert_eq!(unchanged, config);
}

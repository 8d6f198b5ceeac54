//! Non-interactive replay of SAN move lists.

use std::time::Duration;

use anyhow::{Result, bail};
use strictly_chess::{BoardSession, BoardSettings};
use tracing::{info, instrument};

/// Replays `moves` from `fen` through the external move API and returns the
/// game as PGN.
///
/// Both sides are externally driven, so every move goes through
/// `play_move_san` exactly as an engine's would.
///
/// # Errors
///
/// Fails on a malformed starting position or the first move that is refused.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub async fn replay_to_pgn(
    fen: &str,
    moves: &[String],
    white_name: &str,
    black_name: &str,
    max_width: Option<usize>,
) -> Result<String> {
    let settings = BoardSettings::default()
        .with_white_player_human(false)
        .with_black_player_human(false);
    let (session, _events) = BoardSession::new(settings, 0.0, Duration::ZERO);

    session.update(|board| board.start_new_game(fen)).await?;

    for (index, san) in moves.iter().enumerate() {
        let played = session.update(|board| board.try_play_move_san(san)).await;
        if let Err(e) = played {
            bail!("Move {} ({}) refused: {}", index + 1, san, e);
        }
    }

    let pgn = session
        .game_pgn(
            white_name.to_string(),
            black_name.to_string(),
            "\n".to_string(),
            max_width,
        )
        .await;
    info!("Replay finished");
    Ok(pgn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sans(moves: &[&str]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[tokio::test]
    async fn test_replay_scholars_mate() {
        let moves = sans(&["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"]);
        let pgn = replay_to_pgn("", &moves, "Alice", "Bob", None).await.unwrap();
        assert!(pgn.contains("[White \"Alice\"]"));
        assert!(pgn.contains("[Result \"1-0\"]"));
        assert!(pgn.ends_with("1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0"));
    }

    #[tokio::test]
    async fn test_replay_rejects_illegal_move() {
        let err = replay_to_pgn("", &sans(&["e4", "e4"]), "W", "B", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Move 2 (e4) refused"));
    }

    #[tokio::test]
    async fn test_replay_stops_after_mate() {
        let moves = sans(&["f3", "e5", "g4", "Qh4#", "a3"]);
        assert!(replay_to_pgn("", &moves, "W", "B", None).await.is_err());
    }
}

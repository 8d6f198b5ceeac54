//! End-to-end scenarios against the board controller's public surface.

use shakmaty::{Color, Role};
use strictly_chess::coords::{cell_center, square_to_cell};
use strictly_chessboard::{
    BoardController, BoardEvent, BoardSettings, BoardSquare, Gesture, MoveDone, MoveRequest,
    Point, PositionUpdate,
};
use tokio::sync::mpsc;

const WIDTH: f64 = 480.0;

fn board(settings: BoardSettings) -> (BoardController, mpsc::UnboundedReceiver<BoardEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BoardController::new(settings, WIDTH, tx), rx)
}

fn sq(name: &str) -> BoardSquare {
    BoardSquare::from_name(name).unwrap()
}

fn center(board: &BoardController, name: &str) -> Point {
    cell_center(
        square_to_cell(sq(name), board.settings().reversed),
        board.cell_size(),
    )
}

/// Drags a piece from one square to another and releases it.
fn drag(board: &mut BoardController, from: &str, to: &str) -> bool {
    let start = center(board, from);
    let end = center(board, to);
    board.pointer_down(start.x, start.y);
    board.pointer_move((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    board.pointer_move(end.x, end.y);
    board.pointer_up(end.x, end.y)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn moves_done(events: &[BoardEvent]) -> Vec<&MoveDone> {
    events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::MoveDone(done) => Some(done),
            _ => None,
        })
        .collect()
}

#[test]
fn test_pointer_move_then_manual_reply() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();

    assert!(drag(&mut board, "e2", "e4"));
    let events = drain(&mut rx);
    let done = moves_done(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].move_san(), "e4");
    assert_eq!(*done[0].move_number(), 1);
    assert!(*done[0].white_turn());
    assert_eq!(
        (
            *done[0].from_file_index(),
            *done[0].from_rank_index(),
            *done[0].to_file_index(),
            *done[0].to_rank_index()
        ),
        (4, 1, 4, 3)
    );

    board.set_players(true, false);
    assert!(board.play_move_san("e5"));
    let pawn = board.piece_at(sq("e5")).unwrap();
    assert_eq!((pawn.color, pawn.role), (Color::Black, Role::Pawn));

    let events = drain(&mut rx);
    assert!(!events.contains(&BoardEvent::WaitingManualMove));
    assert_eq!(moves_done(&events)[0].move_fan(), "e5");

    // White handed to an external driver before the check runs.
    board.set_players(false, false);
    board.settle();
    assert_eq!(drain(&mut rx), vec![BoardEvent::WaitingManualMove]);
}

#[test]
fn test_fools_mate_fires_single_checkmate() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();

    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        assert!(drag(&mut board, from, to), "{}-{} should be legal", from, to);
    }
    board.settle();
    board.settle();

    let events = drain(&mut rx);
    let mates: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, BoardEvent::Checkmate { .. }))
        .collect();
    assert_eq!(
        mates,
        vec![&BoardEvent::Checkmate {
            white_was_checkmated: true
        }]
    );
    assert_eq!(moves_done(&events).last().unwrap().move_san(), "Qh4#");
    assert!(!board.game_in_progress());

    let fen = board.current_position();
    assert!(!drag(&mut board, "a2", "a3"));
    assert!(board.gesture().is_idle());
    assert_eq!(board.current_position(), fen);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_set_position_refused_while_running() {
    let (mut board, _rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();
    drag(&mut board, "d2", "d4");
    let fen = board.current_position();
    let last = board.last_move();

    let update = PositionUpdate::new(
        "8/8/8/4k3/8/8/R7/4K3 w - - 0 1".to_string(),
        Some(0),
        Some(0),
        Some(0),
        Some(1),
    );
    assert!(!board.set_position_and_last_move(&update));
    assert_eq!(board.current_position(), fen);
    assert_eq!(board.last_move(), last);
    assert!(board.game_in_progress());
}

#[test]
fn test_set_position_when_stopped() {
    let (mut board, _rx) = board(BoardSettings::default());
    let fen = "8/8/8/4k3/8/8/R7/4K3 b - - 1 1";
    let update = PositionUpdate::new(fen.to_string(), Some(0), Some(0), Some(0), Some(1));
    assert!(board.set_position_and_last_move(&update));
    assert_eq!(board.current_position(), fen);
    assert!(board.arrow().is_some());

    let broken = PositionUpdate::new("not a position".to_string(), Some(0), Some(0), Some(0), Some(1));
    assert!(!board.set_position_and_last_move(&broken));
    assert_eq!(board.current_position(), board.rewind_position());
    assert!(board.last_move().is_none());
}

#[test]
fn test_promotion_to_queen() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("8/P7/8/8/8/7k/8/K7 w - - 0 1").unwrap();

    assert!(!drag(&mut board, "a7", "a8"));
    assert!(matches!(board.gesture(), Gesture::PendingPromotion(_)));
    assert!(drain(&mut rx).is_empty());

    assert!(board.commit_promotion_letter("q"));
    let queen = board.piece_at(sq("a8")).unwrap();
    assert_eq!((queen.color, queen.role), (Color::White, Role::Queen));
    assert!(board.piece_at(sq("a7")).is_none());

    let events = drain(&mut rx);
    let done = moves_done(&events);
    assert_eq!(done.len(), 1);
    assert!(done[0].move_san().ends_with("=Q"));
    assert_eq!(done[0].move_fan(), "a8=♕");
    assert!(!board.commit_promotion_letter("q"));
}

#[test]
fn test_black_promotion_enters_pending() {
    let (mut board, _rx) = board(BoardSettings::default());
    board.start_new_game("K7/8/8/8/8/7k/p7/8 b - - 0 1").unwrap();
    assert!(!drag(&mut board, "a2", "a1"));
    let request = board.gesture().promotion().unwrap();
    assert_eq!(request.target, sq("a1"));
}

#[test]
fn test_illegal_and_offboard_drops_change_nothing() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();
    let fen = board.current_position();

    assert!(!drag(&mut board, "e2", "e5"));
    assert!(!drag(&mut board, "g1", "g3"));

    let e2 = center(&board, "e2");
    assert!(board.pointer_down(e2.x, e2.y));
    assert!(!board.pointer_up(5.0, 5.0));

    assert!(board.pointer_down(e2.x, e2.y));
    board.pointer_leave();
    board.pointer_leave();

    assert!(board.gesture().is_idle());
    assert_eq!(board.current_position(), fen);
    assert!(board.last_move().is_none());
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_reversed_board_maps_pointer() {
    let (mut board, mut rx) = board(BoardSettings::default().with_reversed(true));
    board.start_new_game("").unwrap();

    // The top-left cell of a reversed board is h1.
    assert_eq!(board.square_at(WIDTH * 0.15, WIDTH * 0.15), Some(sq("h1")));
    assert!(drag(&mut board, "e2", "e4"));
    assert_eq!(moves_done(&drain(&mut rx))[0].move_san(), "e4");

    let (mut plain, _rx) = self::board(BoardSettings::default());
    plain.start_new_game("").unwrap();
    drag(&mut plain, "e2", "e4");

    let reversed = board.arrow().unwrap();
    let normal = plain.arrow().unwrap();
    for (a, b) in normal.strokes().iter().zip(reversed.strokes().iter()) {
        assert!((a.pivot().x - (WIDTH - b.pivot().x)).abs() < 1e-9);
        assert!((a.pivot().y - (WIDTH - b.pivot().y)).abs() < 1e-9);
    }
}

#[test]
fn test_start_position_round_trip() {
    let (mut board, _rx) = board(BoardSettings::default());
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "8/8/8/4k3/8/8/R7/4K3 b - - 7 40",
        "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1",
    ] {
        board.start_new_game(fen).unwrap();
        assert_eq!(board.current_position(), fen);
        assert_eq!(board.is_white_turn(), fen.contains(" w "));
    }
}

#[test]
fn test_malformed_start_is_an_error() {
    let (mut board, _rx) = board(BoardSettings::default());
    assert!(board.start_new_game("rnbqkbnr/pppppppp w").is_err());
    assert!(!board.game_in_progress());
}

#[test]
fn test_castling_by_dragging_the_king() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert!(drag(&mut board, "e1", "g1"));
    let events = drain(&mut rx);
    let done = moves_done(&events);
    assert_eq!(done[0].move_san(), "O-O");
    assert_eq!(*done[0].to_file_index(), 6);
    assert_eq!(board.piece_at(sq("f1")).map(|p| p.role), Some(Role::Rook));
}

#[test]
fn test_threefold_repetition() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();
    for _ in 0..2 {
        for (from, to) in [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")] {
            assert!(drag(&mut board, from, to));
        }
    }
    board.settle();
    assert_eq!(drain(&mut rx).last(), Some(&BoardEvent::ThreeFoldRepetition));
    assert!(!board.game_in_progress());
}

#[test]
fn test_stalemate() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("k7/8/8/1Q6/8/8/8/7K w - - 0 1").unwrap();
    assert!(drag(&mut board, "b5", "b6"));
    board.settle();
    assert_eq!(drain(&mut rx).last(), Some(&BoardEvent::Stalemate));
}

#[test]
fn test_insufficient_material() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("8/8/8/4k3/8/8/4p3/4K3 w - - 0 1").unwrap();
    assert!(drag(&mut board, "e1", "e2"));
    board.settle();
    assert_eq!(drain(&mut rx).last(), Some(&BoardEvent::InsufficientMaterial));
}

#[test]
fn test_fifty_move_rule() {
    let (mut board, mut rx) = board(BoardSettings::default());
    board.start_new_game("8/8/8/4k3/8/8/R7/4K3 w - - 99 80").unwrap();
    assert!(drag(&mut board, "a2", "a3"));
    board.settle();
    assert_eq!(drain(&mut rx).last(), Some(&BoardEvent::FiftyMovesRule));
    assert!(!board.game_in_progress());
}

#[test]
fn test_play_move_with_promotion_letter() {
    let settings = BoardSettings::default().with_white_player_human(false);
    let (mut board, mut rx) = board(settings);
    board.start_new_game("8/P7/8/8/8/7k/8/K7 w - - 0 1").unwrap();
    drain(&mut rx);

    assert!(!board.play_move(&MoveRequest::new(0, 6, 0, 7, None)));
    assert!(board.play_move(&MoveRequest::new(0, 6, 0, 7, Some("r".to_string()))));
    assert_eq!(board.piece_at(sq("a8")).map(|p| p.role), Some(Role::Rook));
    assert_eq!(moves_done(&drain(&mut rx))[0].move_san(), "a8=R");
}

#[test]
fn test_pgn_after_pointer_game() {
    let (mut board, _rx) = board(BoardSettings::default());
    board.start_new_game("").unwrap();
    for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3")] {
        drag(&mut board, from, to);
    }
    let pgn = board.game_pgn("Alice", "Bob", "\r\n", None);
    let lines: Vec<&str> = pgn.split("\r\n").collect();
    assert_eq!(lines[0], "[Event \"Casual game\"]");
    assert!(lines.contains(&"[White \"Alice\"]"));
    assert!(lines.contains(&"[Black \"Bob\"]"));
    assert!(lines.contains(&"[Result \"*\"]"));
    assert_eq!(lines.last(), Some(&"1. e4 e5 2. Nf3 *"));
}

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops::{self, slide};
use super::state::{Board, Direction, Score};

/// Which condition ends a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalRule {
    /// The board has no empty cell, even if neighbours could still merge.
    #[default]
    BoardFull,
    /// No direction changes the board.
    NoMoves,
}

impl TerminalRule {
    pub fn is_terminal(self, board: Board) -> bool {
        match self {
            TerminalRule::BoardFull => ops::is_terminal(board),
            TerminalRule::NoMoves => Direction::ALL.iter().all(|&d| !ops::can_move(board, d)),
        }
    }
}

/// Board, score and game-over flag of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub score: Score,
    pub game_over: bool,
}

/// The atomic outcome of applying one direction to one board and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub board: Board,
    pub score: Score,
    pub changed: bool,
    /// Set when the accepted board is terminal, and also when the input board
    /// already was (then `changed` is false and nothing else moved).
    pub game_over: bool,
}

/// Move orchestrator parameterised by the game-over rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    pub terminal_rule: TerminalRule,
}

impl Engine {
    pub fn new(terminal_rule: TerminalRule) -> Self {
        Self { terminal_rule }
    }

    /// Empty board with two spawned tiles, score 0.
    pub fn new_game<R: Rng + ?Sized>(&self, rng: &mut R) -> GameState {
        let board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
        GameState {
            board,
            score: 0,
            game_over: false,
        }
    }

    pub fn restart<R: Rng + ?Sized>(&self, rng: &mut R) -> GameState {
        self.new_game(rng)
    }

    pub fn is_terminal(&self, board: Board) -> bool {
        self.terminal_rule.is_terminal(board)
    }

    /// Apply `direction` to `board`, spawning a tile when anything moved.
    ///
    /// A board that is already terminal is handed back untouched with
    /// `game_over` set, which is how callers learn there is no legal move.
    /// A move that changes nothing returns the inputs as they were and does
    /// not spawn.
    pub fn apply_move<R: Rng + ?Sized>(
        &self,
        board: Board,
        score: Score,
        direction: Direction,
        rng: &mut R,
    ) -> MoveResult {
        if self.is_terminal(board) {
            debug!("move {direction} refused: board already terminal (score {score})");
            return MoveResult {
                board,
                score,
                changed: false,
                game_over: true,
            };
        }

        let slid = slide(board, direction);
        if !slid.changed {
            debug!("move {direction} changed nothing");
            return MoveResult {
                board,
                score,
                changed: false,
                game_over: false,
            };
        }

        let accepted = slid.board.with_random_tile(rng);
        let score = score + slid.gained;
        let game_over = self.is_terminal(accepted);
        if game_over {
            debug!("game over after {direction} with score {score}");
        }
        MoveResult {
            board: accepted,
            score,
            changed: true,
            game_over,
        }
    }
}

/// `Engine::default().new_game(rng)`.
pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    Engine::default().new_game(rng)
}

/// `Engine::default().restart(rng)`.
pub fn restart<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    Engine::default().restart(rng)
}

/// Apply one move under the board-full game-over rule.
///
/// ```
/// use twenty48_core::{apply_move, Board, Direction};
/// use rand::{SeedableRng, rngs::StdRng};
/// let mut rng = StdRng::seed_from_u64(5);
/// let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let result = apply_move(board, 0, Direction::Left, &mut rng);
/// assert!(result.changed);
/// assert_eq!(result.score, 4);
/// ```
pub fn apply_move<R: Rng + ?Sized>(
    board: Board,
    score: Score,
    direction: Direction,
    rng: &mut R,
) -> MoveResult {
    Engine::default().apply_move(board, score, direction, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(rows: [[u32; 4]; 4]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn new_game_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = new_game(&mut rng);
        assert_eq!(g.board.count_tiles(), 2);
        assert_eq!(g.score, 0);
        assert!(!g.game_over);
        assert!(g.board.cells().all(|(_, v)| matches!(v, 0 | 2 | 4)));

        let again = new_game(&mut StdRng::seed_from_u64(1));
        assert_eq!(again, g);
        let r = restart(&mut StdRng::seed_from_u64(1));
        assert_eq!(r, g);
    }

    #[test]
    fn merge_left_then_spawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let r = apply_move(start, 10, Direction::Left, &mut rng);
        assert!(r.changed);
        assert!(!r.game_over);
        assert_eq!(r.score, 14);
        assert_eq!(r.board.get((0, 0)), 4);
        assert_eq!(r.board.count_tiles(), 2);
        let spawned: Vec<_> = r
            .board
            .cells()
            .filter(|&(cell, v)| cell != (0, 0) && v != 0)
            .collect();
        assert_eq!(spawned.len(), 1);
        assert!(matches!(spawned[0].1, 2 | 4));
        // the caller's board is untouched
        assert_eq!(start.row(0), [2, 2, 0, 0]);
    }

    #[test]
    fn noop_move_does_not_spawn() {
        let mut rng = StdRng::seed_from_u64(4);
        let start = board([[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]);
        let r = apply_move(start, 6, Direction::Left, &mut rng);
        assert_eq!(
            r,
            MoveResult {
                board: start,
                score: 6,
                changed: false,
                game_over: false
            }
        );
        assert_eq!(apply_move(r.board, r.score, Direction::Left, &mut rng), r);
    }

    #[test]
    fn terminal_board_is_refused() {
        let mut rng = StdRng::seed_from_u64(5);
        let twos = board([[2; 4]; 4]);
        let r = apply_move(twos, 100, Direction::Right, &mut rng);
        assert_eq!(r.board, twos);
        assert_eq!(r.score, 100);
        assert!(!r.changed);
        assert!(r.game_over);
    }

    #[test]
    fn move_that_fills_board_ends_game() {
        let mut rng = StdRng::seed_from_u64(6);
        // Only (3, 0) opens up after the right shift; the spawn fills it.
        let start = board([
            [2, 4, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 0],
        ]);
        let r = apply_move(start, 0, Direction::Right, &mut rng);
        assert!(r.changed);
        assert!(r.board.is_full());
        assert!(r.game_over);
        assert_eq!(r.score, 0);
    }

    #[test]
    fn no_moves_rule_keeps_mergeable_full_board_alive() {
        let engine = Engine::new(TerminalRule::NoMoves);
        let twos = board([[2; 4]; 4]);
        assert!(!engine.is_terminal(twos));
        let mut rng = StdRng::seed_from_u64(8);
        let r = engine.apply_move(twos, 0, Direction::Right, &mut rng);
        assert!(r.changed);
        assert_eq!(r.score, 32);
        assert!(!r.game_over);

        let locked = board([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(engine.is_terminal(locked));
        assert!(TerminalRule::BoardFull.is_terminal(locked));
    }

    #[test]
    fn terminal_rule_serde_names() {
        let rule: TerminalRule = serde_json::from_str("\"no_moves\"").unwrap();
        assert_eq!(rule, TerminalRule::NoMoves);
        assert_eq!(
            serde_json::to_string(&TerminalRule::BoardFull).unwrap(),
            "\"board_full\""
        );
    }
}

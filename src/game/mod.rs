// Public API
pub use logic::{apply_move, detect_outcome, next_turn, MoveRejection, Outcome, WINNING_LINES};
pub use models::{Board, GameState, Symbol, WinTally, BOARD_SIZE, DEFAULT_OPENING_SYMBOL};

// Internal modules
mod logic;
mod models;

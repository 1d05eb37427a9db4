// Rules of tic-tac-toe as pure functions over GameState.
// Nothing here clears the board: a finished board stays visible until the room resets it.
use serde::{Deserialize, Serialize};

use crate::game::models::{Board, GameState, Symbol, BOARD_SIZE};

/// Every triple that wins: rows, then columns, then diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Symbol),
    Draw,
    Ongoing,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("Cell index {0} is outside the board")]
    OutOfRange(usize),
    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("It is {expected}'s turn, not {claimed}'s")]
    WrongTurn { expected: Symbol, claimed: Symbol },
    #[error("Connection is bound to {bound}, cannot move as {claimed}")]
    SymbolNotBound { bound: Symbol, claimed: Symbol },
    #[error("Connection is not a participant of this room")]
    NotParticipant,
    #[error("Waiting for an opponent")]
    OpponentMissing,
}

pub fn detect_outcome(cells: &Board) -> Outcome {
    for [a, b, c] in WINNING_LINES {
        if let Some(symbol) = cells[a] {
            if cells[b] == Some(symbol) && cells[c] == Some(symbol) {
                return Outcome::Winner(symbol);
            }
        }
    }

    if cells.iter().all(Option::is_some) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

pub fn next_turn(current: Symbol) -> Symbol {
    match current {
        Symbol::X => Symbol::O,
        Symbol::O => Symbol::X,
    }
}

/// Validate and apply a single move.
///
/// The state is only touched once every check has passed. A winning move bumps the
/// winner's tally and becomes `last_resolution`; a draw changes neither. The turn
/// advances on an ongoing board and is left alone on a terminal one.
pub fn apply_move(
    state: &mut GameState,
    cell_index: usize,
    claimed_symbol: Symbol,
) -> Result<Outcome, MoveRejection> {
    if cell_index >= BOARD_SIZE {
        return Err(MoveRejection::OutOfRange(cell_index));
    }

    if state.cells[cell_index].is_some() {
        return Err(MoveRejection::CellOccupied(cell_index));
    }

    if claimed_symbol != state.turn {
        return Err(MoveRejection::WrongTurn {
            expected: state.turn,
            claimed: claimed_symbol,
        });
    }

    state.cells[cell_index] = Some(claimed_symbol);

    let outcome = detect_outcome(&state.cells);
    match outcome {
        Outcome::Winner(symbol) => {
            state.win_counts.record_win(symbol);
            state.last_resolution = Some(symbol);
        }
        Outcome::Draw => {}
        Outcome::Ongoing => {
            state.turn = next_turn(state.turn);
        }
    }

    Ok(outcome)
}

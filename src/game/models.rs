use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

/// Number of cells on the board, indexed 0..=8 row by row
pub const BOARD_SIZE: usize = 9;

/// Symbol that opens a match when no previous match has a winner
pub const DEFAULT_OPENING_SYMBOL: Symbol = Symbol::X;

/// One of the two markers a participant plays as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Symbol {
    X,
    O,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Symbol::X => "X",
                Symbol::O => "O",
            }
        )
    }
}

pub type Board = [Option<Symbol>; BOARD_SIZE];

/// Wins per symbol, kept for as long as the owning room lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    pub x: u32,
    pub o: u32,
}

impl WinTally {
    pub fn get(&self, symbol: Symbol) -> u32 {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }

    pub fn record_win(&mut self, symbol: Symbol) {
        match symbol {
            Symbol::X => self.x += 1,
            Symbol::O => self.o += 1,
        }
    }
}

/// Authoritative state of one room's board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub cells: Board,
    pub turn: Symbol,
    pub win_counts: WinTally,
    pub last_resolution: Option<Symbol>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            turn: DEFAULT_OPENING_SYMBOL,
            win_counts: WinTally::default(),
            last_resolution: None,
        }
    }

    /// Symbol allowed to move first in the next match
    pub fn opening_turn(&self) -> Symbol {
        self.last_resolution.unwrap_or(DEFAULT_OPENING_SYMBOL)
    }

    pub fn clear_board(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

use serde::{Deserialize, Serialize};

use super::errors::RoomError;
use crate::game::{apply_move, GameState, MoveRejection, Outcome, Symbol, WinTally};

/// A room seats at most two participants
pub const MAX_PARTICIPANTS: usize = 2;

/// A connection admitted to a room, bound to one symbol for as long as it stays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub connection_id: String,
    pub display_name: String,
    pub symbol: Symbol,
}

/// Summary of a finished match, taken before the board is cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// `None` for a draw
    pub winner: Option<Symbol>,
    pub player_x_name: String,
    pub player_o_name: String,
    pub win_counts: WinTally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    Continue { next_turn: Symbol },
    Finished(MatchResult),
}

/// What an accepted move did to the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub cell_index: usize,
    pub symbol: Symbol,
    pub resolution: MoveResolution,
}

/// One isolated two-participant match
#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    participants: Vec<Participant>, // join order
    state: GameState,
}

impl Room {
    /// Creates an empty room with a fresh game state and zeroed tallies
    pub fn new(id: String) -> Self {
        Self {
            id,
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            state: GameState::new(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, connection_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
    }

    pub fn participant_with_symbol(&self, symbol: Symbol) -> Option<&Participant> {
        self.participants.iter().find(|p| p.symbol == symbol)
    }

    pub fn connection_ids(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Seats a connection. The first seat of an empty room plays X; the second seat
    /// takes whichever symbol is still free, so a room refilled after a departure
    /// never ends up with two participants on the same symbol.
    pub fn admit(
        &mut self,
        connection_id: String,
        display_name: String,
    ) -> Result<Participant, RoomError> {
        if let Some(existing) = self.participant(&connection_id) {
            return Ok(existing.clone());
        }

        if self.is_full() {
            return Err(RoomError::RoomFull);
        }

        let symbol = if self.participant_with_symbol(Symbol::X).is_some() {
            Symbol::O
        } else {
            Symbol::X
        };

        let participant = Participant {
            connection_id,
            display_name,
            symbol,
        };
        self.participants.push(participant.clone());

        Ok(participant)
    }

    /// Removes a participant. The flag tells the caller the room is now empty and must go.
    pub fn remove(&mut self, connection_id: &str) -> (Option<Participant>, bool) {
        let removed = self
            .participants
            .iter()
            .position(|p| p.connection_id == connection_id)
            .map(|index| self.participants.remove(index));

        (removed, self.participants.is_empty())
    }

    /// Applies a move on behalf of a seated connection.
    ///
    /// The claimed symbol has to match the symbol bound to the connection at admission,
    /// and then the current turn. A finishing move clears the board right away but leaves
    /// the turn untouched until `request_reset`.
    pub fn submit_move(
        &mut self,
        connection_id: &str,
        cell_index: usize,
        claimed_symbol: Symbol,
    ) -> Result<MoveOutcome, RoomError> {
        if self.participants.len() < MAX_PARTICIPANTS {
            return Err(MoveRejection::OpponentMissing.into());
        }

        let bound = self
            .participant(connection_id)
            .map(|p| p.symbol)
            .ok_or(MoveRejection::NotParticipant)?;

        if bound != claimed_symbol {
            return Err(MoveRejection::SymbolNotBound {
                bound,
                claimed: claimed_symbol,
            }
            .into());
        }

        let outcome = apply_move(&mut self.state, cell_index, claimed_symbol)?;

        let resolution = match outcome {
            Outcome::Ongoing => MoveResolution::Continue {
                next_turn: self.state.turn,
            },
            Outcome::Winner(symbol) => MoveResolution::Finished(self.finish_match(Some(symbol))),
            Outcome::Draw => MoveResolution::Finished(self.finish_match(None)),
        };

        Ok(MoveOutcome {
            cell_index,
            symbol: claimed_symbol,
            resolution,
        })
    }

    /// Clears the board for the next match and hands the opening move to the last
    /// winner, or X if nobody has won yet. Tallies are kept.
    pub fn request_reset(&mut self) -> Symbol {
        self.state.clear_board();
        self.state.turn = self.state.opening_turn();
        self.state.turn
    }

    fn finish_match(&mut self, winner: Option<Symbol>) -> MatchResult {
        let name_of = |symbol| {
            self.participant_with_symbol(symbol)
                .map(|p| p.display_name.clone())
                .unwrap_or_default()
        };

        let result = MatchResult {
            winner,
            player_x_name: name_of(Symbol::X),
            player_o_name: name_of(Symbol::O),
            win_counts: self.state.win_counts,
        };

        self.state.clear_board();
        result
    }
}

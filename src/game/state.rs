use rand::Rng;

use super::board::{Board, Cell, CELLS};
use super::player::Player;
use crate::error::EngineError;

/// Status of a game. `Draw` and `Won` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Draw,
    Won(Player),
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Playing
    }
}

/// One game of tic-tac-toe: a board, whose turn it is, and a status derived
/// from the board after every accepted move.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Player,
    status: GameStatus,
}

impl Game {
    /// Create a fresh game: empty board, X to move.
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            turn: Player::X,
            status: GameStatus::Playing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Submit a move for `player` at `slot`.
    ///
    /// Fails with [`EngineError::IllegalMove`] when it is not `player`'s turn
    /// (the board and turn are left untouched) and with
    /// [`EngineError::GameOver`] once the status is terminal.
    ///
    /// A move onto an occupied slot is NOT an error: the board is left
    /// unchanged but the turn still passes to the other player. This lets a
    /// side effectively pass by targeting a filled cell; the training loop
    /// relies on this behavior, so callers must account for it.
    pub fn perform_move(&mut self, player: Player, slot: usize) -> Result<GameStatus, EngineError> {
        if self.status.is_terminal() {
            return Err(EngineError::GameOver);
        }
        if slot >= CELLS {
            return Err(EngineError::SlotOutOfRange { slot });
        }
        if player != self.turn {
            return Err(EngineError::IllegalMove {
                player,
                turn: self.turn,
            });
        }

        if self.board.get(slot) == Cell::Empty {
            self.board.set(slot, player.to_cell());
        }
        self.status = self.derive_status();
        self.turn = self.turn.other();
        Ok(self.status)
    }

    /// Submit a uniformly random move among the currently empty slots for
    /// `player`. Fails the same way as [`Game::perform_move`]; a full board
    /// is always terminal, so that case surfaces as
    /// [`EngineError::GameOver`].
    pub fn perform_random_move<R: Rng + ?Sized>(
        &mut self,
        player: Player,
        rng: &mut R,
    ) -> Result<GameStatus, EngineError> {
        let open = self.board.open_slots();
        if open.is_empty() {
            return Err(EngineError::GameOver);
        }
        let slot = open[rng.random_range(0..open.len())];
        self.perform_move(player, slot)
    }

    /// Flat numeric encoding of the board for the policy network.
    pub fn board_state(&self) -> [f32; CELLS] {
        self.board.encode()
    }

    fn derive_status(&self) -> GameStatus {
        if let Some(winner) = self.board.winner() {
            return GameStatus::Won(winner);
        }
        if self.board.is_full() {
            return GameStatus::Draw;
        }
        GameStatus::Playing
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

//! Core tic-tac-toe game logic: flat board representation, player types, and
//! the turn-enforcing game state machine.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, CELLS, WINNING_TRIPLES};
pub use player::Player;
pub use state::{Game, GameStatus};

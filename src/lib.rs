pub mod board;
pub mod config;
pub mod connectivity;
pub mod game;
pub mod moves;
pub mod web;

pub use board::*;
pub use config::*;
pub use connectivity::*;
pub use game::*;
pub use moves::*;

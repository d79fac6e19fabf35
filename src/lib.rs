//! TERMTRIS - falling blocks in the terminal
//!
//! The engine (`board`, `piece`, `game`, `score`, `render`) has no terminal
//! dependencies beyond colors; `input`, `session` and `ui` are the shell the
//! binary wires around it.

pub mod board;
pub mod game;
pub mod input;
pub mod piece;
pub mod randomizer;
pub mod render;
pub mod score;
pub mod session;
pub mod settings;
pub mod tetromino;
pub mod ui;

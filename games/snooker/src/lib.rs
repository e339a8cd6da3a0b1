use wasm_bindgen::prelude::*;
use baize_engine::*;

pub mod balls;
pub mod game;
pub mod geometry;
pub mod predictor;
pub mod rack;
pub mod rules;
pub mod settings;
pub mod shot;
pub mod table;

use game::SnookerGame;

baize_web::export_game!(SnookerGame, "snooker");

pub mod config;
pub mod deck;
pub mod display;
pub mod favorites;
pub mod models;
pub mod player;
pub mod updater;

pub mod assets;
pub mod config;
pub mod effects;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod input;
pub mod levels;
pub mod records;

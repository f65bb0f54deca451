pub mod actors;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod rng;
pub mod types;
pub mod world;

pub use config::DungeonConfig;
pub use engine::DungeonGame;
pub use error::DungeonError;
pub use rng::{RandomSource, Rng, ScriptedRandom, SystemRandom};
pub use world::{generate_dungeon, GeneratedDungeon};

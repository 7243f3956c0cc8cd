pub mod clock;
pub mod deck_generator;
pub mod game_engine;
pub mod leaderboard;
pub mod scheduler;
pub mod settings;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use deck_generator::{generate_deck, DeckShuffler, FixedPermutation, RandomShuffler};
pub use game_engine::GameEngine;
pub use leaderboard::Leaderboard;
pub use settings::{AttemptPolicy, Settings};
pub use store::{FileStore, KeyValueStore, MemoryStore};

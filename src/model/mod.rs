mod card;
mod deck;
mod game_engine_command;
mod game_engine_event;
mod game_stats;
mod session_phase;
pub mod session_snapshot;
mod tile;
mod timer_state;

pub use card::{catalog, CardId, CARD_IMAGES, FACE_DOWN_IMAGE};
pub use deck::{Deck, DECK_COLUMNS};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::GameEngineEvent;
pub use game_stats::{Outcome, RankingEntry, SessionStats};
pub use session_phase::SessionPhase;
pub use session_snapshot::{SessionSnapshot, TileView};
pub use tile::Tile;
pub use timer_state::TimerState;

// The game core: session state machine, config, randomness and headless play.
// Rendering and input mapping live in the binary.
pub mod app_dirs;
pub mod autoplay;
pub mod config;
pub mod dice;
pub mod phase;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod util;

pub use config::{ConfigError, GameConfig};
pub use phase::{Activity, DayPhase, EndState, Tint};
pub use session::{Input, Session};
pub use snapshot::SessionSnapshot;

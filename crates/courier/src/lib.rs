//! SkyCourier game core: flight control, missions, and game flow for a
//! drone-delivery arcade game.
//!
//! Everything runs inside [`GameSession::tick`]; rendering and audio read the
//! [`FrameReport`] it returns.

pub mod arena;
pub mod autopilot;
pub mod boundary;
pub mod config;
pub mod flight;
pub mod hud;
pub mod minimap;
pub mod mission;
pub mod score;
pub mod session;

#[cfg(test)]
mod test_support;

pub use arena::{default_city, Arena};
pub use autopilot::Autopilot;
pub use boundary::{BoundaryGuard, PlayArea};
pub use config::{ConfigError, GameConfig};
pub use flight::{CameraBasis, FlightCommand, FlightController, VisualTilt};
pub use hud::{GameEvent, GameOverDisplay, GameOverReason, HudSnapshot, Objective, ObjectiveTone};
pub use minimap::{MinimapFrame, MinimapProjection};
pub use mission::{default_missions, MissionDefinition, MissionError, MissionStateMachine, Stage};
pub use score::{MemoryScoreStore, RonScoreStore, ScoreEntry, ScoreError, ScoreStore};
pub use session::{FrameReport, GamePhase, GameSession, GameState};

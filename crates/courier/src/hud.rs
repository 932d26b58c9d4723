//! Per-frame HUD data and the events the session raises.
//! Drawing is left to whoever consumes these.

use crate::score::ScoreEntry;

/// Colour class of the objective line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveTone {
    /// Current task (yellow).
    Active,
    /// Mission just completed (lime).
    Success,
    /// Whole mission list done (gold).
    Finished,
}

impl ObjectiveTone {
    pub fn color(self) -> [f32; 3] {
        match self {
            ObjectiveTone::Active => [1.0, 1.0, 0.0],
            ObjectiveTone::Success => [0.2, 0.8, 0.2],
            ObjectiveTone::Finished => [1.0, 0.84, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub text: String,
    pub tone: ObjectiveTone,
}

impl Objective {
    pub fn new(text: impl Into<String>, tone: ObjectiveTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl Default for Objective {
    fn default() -> Self {
        Self::new("", ObjectiveTone::Active)
    }
}

/// What the game-over panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum GameOverDisplay {
    /// Just "GAME OVER" and the final score.
    Plain,
    /// Top entries, best first.
    Leaderboard(Vec<ScoreEntry>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    OutOfLives,
    MissionsComplete,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    MissionSetUp { index: usize },
    PackagePickedUp { mission: usize },
    PackageDelivered { mission: usize, points: u32 },
    HazardHit { hazard: usize, lives_left: u32 },
    TimerExpired { lives_left: u32 },
    Paused,
    Resumed,
    Respawned,
    GameOver { reason: GameOverReason, score: u32 },
    Reset,
}

/// Everything the HUD needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub altitude: f32,
    pub speed: f32,
    pub lives: u32,
    /// Seconds left on the mission timer, never negative.
    pub timer: f32,
    pub score: u32,
    pub objective: Objective,
    /// 1-based mission number, capped at the mission count.
    pub mission_number: usize,
    pub mission_count: usize,
    pub timeout_prompt_visible: bool,
    pub game_over_visible: bool,
    pub game_over: Option<GameOverDisplay>,
}

impl HudSnapshot {
    pub fn timer_text(&self) -> String {
        format!("Time: {:.1}", self.timer)
    }

    pub fn lives_text(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_tones_have_distinct_colors() {
        let a = ObjectiveTone::Active.color();
        let s = ObjectiveTone::Success.color();
        let f = ObjectiveTone::Finished.color();
        assert_ne!(a, s);
        assert_ne!(s, f);
        assert_ne!(a, f);
    }

    #[test]
    fn hud_timer_text_one_decimal() {
        let hud = HudSnapshot {
            altitude: 0.0,
            speed: 0.0,
            lives: 2,
            timer: 42.349,
            score: 0,
            objective: Objective::default(),
            mission_number: 1,
            mission_count: 10,
            timeout_prompt_visible: false,
            game_over_visible: false,
            game_over: None,
        };
        assert_eq!(hud.timer_text(), "Time: 42.3");
        assert_eq!(hud.lives_text(), "Lives: 2");
    }
}

//! Scoreboard / status projection
//!
//! `project` maps a phase to the HUD fields it sets. A `None` field leaves
//! the HUD untouched, which is how the start banner stays up after a start
//! until its timer clears it.

use super::phase::Phase;

/// HUD fields set by a phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub status: Option<String>,
    pub main: Option<String>,
    pub sub: Option<String>,
    pub score: Option<String>,
}

impl Projection {
    /// Blank the main banner and caption
    pub fn clear_banner() -> Self {
        Self {
            main: Some(String::new()),
            sub: Some(String::new()),
            ..Default::default()
        }
    }
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Pure mapping from phase to HUD fields
pub fn project(phase: &Phase) -> Projection {
    match phase {
        Phase::Initializing => Projection {
            status: text("initializing"),
            main: text(""),
            sub: text("please wait"),
            score: text(""),
        },
        Phase::Limited => Projection {
            status: text("limited / low quality"),
            ..Default::default()
        },
        Phase::Tracking => Projection {
            status: text("tracking"),
            main: text(""),
            sub: text(""),
            score: text(""),
        },
        Phase::Ready { .. } => Projection {
            main: text("READY?"),
            sub: text("tap to start"),
            score: text(""),
            ..Default::default()
        },
        Phase::Playing { score, .. } => Projection {
            score: Some(score.to_string()),
            ..Default::default()
        },
        Phase::GameOver { score, .. } => Projection {
            main: text("GAME OVER"),
            sub: text("tap to restart"),
            score: Some(score.to_string()),
            ..Default::default()
        },
        Phase::Error { message } => Projection {
            status: Some(format!("error: {message}")),
            main: text(""),
            sub: text(""),
            ..Default::default()
        },
    }
}

/// Text currently shown to the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub status: String,
    pub main: String,
    pub sub: String,
    pub score: String,
}

impl Hud {
    /// Merge a projection. Returns true if any field changed.
    pub fn apply(&mut self, projection: &Projection) -> bool {
        let mut changed = false;
        for (field, value) in [
            (&mut self.status, &projection.status),
            (&mut self.main, &projection.main),
            (&mut self.sub, &projection.sub),
            (&mut self.score, &projection.score),
        ] {
            if let Some(value) = value {
                if *field != *value {
                    *field = value.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}

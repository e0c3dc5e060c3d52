//! Score and lives state machine
//!
//! `Playing` accrues one point per score tick and loses a life per hit. The hit that takes
//! the last life moves to `GameOver`, which is terminal: later ticks and hits are ignored.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::consts::START_LIVES;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// What a hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Already game over
    Ignored,
    LifeLost { remaining: u8 },
    /// Last life lost; the phase is now `GameOver`
    Died,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u64,
    lives: u8,
    phase: GamePhase,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            phase: GamePhase::Playing,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// One score tick elapsed. Returns `true` if the score moved.
    pub fn on_tick(&mut self, out: &mut Vec<GameEvent>) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.score += 1;
        out.push(GameEvent::ScoreChanged { score: self.score });
        true
    }

    /// The player was struck by a hazard
    pub fn on_hit(&mut self, out: &mut Vec<GameEvent>) -> HitOutcome {
        if !self.is_playing() || self.lives == 0 {
            return HitOutcome::Ignored;
        }

        self.lives -= 1;
        out.push(GameEvent::PlayerHit);
        out.push(GameEvent::LivesChanged { lives: self.lives });

        if self.lives > 0 {
            return HitOutcome::LifeLost {
                remaining: self.lives,
            };
        }

        self.phase = GamePhase::GameOver;
        log::info!("Game over with score {}", self.score);
        out.push(GameEvent::PlayerDied);
        out.push(GameEvent::GameOver {
            final_score: self.score,
        });
        HitOutcome::Died
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accrues_while_playing() {
        let mut board = Scoreboard::new();
        let mut events = Vec::new();
        for _ in 0..5 {
            assert!(board.on_tick(&mut events));
        }
        assert_eq!(board.score(), 5);
        assert_eq!(events.last(), Some(&GameEvent::ScoreChanged { score: 5 }));
    }

    #[test]
    fn test_three_hits_end_the_game() {
        let mut board = Scoreboard::new();
        let mut events = Vec::new();
        board.on_tick(&mut events);
        events.clear();

        assert_eq!(board.on_hit(&mut events), HitOutcome::LifeLost { remaining: 2 });
        assert_eq!(board.on_hit(&mut events), HitOutcome::LifeLost { remaining: 1 });
        assert_eq!(board.on_hit(&mut events), HitOutcome::Died);
        assert_eq!(board.phase(), GamePhase::GameOver);
        assert_eq!(board.lives(), 0);

        assert_eq!(
            events,
            vec![
                GameEvent::PlayerHit,
                GameEvent::LivesChanged { lives: 2 },
                GameEvent::PlayerHit,
                GameEvent::LivesChanged { lives: 1 },
                GameEvent::PlayerHit,
                GameEvent::LivesChanged { lives: 0 },
                GameEvent::PlayerDied,
                GameEvent::GameOver { final_score: 1 },
            ]
        );

        // Terminal: a fourth hit does nothing
        events.clear();
        assert_eq!(board.on_hit(&mut events), HitOutcome::Ignored);
        assert!(events.is_empty());
        assert_eq!(board.lives(), 0);
    }

    #[test]
    fn test_score_frozen_after_game_over() {
        let mut board = Scoreboard::new();
        let mut events = Vec::new();
        board.on_tick(&mut events);
        for _ in 0..3 {
            board.on_hit(&mut events);
        }
        events.clear();
        assert!(!board.on_tick(&mut events));
        assert_eq!(board.score(), 1);
        assert!(events.is_empty());
    }
}

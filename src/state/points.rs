//! Point values for the game and the per-alliance score summary shown once a
//! result has been posted.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::score::{Cycle, Foul, RealtimeScore};

const MOBILITY_POINTS: u32 = 5;
const AUTO_HIGH_POINTS: u32 = 15;
const AUTO_LOW_POINTS: u32 = 6;
const HOT_BONUS_POINTS: u32 = 5;
const CLEAR_HIGH_POINTS: u32 = 10;
const CLEAR_LOW_POINTS: u32 = 1;
const TELEOP_HIGH_POINTS: u32 = 10;
const TELEOP_LOW_POINTS: u32 = 1;
const TRUSS_POINTS: u32 = 10;
const CATCH_POINTS: u32 = 10;
const FOUL_POINTS: u32 = 20;
const TECHNICAL_FOUL_POINTS: u32 = 50;

/// Point breakdown for one alliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub auto_points: u32,
    pub assist_points: u32,
    pub truss_catch_points: u32,
    pub goal_points: u32,
    pub teleop_points: u32,
    /// Points awarded from fouls committed by the opposing alliance.
    pub foul_points: u32,
    pub score: u32,
}

impl ScoreSummary {
    /// Summarize `score`, crediting the fouls committed by the opponent.
    pub fn compute(score: &RealtimeScore, opponent_fouls: &[Foul]) -> Self {
        let auto = &score.current_score;
        let auto_points = auto.mobility_bonuses * MOBILITY_POINTS
            + auto.high * AUTO_HIGH_POINTS
            + auto.high_hot * (AUTO_HIGH_POINTS + HOT_BONUS_POINTS)
            + auto.low * AUTO_LOW_POINTS
            + auto.low_hot * (AUTO_LOW_POINTS + HOT_BONUS_POINTS)
            + auto.clear_high * CLEAR_HIGH_POINTS
            + auto.clear_low * CLEAR_LOW_POINTS;

        let mut summary = ScoreSummary {
            auto_points,
            ..Default::default()
        };
        for cycle in &score.cycles {
            summary.add_cycle(cycle);
        }
        summary.teleop_points =
            summary.assist_points + summary.truss_catch_points + summary.goal_points;
        summary.foul_points = opponent_fouls.iter().map(foul_points).sum();
        summary.score = summary.auto_points + summary.teleop_points + summary.foul_points;
        summary
    }

    fn add_cycle(&mut self, cycle: &Cycle) {
        if cycle.truss {
            self.truss_catch_points += TRUSS_POINTS;
            if cycle.catch {
                self.truss_catch_points += CATCH_POINTS;
            }
        }
        if cycle.scored_high {
            self.goal_points += TELEOP_HIGH_POINTS;
        } else if cycle.scored_low {
            self.goal_points += TELEOP_LOW_POINTS;
        } else {
            // Assists only pay out on a scored ball.
            return;
        }
        self.assist_points += match cycle.assists {
            2 => 10,
            3 => 30,
            _ => 0,
        };
    }
}

fn foul_points(foul: &Foul) -> u32 {
    if foul.is_technical {
        TECHNICAL_FOUL_POINTS
    } else {
        FOUL_POINTS
    }
}

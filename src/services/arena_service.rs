use tracing::info;

use crate::{
    config::RULE_CODES,
    dto::arena::{LoadMatchRequest, MatchTimeUpdate, MatchView, RulesResponse, ScoreView},
    error::ServiceError,
    state::{
        AppState,
        arena::{CurrentMatch, MatchClock, PostedResult},
        notifier::{MatchLoaded, MatchTimeTick, ScorePosted},
        points::ScoreSummary,
        score::Alliance,
    },
};

/// Install a new match: fresh scores for both alliances, a reset clock, and a
/// `MatchLoaded` event so every station reloads.
pub async fn load_match(state: &AppState, request: LoadMatchRequest) -> Result<MatchView, ServiceError> {
    let current = CurrentMatch::from(request);
    for alliance in Alliance::ALL {
        state.scores().get(alliance).reset().await?;
    }
    state.replace_current_match(current.clone()).await;
    state.update_clock(MatchClock::default());

    let listeners = state.match_loaded().publish(MatchLoaded);
    info!(
        match_id = current.id,
        match_type = current.match_type.capitalized(),
        display_name = %current.display_name,
        listeners,
        "match loaded"
    );
    Ok(view(current, MatchClock::default()))
}

/// The loaded match together with the clock.
pub async fn current_match(state: &AppState) -> MatchView {
    view(state.current_match().await, state.clock())
}

/// Record a clock reading and tell announcer displays about it.
pub fn update_match_time(state: &AppState, update: MatchTimeUpdate) {
    state.update_clock(MatchClock {
        state: update.match_state,
        match_time_sec: update.match_time_sec,
    });
    state.match_time().publish(MatchTimeTick {
        match_time_sec: update.match_time_sec as u32,
    });
}

/// Seconds elapsed in the current match, used to timestamp fouls.
pub fn match_time_sec(state: &AppState) -> f64 {
    state.clock().match_time_sec
}

/// Freeze both alliance scores into the posted result shown by announcers.
pub async fn post_score(state: &AppState) -> Result<PostedResult, ServiceError> {
    let red = state.scores().get(Alliance::Red).snapshot().await?;
    let blue = state.scores().get(Alliance::Blue).snapshot().await?;
    let current = state.current_match().await;
    let result = PostedResult::new(&current, red, blue);
    state.set_posted_result(result.clone()).await;
    state.score_posted().publish(ScorePosted);
    info!(
        match_id = result.match_id,
        red = result.red_summary.score,
        blue = result.blue_summary.score,
        "score posted"
    );
    Ok(result)
}

/// Current realtime score of `alliance` with its point breakdown.
pub async fn score_view(state: &AppState, alliance: Alliance) -> Result<ScoreView, ServiceError> {
    let score = state.scores().get(alliance).snapshot().await?;
    let opponent = state.scores().get(alliance.opponent()).snapshot().await?;
    let summary = ScoreSummary::compute(&score, &opponent.fouls);
    Ok(ScoreView {
        alliance,
        score,
        summary,
    })
}

/// Last posted result, if a match has been posted since startup.
pub async fn posted_result(state: &AppState) -> Result<PostedResult, ServiceError> {
    state
        .posted_result()
        .await
        .ok_or_else(|| ServiceError::NotFound("no result has been posted yet".into()))
}

/// Rule codes offered to referee stations.
pub fn rules() -> RulesResponse {
    RulesResponse {
        rules: RULE_CODES.iter().map(|rule| rule.to_string()).collect(),
    }
}

fn view(current: CurrentMatch, clock: MatchClock) -> MatchView {
    MatchView {
        roster: current.roster(),
        current,
        match_state: clock.state,
        match_time_sec: clock.match_time_sec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{
            arena::{MatchState, MatchType},
            score::{Foul, ScoringCommand},
        },
    };

    fn load_request() -> LoadMatchRequest {
        LoadMatchRequest {
            id: 7,
            match_type: MatchType::Qualification,
            display_name: "7".into(),
            red: [254, 1114, 2056],
            blue: [971, 33, 118],
        }
    }

    #[tokio::test]
    async fn load_match_resets_scores_and_notifies() {
        let state = AppState::new(AppConfig::default());
        let mut loaded = state.match_loaded().subscribe();
        state
            .scores()
            .get(Alliance::Red)
            .apply(ScoringCommand::Mobility)
            .await
            .unwrap();

        let view = load_match(&state, load_request()).await.unwrap();
        assert_eq!(view.roster["B1"], 971);
        assert_eq!(loaded.recv().await, Some(MatchLoaded));

        let red = state.scores().get(Alliance::Red).snapshot().await.unwrap();
        assert_eq!(red.current_score.mobility_bonuses, 0);
        assert_eq!(current_match(&state).await.current.id, 7);
    }

    #[tokio::test]
    async fn match_time_is_recorded_and_published() {
        let state = AppState::new(AppConfig::default());
        let mut ticks = state.match_time().subscribe();
        update_match_time(
            &state,
            MatchTimeUpdate {
                match_state: MatchState::AutoPeriod,
                match_time_sec: 4.7,
            },
        );
        assert_eq!(match_time_sec(&state), 4.7);
        assert_eq!(ticks.recv().await.unwrap().match_time_sec, 4);
    }

    #[tokio::test]
    async fn post_score_stores_result_with_summaries() {
        let state = AppState::new(AppConfig::default());
        let mut posted = state.score_posted().subscribe();
        assert!(matches!(
            posted_result(&state).await,
            Err(ServiceError::NotFound(_))
        ));

        state
            .fouls()
            .add(
                Alliance::Blue,
                Foul {
                    team_id: 971,
                    rule: "G12".into(),
                    is_technical: false,
                    time_in_match_sec: 50.0,
                },
            )
            .await
            .unwrap();
        let result = post_score(&state).await.unwrap();
        assert_eq!(result.red_summary.foul_points, 20);
        assert_eq!(posted.recv().await, Some(ScorePosted));
        assert_eq!(posted_result(&state).await.unwrap().match_id, 0);

        let red = score_view(&state, Alliance::Red).await.unwrap();
        assert_eq!(red.summary.score, 20);
    }

    #[test]
    fn rules_list_the_rule_book() {
        let rules = rules().rules;
        assert_eq!(rules.len(), RULE_CODES.len());
        assert_eq!(rules[0], "G3");
    }
}

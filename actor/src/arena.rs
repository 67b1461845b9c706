//! Evaluation matches
//!
//! Test games pit the engine against a uniformly random mover; tournaments
//! pit a candidate configuration against the incumbent. Both play greedy
//! (temperature 0) searches from a fresh tree every move.

use engine_core::{ActionId, Environment, Outcome, Player};
use mcts::{MctsConfig, MctsSearch, Predictor, SearchError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::ops::ControlFlow;
use tracing::{debug, info};

/// Something that picks moves.
pub enum Agent<'a, E: Environment> {
    /// Greedy MCTS
    Search(MctsSearch<'a, E, dyn Predictor + 'a>),
    /// Uniformly random legal moves
    Random,
}

impl<'a, E: Environment> Agent<'a, E> {
    pub fn search(
        env: &'a E,
        predictor: &'a (dyn Predictor + 'a),
        config: MctsConfig,
    ) -> Result<Self, SearchError> {
        Ok(Agent::Search(MctsSearch::new(env, predictor, config)?))
    }

    /// Pick a move for `player`. A forced move is played without searching.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        state: &E::State,
        player: Player,
        ply: u32,
        legal: &[ActionId],
        rng: &mut R,
    ) -> Result<ActionId, SearchError> {
        match (legal, self) {
            ([], _) => Err(SearchError::NoLegalMoves),
            ([only], _) => Ok(*only),
            (_, Agent::Random) => legal.choose(rng).copied().ok_or(SearchError::NoLegalMoves),
            (_, Agent::Search(search)) => {
                let tree = search.run(state, player, ply, None, rng)?;
                Ok(tree.select_action(tree.root(), 0.0, rng)?)
            }
        }
    }
}

/// Play one game and return its outcome.
pub fn play_game<E, R>(
    env: &E,
    first: &Agent<'_, E>,
    second: &Agent<'_, E>,
    rng: &mut R,
) -> Result<Outcome, SearchError>
where
    E: Environment,
    R: Rng + ?Sized,
{
    let mut state = env.reset();
    let mut player = Player::First;
    let mut ply = 0u32;

    loop {
        let legal = env.legal_actions(&state, player);
        let agent = match player {
            Player::First => first,
            Player::Second => second,
        };
        let action = agent.choose(&state, player, ply, &legal, rng)?;
        state = env.apply(&state, action, player);
        ply += 1;

        if let Some(outcome) = env.terminal_value(&state, player, ply) {
            debug!(env = env.name(), plies = ply, ?outcome, "Match game finished");
            return Ok(outcome);
        }
        player = player.opponent();
    }
}

/// Game results from one contestant's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl MatchRecord {
    /// Count `outcome` for the contestant that played `side`.
    pub fn record(&mut self, outcome: Outcome, side: Player) {
        match outcome.winner() {
            Some(winner) if winner == side => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn decisive(&self) -> u32 {
        self.wins + self.losses
    }

    /// Share of decisive games won, `None` when every game was drawn.
    pub fn win_share(&self) -> Option<f64> {
        match self.decisive() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }

    /// A contestant with no decisive games, or a win share above
    /// `threshold`, is accepted.
    pub fn accepted(&self, threshold: f64) -> bool {
        self.win_share().map_or(true, |share| share > threshold)
    }
}

/// Called with the running record after every game; `Break` ends the match early.
pub type GameHook<'h> = &'h mut dyn FnMut(&MatchRecord) -> ControlFlow<()>;

/// Play `pairs` pairs of games against a random mover, once on each side.
pub fn test_games<E, R>(
    env: &E,
    engine: &Agent<'_, E>,
    pairs: u32,
    rng: &mut R,
    after_game: GameHook<'_>,
) -> Result<MatchRecord, SearchError>
where
    E: Environment,
    R: Rng + ?Sized,
{
    let random = Agent::Random;
    let mut record = MatchRecord::default();
    'pairs: for _ in 0..pairs {
        for side in Player::BOTH {
            let outcome = match side {
                Player::First => play_game(env, engine, &random, rng)?,
                Player::Second => play_game(env, &random, engine, rng)?,
            };
            record.record(outcome, side);
            if after_game(&record).is_break() {
                break 'pairs;
            }
        }
    }
    info!(
        env = env.name(),
        wins = record.wins,
        losses = record.losses,
        draws = record.draws,
        "Test games against random mover"
    );
    Ok(record)
}

/// Outcome of a candidate-versus-incumbent tournament.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TournamentResult {
    /// Results from the candidate's point of view
    pub record: MatchRecord,
    pub accepted: bool,
}

/// Play `games` games between `candidate` and `incumbent`.
///
/// The candidate moves first in the first half of the games and second in
/// the rest.
pub fn tournament<E, R>(
    env: &E,
    candidate: &Agent<'_, E>,
    incumbent: &Agent<'_, E>,
    games: u32,
    threshold: f64,
    rng: &mut R,
    after_game: GameHook<'_>,
) -> Result<TournamentResult, SearchError>
where
    E: Environment,
    R: Rng + ?Sized,
{
    let mut record = MatchRecord::default();
    for game in 0..games {
        if game < games / 2 {
            record.record(play_game(env, candidate, incumbent, rng)?, Player::First);
        } else {
            record.record(play_game(env, incumbent, candidate, rng)?, Player::Second);
        }
        if after_game(&record).is_break() {
            break;
        }
    }

    let accepted = record.accepted(threshold);
    info!(
        env = env.name(),
        candidate_wins = record.wins,
        incumbent_wins = record.losses,
        draws = record.draws,
        accepted,
        "Tournament finished"
    );
    Ok(TournamentResult { record, accepted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Observation;
    use games_checkers::{Board, Checkers, State};
    use games_tictactoe::TicTacToe;
    use mcts::{Prediction, PredictorError, UniformPredictor};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _observation: &Observation) -> Result<Prediction, PredictorError> {
            Err(PredictorError::Failed("offline".into()))
        }
    }

    #[test]
    fn test_record_counts_by_side() {
        let mut record = MatchRecord::default();
        record.record(Outcome::Win(Player::First), Player::First);
        record.record(Outcome::Win(Player::First), Player::Second);
        record.record(Outcome::Draw, Player::Second);
        assert_eq!(
            record,
            MatchRecord {
                wins: 1,
                losses: 1,
                draws: 1
            }
        );
        assert_eq!(record.games(), 3);
        assert_eq!(record.win_share(), Some(0.5));
    }

    #[test]
    fn test_acceptance_threshold() {
        let all_draws = MatchRecord {
            wins: 0,
            losses: 0,
            draws: 10,
        };
        assert!(all_draws.accepted(0.55));

        let narrow = MatchRecord {
            wins: 11,
            losses: 9,
            draws: 0,
        };
        assert!(!narrow.accepted(0.55));

        let clear = MatchRecord {
            wins: 12,
            losses: 8,
            draws: 3,
        };
        assert!(clear.accepted(0.55));
    }

    #[test]
    fn test_forced_move_skips_search() {
        let env = TicTacToe::new();
        let agent = Agent::search(&env, &FailingPredictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let state = env.reset();

        assert_eq!(
            agent.choose(&state, Player::First, 0, &[4], &mut rng).unwrap(),
            4
        );
        assert!(matches!(
            agent.choose(&state, Player::First, 0, &[0, 4], &mut rng),
            Err(SearchError::Predictor(_))
        ));
    }

    #[test]
    fn test_forced_capture_in_checkers() {
        let env = Checkers::new();
        let board = Board::from_ascii([
            "........", "........", "........", "..b.....", ".r......", "........", "........",
            "......b.",
        ])
        .unwrap();
        let state = State::from_board(board);
        let legal = env.legal_actions(&state, Player::First);
        assert_eq!(legal.len(), 1);

        let agent = Agent::search(&env, &FailingPredictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(
            agent.choose(&state, Player::First, 10, &legal, &mut rng).unwrap(),
            legal[0]
        );
    }

    #[test]
    fn test_engine_beats_random_mover() {
        let env = TicTacToe::new();
        let predictor = UniformPredictor::new(env.action_space());
        let config = MctsConfig::for_evaluation().with_rollouts(400);
        let engine = Agent::search(&env, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        let record =
            test_games(&env, &engine, 5, &mut rng, &mut |_| ControlFlow::Continue(())).unwrap();
        assert_eq!(record.games(), 10);
        assert!(record.wins > record.losses);
    }

    #[test]
    fn test_random_candidate_is_rejected() {
        let env = TicTacToe::new();
        let predictor = UniformPredictor::new(env.action_space());
        let config = MctsConfig::for_evaluation().with_rollouts(400);
        let incumbent = Agent::search(&env, &predictor, config).unwrap();
        let candidate = Agent::Random;
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let result = tournament(
            &env,
            &candidate,
            &incumbent,
            10,
            0.55,
            &mut rng,
            &mut |_| ControlFlow::Continue(()),
        )
        .unwrap();
        assert_eq!(result.record.games(), 10);
        assert!(result.record.losses > 0);
        assert!(!result.accepted);
    }

    #[test]
    fn test_hook_stops_match_early() {
        let env = TicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut seen = 0;

        let record = test_games(&env, &Agent::Random, 4, &mut rng, &mut |record| {
            seen += 1;
            if record.games() == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        assert_eq!(record.games(), 3);
        assert_eq!(seen, 3);
    }
}

use super::*;
use engine_core::board_game::{OPPONENT_PLANE, OWN_PLANE, PLAYER_PLANE};
use engine_core::Square;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn play(moves: &[usize]) -> State {
    let game = TicTacToe::new();
    let mut state = game.reset();
    let mut player = Player::First;
    for &m in moves {
        state = game.apply(&state, m, player);
        player = -player;
    }
    state
}

#[test]
fn test_catalog_has_one_template_per_cell() {
    let game = TicTacToe::new();
    assert_eq!(game.action_space(), 9);
    for (id, template, captures) in game.catalog().iter() {
        assert_eq!(template, &[Square::from_index(id, COLS)]);
        assert!(captures.is_empty());
    }
}

#[test]
fn test_initial_state() {
    let game = TicTacToe::new();
    let state = game.reset();
    assert_eq!(state.board(), &[0; 9]);
    assert_eq!(game.legal_actions(&state, Player::First), (0..9).collect::<Vec<_>>());
    assert_eq!(game.terminal_value(&state, Player::Second, 0), None);
}

#[test]
fn test_legal_moves_shrink() {
    let game = TicTacToe::new();
    let state = play(&[4]);
    let legal = game.legal_actions(&state, Player::Second);
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
    assert_eq!(state.board()[4], 1);
}

#[test]
#[should_panic(expected = "illegal tic-tac-toe move")]
fn test_occupied_cell_panics() {
    play(&[4, 4]);
}

#[test]
fn test_winning_game() {
    let game = TicTacToe::new();
    // X wins with top row
    let state = play(&[0, 3, 1, 4, 2]);

    assert_eq!(state.winner(), Some(Player::First));
    assert_eq!(
        game.terminal_value(&state, Player::First, 5),
        Some(Outcome::Win(Player::First))
    );
    assert!(game.legal_actions(&state, Player::Second).is_empty());
}

#[test]
fn test_second_player_diagonal_win() {
    let game = TicTacToe::new();
    let state = play(&[0, 2, 1, 4, 8, 6]);
    assert_eq!(
        game.terminal_value(&state, Player::Second, 6),
        Some(Outcome::Win(Player::Second))
    );
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let game = TicTacToe::new();
    let state = State::from_board([1, -1, 1, 1, -1, -1, -1, 1, 1]);
    assert_eq!(state.winner(), None);
    assert_eq!(game.terminal_value(&state, Player::First, 9), Some(Outcome::Draw));
}

#[test]
fn test_observation_is_player_relative() {
    let game = TicTacToe::new();
    let state = play(&[4, 0]);

    let obs = game.to_player_relative(&state, Player::First, 2);
    assert_eq!(obs.shape(), [3, 3, 3]);
    assert_eq!(obs.get(OWN_PLANE, 1, 1), 1.0);
    assert_eq!(obs.get(OPPONENT_PLANE, 0, 0), 1.0);
    assert_eq!(obs.get(PLAYER_PLANE, 2, 2), 1.0);

    let obs = game.to_player_relative(&state, Player::Second, 2);
    assert_eq!(obs.get(OWN_PLANE, 0, 0), 1.0);
    assert_eq!(obs.get(OPPONENT_PLANE, 1, 1), 1.0);
    assert_eq!(obs.get(PLAYER_PLANE, 0, 0), -1.0);
}

#[test]
fn test_random_games_terminate_within_nine_plies() {
    let game = TicTacToe::new();
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    for _ in 0..200 {
        let mut state = game.reset();
        let mut player = Player::First;
        let mut ply = 0;
        loop {
            let legal = game.legal_actions(&state, player);
            let &action = legal.choose(&mut rng).expect("non-terminal state has moves");
            state = game.apply(&state, action, player);
            ply += 1;
            if game.terminal_value(&state, player, ply).is_some() {
                break;
            }
            player = -player;
        }
        assert!(ply <= 9);
    }
}

#[test]
fn test_metadata() {
    let meta = TicTacToe::new().metadata();
    assert_eq!(meta.env_id, "tictactoe");
    assert_eq!(meta.num_actions, 9);
    assert_eq!(meta.obs_size(), 27);
}

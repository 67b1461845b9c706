use criterion::{criterion_group, criterion_main, Criterion};
use engine_core::{Environment, Player};
use games_tictactoe::TicTacToe;
use std::hint::black_box;

fn bench_legal_actions(c: &mut Criterion) {
    let game = TicTacToe::new();
    let state = game.apply(&game.reset(), 4, Player::First);
    c.bench_function("tictactoe_legal_actions", |b| {
        b.iter(|| game.legal_actions(black_box(&state), Player::Second))
    });
}

fn bench_apply_and_check(c: &mut Criterion) {
    let game = TicTacToe::new();
    let state = game.reset();
    c.bench_function("tictactoe_apply_terminal", |b| {
        b.iter(|| {
            let next = game.apply(black_box(&state), 4, Player::First);
            game.terminal_value(&next, Player::First, 1)
        })
    });
}

fn bench_observation(c: &mut Criterion) {
    let game = TicTacToe::new();
    let state = game.apply(&game.reset(), 0, Player::First);
    c.bench_function("tictactoe_observation", |b| {
        b.iter(|| game.to_player_relative(black_box(&state), Player::Second, 1))
    });
}

criterion_group!(
    benches,
    bench_legal_actions,
    bench_apply_and_check,
    bench_observation
);
criterion_main!(benches);

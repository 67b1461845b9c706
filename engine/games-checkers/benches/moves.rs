use criterion::{criterion_group, criterion_main, Criterion};
use engine_core::{Environment, Player};
use games_checkers::{Board, Checkers, CheckersCatalog, State};
use std::hint::black_box;

fn bench_catalog_build(c: &mut Criterion) {
    c.bench_function("checkers_catalog_build", |b| b.iter(CheckersCatalog::build));
}

fn bench_opening_moves(c: &mut Criterion) {
    let game = Checkers::new();
    let state = game.reset();
    c.bench_function("checkers_legal_actions_opening", |b| {
        b.iter(|| game.legal_actions(black_box(&state), Player::First))
    });
}

fn bench_king_chains(c: &mut Criterion) {
    let game = Checkers::new();
    let board = Board::from_ascii([
        "........", "..b.b...", "........", "..b.b...", ".R......", "..b.b...", "........",
        "........",
    ])
    .expect("bench board parses");
    let state = State::from_board(board);
    c.bench_function("checkers_legal_actions_king_chains", |b| {
        b.iter(|| game.legal_actions(black_box(&state), Player::First))
    });
}

fn bench_apply_and_check(c: &mut Criterion) {
    let game = Checkers::new();
    let state = game.reset();
    let action = game.legal_actions(&state, Player::First)[0];
    c.bench_function("checkers_apply_terminal", |b| {
        b.iter(|| {
            let next = game.apply(black_box(&state), action, Player::First);
            game.terminal_value(&next, Player::First, 1)
        })
    });
}

fn bench_heuristic(c: &mut Criterion) {
    let game = Checkers::new();
    let state = game.reset();
    let legal = game.legal_actions(&state, Player::First);
    c.bench_function("checkers_heuristic", |b| {
        b.iter(|| game.heuristic(black_box(&state), Player::First, &legal))
    });
}

criterion_group!(
    benches,
    bench_catalog_build,
    bench_opening_moves,
    bench_king_chains,
    bench_apply_and_check,
    bench_heuristic
);
criterion_main!(benches);

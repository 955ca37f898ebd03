//! Know My Family Benchmark Suite
//!
//! Every action is meant to feel instant on a low-end tablet. Targets:
//!   quiz_new_question_20_voices ...... < 5μs
//!   maze_shortest_path_standard ...... < 5μs
//!   matching_full_round_20 ........... < 50μs
//!   roster_load_50 / roster_save_50 .. < 1ms

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use kinplay_core::games::{MatchingSession, MazeLayout, MazeSession, QuizSession};
use kinplay_core::persistence::RosterStore;
use kinplay_core::types::{Direction, FamilyMember, Roster};

fn make_roster(n: usize) -> Roster {
    (0..n)
        .map(|i| {
            FamilyMember::new(format!("Member {i}"), "Cousin", format!("member_{i}.jpg"))
                .with_audio(format!("member_{i}.mp3"))
        })
        .collect()
}

/// Benchmark: draw a quiz question (target: < 5μs).
fn bench_quiz_question(c: &mut Criterion) {
    let roster = make_roster(20);
    let mut session = QuizSession::default();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("quiz_new_question_20_voices", |b| {
        b.iter(|| {
            session
                .new_question(black_box(&roster), &mut rng)
                .expect("question");
            black_box(session.options().len());
        });
    });
}

/// Benchmark: BFS over the shipped maze (target: < 5μs).
fn bench_maze_path(c: &mut Criterion) {
    let layout = MazeLayout::standard();

    c.bench_function("maze_shortest_path_standard", |b| {
        b.iter(|| {
            let path = layout.shortest_path(black_box(layout.start()), black_box(layout.end()));
            black_box(path);
        });
    });
}

/// Benchmark: walk the maze from start to finish, including start-up.
fn bench_maze_round(c: &mut Criterion) {
    let roster = make_roster(5);
    let layout = MazeLayout::standard();
    let route: Vec<Direction> = layout
        .shortest_path(layout.start(), layout.end())
        .map(|p| MazeLayout::directions_along(&p))
        .expect("path");
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("maze_full_round", |b| {
        b.iter(|| {
            let mut session = MazeSession::new(layout.clone());
            session.start(&roster, &mut rng).expect("start");
            for dir in &route {
                black_box(session.move_in(*dir));
            }
        });
    });
}

/// Benchmark: a full matching round at several roster sizes (target: < 50μs at 20).
fn bench_matching_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching_full_round");
    for n in [5usize, 20, 50] {
        let roster = make_roster(n);
        let mut rng = StdRng::seed_from_u64(3);
        group.bench_with_input(BenchmarkId::from_parameter(n), &roster, |b, roster| {
            b.iter(|| {
                let mut session = MatchingSession::new();
                session.start(roster, &mut rng).expect("start");
                for member in roster {
                    session.select_name(&member.name);
                    black_box(session.select_photo(member));
                }
            });
        });
    }
    group.finish();
}

/// Benchmark: roster file round-trip with 50 members (target: < 1ms each).
fn bench_roster_store(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = RosterStore::open(dir.path().join("family_data.json"));
    let roster = make_roster(50);
    store.save(&roster).expect("seed");

    c.bench_function("roster_save_50", |b| {
        b.iter(|| store.save(black_box(&roster)).expect("save"));
    });

    c.bench_function("roster_load_50", |b| {
        b.iter(|| black_box(store.load()));
    });
}

criterion_group!(
    benches,
    bench_quiz_question,
    bench_maze_path,
    bench_maze_round,
    bench_matching_round,
    bench_roster_store,
);
criterion_main!(benches);

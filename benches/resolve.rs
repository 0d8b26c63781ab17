use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mafia_engine::catalog::{factions, roles};
use mafia_engine::core::{tags, AbilityType, Game, GameConfig, Phase, PlayerId};
use mafia_engine::graph::nodes_in_cycles;
use mafia_engine::resolve::Resolver;

/// A 12-player night: every town power role acts and the mafia kills.
fn busy_night() -> Game {
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let town = Arc::new(factions::town());
    let mafia = Arc::new(factions::mafia());
    let town_roles = [
        roles::cop(),
        roles::doctor(),
        roles::roleblocker(),
        roles::jailkeeper(),
        roles::tracker(),
        roles::watcher(),
        roles::bodyguard(),
        roles::vigilante(),
        roles::bulletproof(),
    ];
    let mut ids: Vec<PlayerId> = Vec::new();
    for (i, role) in town_roles.into_iter().enumerate() {
        ids.push(game.add_player(format!("T{i}"), role, town.clone()).unwrap());
    }
    for (i, role) in [roles::roleblocker(), roles::juggernaut(), roles::vanilla()]
        .into_iter()
        .enumerate()
    {
        ids.push(game.add_player(format!("M{i}"), role, mafia.clone()).unwrap());
    }

    let resolver = Resolver::new();
    let n = ids.len();
    for (i, &actor) in ids.iter().enumerate() {
        if game[actor].actions().is_empty() {
            continue;
        }
        let target = ids[(i + 5) % n];
        let visit = resolver
            .make_visit(&game, actor, Some(&[target]), AbilityType::Action, 0, &[])
            .unwrap();
        game.queue_visit(visit);
    }
    let kill = resolver
        .make_visit(&game, ids[10], Some(&[ids[1]]), AbilityType::SharedAction, 0, &[tags::FACTIONAL])
        .unwrap();
    game.queue_visit(kill);
    resolver.add_passives(&mut game).unwrap();
    game
}

fn bench_resolve_game(c: &mut Criterion) {
    let night = busy_night();
    let resolver = Resolver::new();

    c.bench_function("resolve_game_12_players", |b| {
        b.iter_batched(
            || night.clone(),
            |mut game| {
                let _ = resolver.resolve_game(&mut game);
                black_box(game)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_nodes_in_cycles(c: &mut Criterion) {
    let edges: Vec<(u32, u32)> = (0..1_000).map(|i| (i, (i * 7 + 3) % 1_000)).collect();

    c.bench_function("nodes_in_cycles_1000", |b| {
        b.iter(|| black_box(nodes_in_cycles(edges.iter().copied())))
    });
}

criterion_group!(benches, bench_resolve_game, bench_nodes_in_cycles);
criterion_main!(benches);

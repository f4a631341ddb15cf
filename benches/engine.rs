use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use minegrid::{Board, GameConfig, LayoutGenerator, RandomLayoutGenerator};

fn generate_layout(c: &mut Criterion) {
    let config = GameConfig::new((128, 128), 2500);
    c.bench_function("generate_128x128", |b| {
        b.iter(|| RandomLayoutGenerator::new(black_box(7), (64, 64)).generate(config))
    });
}

fn flood_fill_full_board(c: &mut Criterion) {
    let config = GameConfig::new((128, 128), 0);
    c.bench_function("flood_fill_128x128", |b| {
        b.iter_batched(
            || Board::new(config, 7),
            |mut board| board.reveal(black_box((64, 64))).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, generate_layout, flood_fill_full_board);
criterion_main!(benches);

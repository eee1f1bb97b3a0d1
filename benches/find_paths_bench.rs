use arb_path::{
    ConstantProductDex, PathConfig, PathFinder, Pool, PoolGraph, PoolId, SharedPoolGraph, TokenId,
};
use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::hint::black_box;
use std::sync::Arc;

fn make_pool(id: usize, token0: &TokenId, token1: &TokenId, dex: &Arc<ConstantProductDex>) -> Arc<Pool> {
    let reserve = Decimal::from(1_000 + (id % 17) * 250);
    Arc::new(
        Pool::new(
            PoolId::new(format!("0x{id:040x}")),
            token0.clone(),
            token1.clone(),
            dex.clone(),
            reserve,
            reserve,
            Decimal::new(3, 3),
        )
        .expect("valid bench pool"),
    )
}

/// A ring of tokens with chords: every token connects to its neighbor and to
/// the token three steps ahead, plus a parallel pool on every fifth edge.
fn build_pools(token_count: usize) -> Vec<Arc<Pool>> {
    let dex = Arc::new(ConstantProductDex::new("uniswap_v2"));
    let tokens: Vec<TokenId> = (0..token_count).map(|i| TokenId::new(format!("T{i}"))).collect();

    let mut pools = vec![];
    let mut next_id = 0;
    for i in 0..token_count {
        let neighbor = (i + 1) % token_count;
        pools.push(make_pool(next_id, &tokens[i], &tokens[neighbor], &dex));
        next_id += 1;

        let chord = (i + 3) % token_count;
        pools.push(make_pool(next_id, &tokens[i], &tokens[chord], &dex));
        next_id += 1;

        if i % 5 == 0 {
            pools.push(make_pool(next_id, &tokens[i], &tokens[neighbor], &dex));
            next_id += 1;
        }
    }
    pools
}

fn bench_find_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_paths");

    for (token_count, max_len) in [(20, 3), (50, 3), (50, 4)] {
        let pools = build_pools(token_count);
        let graph = Arc::new(SharedPoolGraph::new(PoolGraph::from_pools(pools.clone())));
        let finder = PathFinder::new(
            PathConfig::builder().max_path_length(max_len).build().expect("valid bench config"),
            graph,
        );
        let affected = vec![pools[0].clone(), pools[1].clone()];

        group.bench_function(format!("tokens_{token_count}_len_{max_len}"), |b| {
            b.iter(|| black_box(finder.find_paths(black_box(&affected))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_paths);
criterion_main!(benches);

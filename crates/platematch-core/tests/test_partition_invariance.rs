mod common;

use platematch_core::config::MatchConfig;
use platematch_core::matching::{
    aggregate, partition, CancelToken, CrossMatchEngine, MatchJob, NoOpObserver,
};

use common::random_catalog;

const TOLERANCE: f64 = 4.0 / 3600.0;

fn run_partitioned(engine: &CrossMatchEngine<'_>, parts: usize) -> Vec<usize> {
    let outcomes = partition(0..engine.outer_len(), parts)
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(w, r)| {
            engine
                .run_slice(w, r, &NoOpObserver, &CancelToken::new())
                .unwrap()
        })
        .collect();
    aggregate(outcomes).indices
}

#[test]
fn test_cross_match_independent_of_partitioning() {
    let c1 = random_catalog("a", 700, 21);
    let c2 = random_catalog("b", 600, 22);
    let engine = CrossMatchEngine::cross_catalog(&c1, &c2, TOLERANCE).unwrap();

    let single = engine.run_all(&NoOpObserver).unwrap();
    assert!(!single.is_empty() && single.len() < c1.len(), "fixture should mix hits and misses");

    for parts in [2, 3, 7, 16, 700, 1000] {
        assert_eq!(run_partitioned(&engine, parts), single, "parts = {parts}");
    }
}

#[test]
fn test_duplicates_independent_of_partitioning() {
    let c = random_catalog("d", 900, 5);
    let engine = CrossMatchEngine::duplicates(&c, TOLERANCE).unwrap();

    let single = engine.run_all(&NoOpObserver).unwrap();
    assert!(!single.is_empty());

    for parts in [2, 5, 8, 13] {
        assert_eq!(run_partitioned(&engine, parts), single, "parts = {parts}");
    }
}

#[test]
fn test_parallel_job_matches_sequential_engine() {
    let c1 = random_catalog("a", 1500, 31);
    let c2 = random_catalog("b", 1500, 32);
    let sequential = CrossMatchEngine::cross_catalog(&c1, &c2, TOLERANCE)
        .unwrap()
        .run_all(&NoOpObserver)
        .unwrap();

    for workers in [1, 3, 8] {
        let job = MatchJob::new(MatchConfig {
            tolerance: TOLERANCE,
            worker_count: workers,
            ..Default::default()
        })
        .unwrap();
        let result = job
            .run_cross(&c1, &c2, &NoOpObserver, &CancelToken::new())
            .unwrap();
        assert_eq!(result.indices, sequential, "workers = {workers}");
        assert!(!result.cancelled);
    }
}

#[test]
fn test_parallel_duplicates_match_sequential_engine() {
    let c = random_catalog("d", 1200, 41);
    let sequential = CrossMatchEngine::duplicates(&c, TOLERANCE)
        .unwrap()
        .run_all(&NoOpObserver)
        .unwrap();

    let job = MatchJob::new(MatchConfig {
        tolerance: TOLERANCE,
        worker_count: 6,
        ..Default::default()
    })
    .unwrap();
    let result = job
        .run_duplicates(&c, &NoOpObserver, &CancelToken::new())
        .unwrap();
    assert_eq!(result.indices, sequential);
}

#[test]
fn test_partitions_cover_range_exactly_once() {
    for (len, parts) in [(0, 1), (1, 4), (10, 3), (1001, 8), (64, 64)] {
        let chunks = partition(0..len, parts).unwrap();
        assert_eq!(chunks.len(), parts);
        assert_eq!(chunks.first().unwrap().start, 0);
        assert_eq!(chunks.last().unwrap().end, len);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        let base = len / parts;
        for chunk in &chunks[..parts - 1] {
            assert_eq!(chunk.len(), base);
        }
    }
}

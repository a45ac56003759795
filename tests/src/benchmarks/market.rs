//! # Marketplace Benchmarks
//!
//! Conditions:
//! - Ledgers of up to 10,000 jobs
//! - Full five-call lifecycles per job
//! - Pagination at the default and maximum page sizes
//! - Snapshot encode/decode of a populated ledger

use crate::fixtures::{account, request, Harness, COLLATERAL, OWNER, REWARD, VERIFIER};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use dqpu_contract::prelude::*;
use dqpu_contract::StateSnapshot;
use std::time::Duration;

/// Harness with `jobs` submitted jobs, every other one approved.
fn populated(jobs: u64) -> Harness {
    let mut h = Harness::with_verifier();
    for i in 0..jobs {
        let id = h.submit("alice", REWARD).expect("submit");
        if i % 2 == 0 {
            h.validate_job(VERIFIER, id, true).expect("approve");
        }
    }
    h
}

/// Submission into ledgers of growing size.
pub fn bench_submit_job(c: &mut Criterion) {
    let mut group = c.benchmark_group("dqpu-submit-job");
    group.measurement_time(Duration::from_secs(5));

    for size in [0u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("submit", size), &size, |b, &size| {
            let mut h = populated(size);
            b.iter(|| {
                black_box(
                    h.call("alice", REWARD, |m, host| m.submit_job(host, request()))
                        .expect("submit"),
                )
            })
        });
    }
    group.finish();
}

/// Submit, approve, post result, approve result.
pub fn bench_full_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("dqpu-lifecycle");
    group.throughput(Throughput::Elements(1));

    group.bench_function("success_path", |b| {
        let mut h = Harness::with_verifier();
        b.iter(|| {
            let id = h.job_with_result("alice", "bob");
            black_box(h.validate_result(OWNER, id, true).expect("approve result"))
        })
    });

    group.bench_function("reject_and_retry", |b| {
        let mut h = Harness::with_verifier();
        b.iter(|| {
            let id = h.job_with_result("alice", "bob");
            h.validate_result(OWNER, id, false).expect("reject result");
            h.submit_result("carol", id, COLLATERAL).expect("retry");
            black_box(h.validate_result(OWNER, id, true).expect("approve result"))
        })
    });
    group.finish();
}

/// Paginated reads over a large ledger.
pub fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("dqpu-queries");
    let h = populated(10_000);

    for limit in [50u32, 1_000] {
        group.throughput(Throughput::Elements(u64::from(limit)));
        group.bench_with_input(BenchmarkId::new("get_jobs", limit), &limit, |b, &limit| {
            b.iter(|| black_box(h.market.get_jobs(black_box(5_000), Some(limit))))
        });
        group.bench_with_input(
            BenchmarkId::new("get_latest_jobs", limit),
            &limit,
            |b, &limit| b.iter(|| black_box(h.market.get_latest_jobs(Some(limit)))),
        );
    }

    group.bench_function("get_jobs_stats", |b| {
        b.iter(|| black_box(h.market.get_jobs_stats()))
    });
    group.bench_function("is_a_verifier", |b| {
        let victor = account(VERIFIER);
        b.iter(|| black_box(h.market.is_a_verifier(&victor)))
    });
    group.finish();
}

/// Binary snapshot round trips.
pub fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("dqpu-snapshots");
    group.sample_size(20);

    for size in [100u64, 5_000] {
        let h = populated(size);
        let snapshot = h.snapshot();
        let bytes = snapshot.encode().expect("encode");

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &snapshot, |b, s| {
            b.iter(|| black_box(s.encode().expect("encode")))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| black_box(StateSnapshot::decode(bytes).expect("decode")))
        });
        group.bench_with_input(BenchmarkId::new("restore", size), &snapshot, |b, s| {
            b.iter(|| {
                black_box(
                    JobMarket::restore(s.clone(), Default::default()).expect("restore"),
                )
            })
        });
    }
    group.finish();
}

/// Register all marketplace benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    bench_submit_job(c);
    bench_full_lifecycle(c);
    bench_queries(c);
    bench_snapshots(c);
}

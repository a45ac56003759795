//! # DQPU Marketplace Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | `submit_job` | O(log n) insert |
//! | Full lifecycle | Five invocations per job |
//! | `get_jobs` page | Bounded by the page limit |
//! | Snapshot encode/decode | Linear in the ledger size |

use criterion::{criterion_group, criterion_main, Criterion};

fn market_benchmarks(c: &mut Criterion) {
    dqpu_tests::benchmarks::market::register_benchmarks(c);
}

criterion_group!(benches, market_benchmarks);
criterion_main!(benches);

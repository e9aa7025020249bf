use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};
use tracing_subscriber::EnvFilter;

/// Installs a RUST_LOG-driven subscriber, once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic list of distinct items, one per index.
#[allow(dead_code)]
pub fn generate_test_items(prefix: &str, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("{prefix}_{i:06}").into_bytes())
        .collect()
}

/// Random alphanumeric items, reproducible from the seed.
#[allow(dead_code)]
pub fn generate_random_items(
    count: usize,
    len: usize,
    seed: u64,
) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .collect::<Vec<u8>>()
        })
        .collect()
}

/// Reproducible stream of `u64` draws for counter arithmetic tests.
#[allow(dead_code)]
pub fn generate_values(count: usize, below: u64, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(0..below)).collect()
}

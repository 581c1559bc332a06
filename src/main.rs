use std::time::Instant;
use workpool::{Config, ShutdownMode, ThreadPoolInner};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let now = Instant::now();
    let pool = ThreadPoolInner::with_config(Config::default());

    let handles: Vec<_> = (0..1_000_000u64)
        .map(|i| pool.submit(move || i * 2).expect("pool is open"))
        .collect();

    let mut sum = 0u64;
    for handle in handles {
        sum += handle.wait().expect("task completed");
    }

    pool.shutdown(ShutdownMode::Graceful);
    println!("sum: {sum}, elapsed: {:?}", now.elapsed());
}

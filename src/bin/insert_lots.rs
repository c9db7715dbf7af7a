use long_hash_map::LongHashMap;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use tracing_subscriber::EnvFilter;

fn main() {
    const NUM_THREADS: usize = 64;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let keep_running = Arc::new(AtomicBool::new(true));
    let map = Arc::new(LongHashMap::new());
    let threads: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let keep_running = keep_running.clone();
            let map = map.clone();

            thread::spawn(move || {
                let mut key = i as i64;

                while keep_running.load(Ordering::Relaxed) {
                    map.insert(0, 0);
                    map.insert(key, key);
                    map.remove(key - NUM_THREADS as i64);
                    key += NUM_THREADS as i64;
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_secs(5));
    keep_running.store(false, Ordering::Relaxed);

    let results = threads.into_iter().map(|t| t.join());

    for result in results.into_iter() {
        assert!(result.is_ok());
    }

    tracing::info!(
        len = map.len(),
        capacity = map.capacity(),
        used_buckets = map.used_bucket_count(),
        "finished"
    );
}

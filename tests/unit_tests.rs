#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            mpsc, Arc, Mutex,
        },
        thread,
        time::Duration,
    };
    use workpool::{
        errors::PoolError,
        model::{ShutdownMode, TaskStatus},
        pool::{Config, ThreadPoolInner},
    };

    #[test]
    fn test_submit_and_wait() {
        println!("\n=== TEST: submit and wait ===");
        let pool = ThreadPoolInner::new(4);

        let handle = pool.submit(|| 21 * 2).unwrap();
        assert_eq!(handle.wait(), Ok(42));

        pool.shutdown(ShutdownMode::Graceful);
        println!("  ✓ value delivered through the handle");
    }

    #[test]
    fn test_panic_is_captured() {
        println!("\n=== TEST: panic capture ===");
        let pool = ThreadPoolInner::new(2);

        let handle = pool.submit(|| -> i32 { panic!("boom at task 7") }).unwrap();
        match handle.wait() {
            Err(PoolError::TaskPanicked(msg)) => {
                assert!(msg.contains("boom at task 7"), "payload preserved: {msg}");
                println!("  ✓ panic payload delivered: {msg}");
            }
            other => panic!("expected TaskPanicked, got {other:?}"),
        }

        // The worker that ran the panicking task must keep serving.
        let handle = pool.submit(|| "still alive").unwrap();
        assert_eq!(handle.wait(), Ok("still alive"));
        println!("  ✓ pool usable after a task failure");

        pool.shutdown(ShutdownMode::Graceful);
    }

    #[test]
    fn test_poll_transitions() {
        println!("\n=== TEST: poll pending -> done ===");
        let pool = ThreadPoolInner::new(1);
        let (gate_tx, gate_rx) = mpsc::channel::<()>();

        let handle = pool
            .submit(move || {
                gate_rx.recv().unwrap();
                7
            })
            .unwrap();

        assert_eq!(handle.poll(), TaskStatus::Pending);
        assert!(!handle.is_finished());
        assert!(format!("{handle:?}").contains("Pending"));
        assert_eq!(
            handle.wait_timeout(Duration::from_millis(10)),
            TaskStatus::Pending
        );
        println!("  ✓ pending while the task is gated");

        gate_tx.send(()).unwrap();
        assert_eq!(
            handle.wait_timeout(Duration::from_secs(5)),
            TaskStatus::Done
        );
        assert_eq!(handle.poll(), TaskStatus::Done);
        assert!(format!("{handle:?}").contains("Done"));
        assert_eq!(handle.wait(), Ok(7));
        println!("  ✓ done after release");

        pool.shutdown(ShutdownMode::Graceful);
    }

    #[test]
    fn test_submit_after_shutdown_fails_fast() {
        println!("\n=== TEST: submit after shutdown ===");
        let pool = ThreadPoolInner::new(2);
        pool.shutdown(ShutdownMode::Graceful);

        let err = pool.submit(|| 1).unwrap_err();
        assert_eq!(err, PoolError::PoolClosed);
        println!("  ✓ PoolClosed returned synchronously, no blocking");
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        println!("\n=== TEST: idempotent shutdown ===");
        let pool = ThreadPoolInner::new(4);
        let handle = pool.submit(|| 1).unwrap();

        pool.shutdown(ShutdownMode::Graceful);
        pool.shutdown(ShutdownMode::Graceful);
        pool.shutdown(ShutdownMode::Immediate);

        assert_eq!(handle.wait(), Ok(1));
        println!("  ✓ repeated shutdown: no error, no double-join, no deadlock");
    }

    #[test]
    fn test_single_worker_runs_fifo() {
        println!("\n=== TEST: FIFO start order on one worker ===");
        let pool = ThreadPoolInner::new(1);
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..32usize {
            let order = order.clone();
            pool.submit(move || order.lock().unwrap().push(i)).unwrap();
        }
        pool.shutdown(ShutdownMode::Graceful);

        let seen = order.lock().unwrap().clone();
        assert_eq!(seen, (0..32).collect::<Vec<_>>());
        println!("  ✓ tasks started in submission order");
    }

    #[test]
    fn test_drop_runs_queued_tasks() {
        println!("\n=== TEST: drop performs graceful shutdown ===");
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPoolInner::new(2);
            for _ in 0..50 {
                let counter = counter.clone();
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(1));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
            drop(pool);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 50);
        println!("  ✓ all 50 queued tasks ran before teardown");
    }

    #[test]
    fn test_metrics_tracking() {
        println!("\n=== TEST: metrics ===");
        let pool = ThreadPoolInner::with_config(Config::with_workers(2));

        for i in 0..20 {
            pool.submit(move || {
                if i % 5 == 0 {
                    panic!("scheduled failure");
                }
                i
            })
            .unwrap();
        }
        pool.shutdown(ShutdownMode::Graceful);

        let metrics = pool.metrics();
        println!(
            "  submitted={} completed={} failed={} queued={}",
            metrics.submitted_tasks,
            metrics.completed_tasks,
            metrics.failed_tasks,
            metrics.queued_tasks
        );
        assert_eq!(metrics.workers, 2);
        assert_eq!(metrics.submitted_tasks, 20);
        assert_eq!(metrics.completed_tasks, 16);
        assert_eq!(metrics.failed_tasks, 4);
        assert_eq!(metrics.queued_tasks, 0);
        assert_eq!(metrics.in_flight(), 0);
        assert!((metrics.success_rate() - 0.8).abs() < f64::EPSILON);
        println!("  ✓ counters line up");
    }

    #[test]
    fn test_default_config_uses_all_cpus() {
        println!("\n=== TEST: default config ===");
        let config = Config::default();
        assert!(config.worker_count >= 1);

        let pool = ThreadPoolInner::with_config(config.clone());
        assert_eq!(pool.worker_count(), config.worker_count);
        pool.shutdown(ShutdownMode::Graceful);
        println!("  ✓ {} workers by default", config.worker_count);
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{info, warn};
use netpulse_core::{MonitorConfig, Probes};

use super::{emit, make_session};

/// Shutdown is checked at this granularity while waiting for the next cycle.
const SLEEP_SLICE: Duration = Duration::from_millis(200);

pub fn run(config: MonitorConfig, max_cycles: u64) {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("cannot install Ctrl+C handler: {e}");
    }

    let interval = config.run_interval();
    println!(
        "netpulse: checking every {} minute(s), logging to {}. Press Ctrl+C to stop.",
        config.run_interval_minutes,
        config.log_file.display()
    );

    let mut session = make_session(config.clone());

    while running.load(Ordering::SeqCst) {
        let started = Instant::now();
        let mut probes = Probes::system(&config);
        let record = session.run_cycle(&mut probes);
        emit(&record, &config);

        if max_cycles > 0 && session.run_count() >= max_cycles {
            break;
        }

        let Some(deadline) = started.checked_add(interval) else {
            warn!("run interval {interval:?} is out of range; stopping");
            break;
        };
        info!("next check in {:?}", deadline.saturating_duration_since(Instant::now()));
        while Instant::now() < deadline && running.load(Ordering::SeqCst) {
            std::thread::sleep(SLEEP_SLICE.min(deadline.saturating_duration_since(Instant::now())));
        }
    }

    println!();
    println!("Stopped after {} check(s).", session.run_count());
}

use netpulse_core::{MonitorConfig, Probes};

use super::{emit, make_session};

pub fn run(config: MonitorConfig) {
    let mut probes = Probes::system(&config);
    let mut session = make_session(config.clone());
    let record = session.run_cycle(&mut probes);
    emit(&record, &config);
}

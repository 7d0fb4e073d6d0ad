use netpulse_core::MonitorConfig;

pub fn run(config: &MonitorConfig) {
    match config.redacted().to_toml_string() {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Failed to render config: {e}");
            std::process::exit(1);
        }
    }
}

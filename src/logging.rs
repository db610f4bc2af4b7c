//! Logger setup
//!
//! `RUST_LOG` controls the filter (default: info). Output goes to stderr,
//! or is appended to the file named by `LOG_FILE` when set.

use std::fs::OpenOptions;

pub fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    // reqwest/hyper connection chatter drowns the pass summaries at debug
    builder.filter_module("hyper", log::LevelFilter::Warn);
    builder.filter_module("reqwest", log::LevelFilter::Warn);

    let log_file = std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty());
    match log_file.as_deref().map(|path| OpenOptions::new().create(true).append(true).open(path)) {
        Some(Ok(file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Some(Err(e)) => {
            eprintln!("Cannot open LOG_FILE, logging to stderr: {}", e);
            builder.target(env_logger::Target::Stderr);
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
}

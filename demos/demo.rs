//! Quick tour: `cargo run --example demo -- [--debug] [--panic]`.

use plog::{Config, LevelFilter};

fn divide(a: i32, b: i32) -> Result<i32, String> {
    a.checked_div(b).ok_or_else(|| format!("cannot divide {a} by zero"))
}

fn main() -> Result<(), plog::LoggerError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "--debug");
    let crash = args.iter().any(|a| a == "--panic");

    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    let logger = plog::init_with(Config::default().level(level).with_env())?;

    log::debug!("debug message");
    log::info!("info message");
    log::warn!("warning message");
    if let Err(e) = divide(1, 0) {
        log::error!("oh no: {e}");
    }

    if crash {
        let empty: Vec<u32> = Vec::new();
        log::info!("about to read {}", empty[3]);
    }

    println!("log file: {}", logger.file_path().display());
    Ok(())
}

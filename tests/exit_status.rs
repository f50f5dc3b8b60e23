//! Runs itself as a child process to check what reaches the log file when the
//! process ends: a normal return from `main`, and a panic on the main thread.
//!
//! Built with `harness = false` so the child's panic happens on the real main
//! thread and sets the real exit status.

use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus};

use plog::{CaptureBuffer, ColorChoice, Config, ConsoleTarget};

const MODE: &str = "PLOG_EXIT_MODE";
const DIR: &str = "PLOG_EXIT_DIR";
const LINES: usize = 2000;

fn main() {
    match (env::var(MODE), env::var(DIR)) {
        (Ok(mode), Ok(dir)) => child(&mode, Path::new(&dir)),
        _ => {
            records_survive_a_normal_exit();
            main_thread_panic_is_logged_and_exits_101();
            println!("exit_status: 2 passed");
        }
    }
}

fn child(mode: &str, dir: &Path) {
    plog::init_with(
        Config::default()
            .log_dir(dir)
            .color(ColorChoice::Never)
            .console(ConsoleTarget::Capture(CaptureBuffer::new())),
    )
    .unwrap();

    match mode {
        "return" => {
            for i in 0..LINES {
                log::info!("line {i}");
            }
            log::info!("last line before exit");
        }
        "panic" => {
            log::info!("about to fail");
            panic!("main thread gave up");
        }
        other => unreachable!("unknown mode {other}"),
    }
}

fn run_child(mode: &str, dir: &Path) -> ExitStatus {
    Command::new(env::current_exe().unwrap())
        .env(MODE, mode)
        .env(DIR, dir)
        .env_remove("RUST_BACKTRACE")
        .status()
        .unwrap()
}

fn logs_in(dir: &Path) -> String {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.file_name().unwrap().to_string_lossy().starts_with("app.log."))
        .collect();
    names.sort();
    names.iter().map(|path| fs::read_to_string(path).unwrap()).collect()
}

fn records_survive_a_normal_exit() {
    let dir = tempfile::tempdir().unwrap();

    let status = run_child("return", dir.path());
    assert!(status.success(), "child exited with {status}");

    let file = logs_in(dir.path());
    assert_eq!(file.lines().count(), LINES + 1);
    assert!(file.contains("line 0\n"));
    assert!(file.ends_with("last line before exit\n"), "tail: {:?}", file.lines().last());
}

fn main_thread_panic_is_logged_and_exits_101() {
    let dir = tempfile::tempdir().unwrap();

    let status = run_child("panic", dir.path());
    assert_eq!(status.code(), Some(101));

    let file = logs_in(dir.path());
    assert!(file.contains("about to fail"));
    assert!(file.contains("thread 'main' panicked at"));
    assert!(file.contains("main thread gave up"));
    assert!(file.contains("stack backtrace:"));
}

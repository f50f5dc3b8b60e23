use std::fs;
use std::panic;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use plog::{CaptureBuffer, ColorChoice, Config, ConsoleTarget, Logger};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn init(dir: &std::path::Path, console: &CaptureBuffer) -> Logger {
    plog::init_with(
        Config::default()
            .log_dir(dir)
            .color(ColorChoice::Never)
            .console(ConsoleTarget::Capture(console.clone())),
    )
    .unwrap()
}

#[test]
fn panic_is_written_to_the_file_before_unwinding_continues() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let console = CaptureBuffer::new();
    let logger = init(dir.path(), &console);
    assert!(plog::panic_hook_installed());

    let result = panic::catch_unwind(|| {
        panic!("kaboom {}", 7);
    });
    assert!(result.is_err());

    let file = fs::read_to_string(logger.file_path()).unwrap();
    assert!(file.contains("ERROR    panic » thread '"));
    assert!(file.contains("kaboom 7"));
    assert!(file.contains("panic_hook.rs"));
    assert!(file.contains("stack backtrace:"));
    assert!(console.contents().contains("kaboom 7"));

    plog::shutdown();
}

#[test]
fn panics_on_other_threads_are_recorded_with_the_thread_name() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let logger = init(dir.path(), &CaptureBuffer::new());

    let joined = thread::Builder::new()
        .name("job-runner".to_string())
        .spawn(|| panic!("worker died"))
        .unwrap()
        .join();
    assert!(joined.is_err());

    let file = fs::read_to_string(logger.file_path()).unwrap();
    assert!(file.contains("thread 'job-runner' panicked at"));
    assert!(file.contains("worker died"));

    plog::shutdown();
}

#[test]
fn panics_below_threshold_are_still_written() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let logger = init(dir.path(), &CaptureBuffer::new());
    plog::set_level(plog::LevelFilter::Off);

    let _ = panic::catch_unwind(|| panic!("quiet process, loud panic"));

    let file = fs::read_to_string(logger.file_path()).unwrap();
    assert!(file.contains("quiet process, loud panic"));

    plog::shutdown();
}

#[test]
fn shutdown_restores_the_previous_hook() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let logger = init(dir.path(), &CaptureBuffer::new());
    plog::shutdown();
    assert!(!plog::panic_hook_installed());

    let _ = panic::catch_unwind(|| panic!("after shutdown"));

    let file = fs::read_to_string(logger.file_path()).unwrap();
    assert!(!file.contains("after shutdown"));
}

#[test]
fn hook_can_be_left_out() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    plog::init_with(
        Config::default()
            .log_dir(dir.path())
            .console(ConsoleTarget::Capture(CaptureBuffer::new()))
            .panic_hook(false),
    )
    .unwrap();

    assert!(!plog::panic_hook_installed());

    plog::shutdown();
}

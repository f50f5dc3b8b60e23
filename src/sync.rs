#[cfg(not(all(test, loom)))]
use core::sync::atomic::{AtomicU8, Ordering};
#[cfg(not(all(test, loom)))]
use std::thread::yield_now;

#[cfg(all(test, loom))]
use loom::{
    sync::atomic::{AtomicU8, Ordering},
    thread::yield_now,
};

enum GateState {
    Unloaded = 0,
    Locked = 1,
    Ready = 2,
}

/// Outcome of [`InitGate::enter`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    /// The caller holds the gate and must call `open` or `abandon`.
    Owner,
    /// Someone else finished setting up.
    Ready,
}

/// Three-state gate guarding process-wide setup.
///
/// One caller moves it from `Unloaded` to `Locked` and builds; everyone else
/// spins until it is `Ready`, or `Unloaded` again if the build failed, in
/// which case they race for ownership once more. `close` walks it back to
/// `Unloaded` for teardown.
pub(crate) struct InitGate {
    state: AtomicU8,
}

impl InitGate {
    pub(crate) fn new() -> Self {
        Self { state: AtomicU8::new(GateState::Unloaded as u8) }
    }

    pub(crate) fn enter(&self) -> Entry {
        loop {
            if self.state.load(Ordering::Acquire) == GateState::Ready as u8 {
                return Entry::Ready;
            }

            if self.state.compare_exchange(
                GateState::Unloaded as u8,
                GateState::Locked as u8,
                Ordering::Acquire,
                Ordering::Relaxed
            ).is_ok() {
                return Entry::Owner;
            }

            // Yielding to the owner
            while self.state.load(Ordering::Acquire) == GateState::Locked as u8 {
                yield_now();
            }
        }
    }

    /// Publishes a successful build. Only the owner calls this.
    pub(crate) fn open(&self) {
        self.state.store(GateState::Ready as u8, Ordering::Release);
    }

    /// Gives ownership up after a failed build.
    pub(crate) fn abandon(&self) {
        self.state.store(GateState::Unloaded as u8, Ordering::Release);
    }

    /// Takes a `Ready` gate back under lock for teardown. Returns `false`
    /// when there is nothing to tear down.
    pub(crate) fn close(&self) -> bool {
        loop {
            match self.state.compare_exchange(
                GateState::Ready as u8,
                GateState::Locked as u8,
                Ordering::Acquire,
                Ordering::Relaxed
            ) {
                Ok(_) => return true,
                Err(state) if state == GateState::Unloaded as u8 => return false,
                Err(_) => yield_now(),
            }
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == GateState::Ready as u8
    }
}


#[cfg(all(test, loom))]
mod loom_tests {
    use super::*;
    use loom::sync::atomic::AtomicUsize;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn gate_builds_exactly_once() {
        loom::model(|| {
            let gate = Arc::new(InitGate::new());
            let builds = Arc::new(AtomicUsize::new(0));

            let spawn = |gate: Arc<InitGate>, builds: Arc<AtomicUsize>| {
                thread::spawn(move || {
                    if gate.enter() == Entry::Owner {
                        builds.fetch_add(1, Ordering::SeqCst);
                        gate.open();
                    }
                })
            };

            let t1 = spawn(gate.clone(), builds.clone());
            let t2 = spawn(gate.clone(), builds.clone());
            t1.join().unwrap();
            t2.join().unwrap();

            assert_eq!(builds.load(Ordering::SeqCst), 1);
        });
    }
}

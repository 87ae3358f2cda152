//! Activation hook: background detector for the designated key.
//!
//! A dedicated thread polls the raw key state every few milliseconds and
//! publishes one `KeyPressed` event per down edge (press-and-hold fires
//! once). The hook never blocks its caller and runs independently of the
//! render/input path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::{EventPublisher, OverlayEvent};
use crate::platform::WindowService;

pub struct ActivationHook {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ActivationHook {
    /// Start polling `key` every `interval`. The returned hook owns the
    /// thread; it runs until [`stop`](Self::stop) or drop.
    pub fn spawn(
        key: u16,
        interval: Duration,
        service: Arc<dyn WindowService>,
        events: EventPublisher,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = thread::Builder::new()
            .name("scrim-activation-hook".into())
            .spawn(move || {
                log::debug!("activation hook started for key {key:#04x}");
                let mut was_down = false;
                loop {
                    if stop_flag.load(Ordering::SeqCst) {
                        break;
                    }
                    let down = service.key_down(key);
                    if down && !was_down {
                        events.publish(OverlayEvent::KeyPressed);
                    }
                    was_down = down;
                    thread::sleep(interval);
                }
                log::debug!("activation hook stopped");
            })
            .expect("failed to spawn activation hook thread");

        Self {
            stop,
            thread: Some(thread),
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Stop the polling loop and join the thread. Idempotent; the loop
    /// exits within one polling interval of the flag being set.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("activation hook thread panicked");
            }
        }
    }
}

impl Drop for ActivationHook {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Anti-ban pauses between completed units

use std::thread;
use std::time::Duration;

/// Blocks the traversal for a fixed duration.
///
/// There is no early wake-up; only process termination ends a pause.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Pause by sleeping the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::info!(seconds = duration.as_secs_f64(), "Anti-ban wait");
        thread::sleep(duration);
    }
}

/// Records requested pauses instead of sleeping
#[derive(Debug, Default, Clone)]
pub struct RecordedPauses {
    pub pauses: Vec<Duration>,
}

impl Pause for RecordedPauses {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

impl<P: Pause + ?Sized> Pause for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

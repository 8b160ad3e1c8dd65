//! CoreFoundation run loop helpers.

use core_foundation::runloop::CFRunLoop;

/// Handle to a thread's run loop that can be stopped from any thread.
#[derive(Clone)]
pub struct RunLoopHandle {
    run_loop: CFRunLoop,
}

// SAFETY: CFRunLoopStop may be called from any thread and CF reference
// counting is thread safe.
unsafe impl Send for RunLoopHandle {}
unsafe impl Sync for RunLoopHandle {}

impl RunLoopHandle {
    /// The calling thread's run loop.
    #[must_use]
    pub fn current() -> Self {
        Self { run_loop: CFRunLoop::get_current() }
    }

    /// Make the run loop's `run` return.
    pub fn stop(&self) {
        self.run_loop.stop();
    }
}

/// Run the calling thread's run loop until it is stopped.
pub fn run_current() {
    CFRunLoop::run_current();
}

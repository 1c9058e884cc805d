use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Exit status after a second Ctrl-C, as for a shell killed by SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

/// Counts Ctrl-C presses since the current evaluation started.
///
/// One press makes the running evaluation stop at its next check; a second
/// press before it finishes exits the process.
pub struct CtrlC {
    presses: Arc<AtomicUsize>,
}

impl CtrlC {
    fn new() -> Self {
        Self {
            presses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Installs the process-wide handler. Can only be called once.
    pub fn install() -> Self {
        let ctrl_c = Self::new();
        let presses = Arc::clone(&ctrl_c.presses);
        let result = ctrlc::set_handler(move || {
            if presses.fetch_add(1, Ordering::SeqCst) > 0 {
                eprintln!();
                process::exit(EXIT_INTERRUPTED);
            }
        });
        if let Err(err) = result {
            eprintln!("Unable to set Ctrl-C handler: {}", err);
        }
        ctrl_c
    }

    /// Runs one evaluation, forgetting presses that arrived before it.
    pub fn run<T, F: FnOnce(&Self) -> T>(&self, eval: F) -> T {
        self.presses.store(0, Ordering::SeqCst);
        let res = eval(self);
        self.presses.store(0, Ordering::SeqCst);
        res
    }
}

impl bigcalc_core::Interrupt for CtrlC {
    fn should_interrupt(&self) -> bool {
        self.presses.load(Ordering::Relaxed) > 0
    }
}

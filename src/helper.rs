use rustyline::{
    completion::{Candidate, Completer},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::{env, time};

// keeps live previews from stalling the prompt on expensive input
struct HintInterrupt {
    start: time::Instant,
    duration: time::Duration,
}

impl bigcalc_core::Interrupt for HintInterrupt {
    fn should_interrupt(&self) -> bool {
        time::Instant::now().duration_since(self.start) >= self.duration
    }
}

impl Default for HintInterrupt {
    fn default() -> Self {
        Self {
            start: time::Instant::now(),
            duration: time::Duration::from_millis(20),
        }
    }
}

/// Shows the result of the current line as a hint while typing, if `live`
/// was requested or `BIGCALC_LIVE` is set.
pub struct Helper {
    ctx: Rc<RefCell<bigcalc_core::Context>>,
    live: bool,
}

impl Helper {
    pub fn new(ctx: Rc<RefCell<bigcalc_core::Context>>, live: bool) -> Self {
        Self {
            ctx,
            live: live || env::var_os("BIGCALC_LIVE").is_some(),
        }
    }
}

impl Hinter for Helper {
    fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if !self.live {
            return None;
        }
        let int = HintInterrupt::default();
        // evaluate against a copy so that previews never change `ans`
        let mut ctx = self.ctx.borrow().clone();
        match bigcalc_core::evaluate_with_interrupt(line, &mut ctx, &int) {
            Ok(result) => {
                let res = result.get_main_result();
                if res.is_empty() || res.len() > 50 || res.trim() == line.trim() {
                    None
                } else {
                    Some(format!("\n{}", res))
                }
            }
            Err(_msg) => None,
        }
    }
}

impl Highlighter for Helper {}

impl Validator for Helper {}

pub struct NoCandidate {}

impl Candidate for NoCandidate {
    fn display(&self) -> &str {
        ""
    }
    fn replacement(&self) -> &str {
        ""
    }
}

impl Completer for Helper {
    type Candidate = NoCandidate;
}

impl rustyline::Helper for Helper {}

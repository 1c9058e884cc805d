use crate::error::CalcError;

/// Lets a caller abandon a long-running evaluation, e.g. on Ctrl-C.
pub trait Interrupt {
    fn should_interrupt(&self) -> bool;
}

pub(crate) fn test_int<I: Interrupt>(int: &I) -> Result<(), CalcError> {
    if int.should_interrupt() {
        Err(CalcError::Interrupted)
    } else {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct Never {}

impl Interrupt for Never {
    fn should_interrupt(&self) -> bool {
        false
    }
}

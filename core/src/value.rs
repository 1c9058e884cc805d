use crate::error::CalcError;
use crate::num::BigInt;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Value {
    Num(BigInt),
    Bool(bool),
}

impl Value {
    pub(crate) fn expect_num(self) -> Result<BigInt, CalcError> {
        match self {
            Self::Num(n) => Ok(n),
            Self::Bool(_) => Err(CalcError::ExpectedANumber),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

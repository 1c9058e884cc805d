use std::{error, fmt};

mod bigint;
mod magnitude;

pub use bigint::BigInt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DivideByZero {}

impl fmt::Display for DivideByZero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "division by zero")
    }
}

impl error::Error for DivideByZero {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueTooLarge {}

impl fmt::Display for ValueTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value too large")
    }
}

impl error::Error for ValueTooLarge {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseBigIntError {
    Empty,
    InvalidDigit(char),
}

impl fmt::Display for ParseBigIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "expected at least one digit"),
            Self::InvalidDigit(ch) => write!(f, "expected a digit, found '{}'", ch),
        }
    }
}

impl error::Error for ParseBigIntError {}

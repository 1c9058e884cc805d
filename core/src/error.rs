use crate::lexer::Symbol;
use crate::num::{DivideByZero, ParseBigIntError, ValueTooLarge};
use std::{error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub(crate) enum CalcError {
    Interrupted,
    DivideByZero,
    ValueTooLarge,
    NegativeShift,
    NegativeExponent,
    ExpectedANumber,
    IdentifierNotFound(String),
    NoPreviousAnswer,
    InvalidNumber(ParseBigIntError),
    DigitSeparatorsOnlyBetweenDigits,
    UnexpectedChar(char),
    ExpectedAToken,
    ExpectedToken(Symbol, Symbol),
    FoundInvalidTokenWhileExpecting(Symbol),
    UnexpectedSymbol(Symbol),
    UnexpectedInput,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::DivideByZero => write!(f, "division by zero"),
            Self::ValueTooLarge => write!(f, "value too large"),
            Self::NegativeShift => write!(f, "cannot shift by a negative amount"),
            Self::NegativeExponent => write!(f, "negative exponents are not supported"),
            Self::ExpectedANumber => write!(f, "expected a number"),
            Self::IdentifierNotFound(s) => write!(f, "unknown identifier '{}'", s),
            Self::NoPreviousAnswer => write!(f, "there is no previous answer yet"),
            Self::InvalidNumber(e) => write!(f, "{}", e),
            Self::DigitSeparatorsOnlyBetweenDigits => {
                write!(f, "digit separators can only occur between digits")
            }
            Self::UnexpectedChar(ch) => write!(f, "unexpected character '{}'", ch),
            Self::ExpectedAToken => write!(f, "expected a token"),
            Self::ExpectedToken(fnd, ex) => write!(f, "found '{}' while expecting '{}'", fnd, ex),
            Self::FoundInvalidTokenWhileExpecting(sym) => {
                write!(f, "found an invalid token while expecting '{}'", sym)
            }
            Self::UnexpectedSymbol(s) => write!(f, "expected a value, instead found '{}'", s),
            Self::UnexpectedInput => write!(f, "unexpected input found"),
        }
    }
}

impl error::Error for CalcError {}

impl From<DivideByZero> for CalcError {
    fn from(_: DivideByZero) -> Self {
        Self::DivideByZero
    }
}

impl From<ValueTooLarge> for CalcError {
    fn from(_: ValueTooLarge) -> Self {
        Self::ValueTooLarge
    }
}

impl From<ParseBigIntError> for CalcError {
    fn from(e: ParseBigIntError) -> Self {
        Self::InvalidNumber(e)
    }
}

impl From<CalcError> for String {
    fn from(e: CalcError) -> Self {
        e.to_string()
    }
}

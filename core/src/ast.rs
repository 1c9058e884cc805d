use crate::error::CalcError;
use crate::interrupt::{test_int, Interrupt};
use crate::num::BigInt;
use crate::value::Value;
use std::convert::TryFrom;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Bop {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

impl fmt::Display for Bop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Less => "<",
            Self::LessEquals => "<=",
            Self::Greater => ">",
            Self::GreaterEquals => ">=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Expr {
    Num(BigInt),
    Ident(String),
    Parens(Box<Expr>),
    UnaryMinus(Box<Expr>),
    UnaryPlus(Box<Expr>),
    // `~`, numbers only
    BitwiseNot(Box<Expr>),
    // `!`, bitwise on numbers and logical on booleans
    Not(Box<Expr>),
    Bop(Bop, Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Ident(ident) => write!(f, "{}", ident),
            Self::Parens(x) => write!(f, "({})", x),
            Self::UnaryMinus(x) => write!(f, "(-{})", x),
            Self::UnaryPlus(x) => write!(f, "(+{})", x),
            Self::BitwiseNot(x) => write!(f, "(~{})", x),
            Self::Not(x) => write!(f, "(!{})", x),
            Self::Bop(op, a, b) => write!(f, "({}{}{})", a, op, b),
        }
    }
}

pub(crate) fn evaluate<I: Interrupt>(
    expr: Expr,
    ans: Option<&BigInt>,
    int: &I,
) -> Result<Value, CalcError> {
    macro_rules! eval {
        ($e:expr) => {
            evaluate($e, ans, int)
        };
    }
    test_int(int)?;
    Ok(match expr {
        Expr::Num(n) => Value::Num(n),
        Expr::Ident(ident) => resolve_identifier(ident.as_str(), ans)?,
        Expr::Parens(x) => eval!(*x)?,
        Expr::UnaryMinus(x) => Value::Num(-eval!(*x)?.expect_num()?),
        Expr::UnaryPlus(x) => Value::Num(eval!(*x)?.expect_num()?),
        Expr::BitwiseNot(x) => Value::Num(!eval!(*x)?.expect_num()?),
        Expr::Not(x) => match eval!(*x)? {
            Value::Num(n) => Value::Num(!n),
            Value::Bool(b) => Value::Bool(!b),
        },
        Expr::Bop(op, a, b) => {
            let a = eval!(*a)?;
            let b = eval!(*b)?;
            evaluate_bop(op, a, b)?
        }
    })
}

fn resolve_identifier(ident: &str, ans: Option<&BigInt>) -> Result<Value, CalcError> {
    Ok(match ident {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "ans" => Value::Num(ans.cloned().ok_or(CalcError::NoPreviousAnswer)?),
        _ => return Err(CalcError::IdentifierNotFound(ident.to_string())),
    })
}

/// Largest result, in bits, that `<<` or `**` may produce.
const MAX_RESULT_BITS: usize = 1 << 26;

fn shift_amount(n: &BigInt) -> Result<usize, CalcError> {
    if n.is_negative() {
        return Err(CalcError::NegativeShift);
    }
    Ok(n.try_as_usize()?)
}

fn exponent(n: &BigInt) -> Result<u32, CalcError> {
    if n.is_negative() {
        return Err(CalcError::NegativeExponent);
    }
    u32::try_from(n.try_as_usize()?).map_err(|_| CalcError::ValueTooLarge)
}

fn shift_left(a: BigInt, b: &BigInt) -> Result<BigInt, CalcError> {
    let amount = shift_amount(b)?;
    if !a.is_zero() && a.bit_len().saturating_add(amount) > MAX_RESULT_BITS {
        return Err(CalcError::ValueTooLarge);
    }
    Ok(a << amount)
}

fn power(a: &BigInt, b: &BigInt) -> Result<BigInt, CalcError> {
    let exp = exponent(b)?;
    // for |a| >= 2 the result has more than (bit_len - 1) * exp bits
    let lower_bound = a
        .bit_len()
        .saturating_sub(1)
        .saturating_mul(usize::try_from(exp).unwrap_or(usize::MAX));
    if lower_bound >= MAX_RESULT_BITS {
        return Err(CalcError::ValueTooLarge);
    }
    Ok(a.pow(exp))
}

fn evaluate_bop(op: Bop, a: Value, b: Value) -> Result<Value, CalcError> {
    if let (Value::Bool(a), Value::Bool(b)) = (&a, &b) {
        let (a, b) = (*a, *b);
        return Ok(Value::Bool(match op {
            Bop::Equals => a == b,
            Bop::NotEquals => a != b,
            Bop::BitwiseAnd => a & b,
            Bop::BitwiseOr => a | b,
            Bop::BitwiseXor => a ^ b,
            _ => return Err(CalcError::ExpectedANumber),
        }));
    }
    let (a, b) = (a.expect_num()?, b.expect_num()?);
    Ok(match op {
        Bop::Add => Value::Num(a + b),
        Bop::Sub => Value::Num(a - b),
        Bop::Mul => Value::Num(a * b),
        Bop::Div => Value::Num(a.checked_div(&b)?),
        Bop::Mod => Value::Num(a.checked_rem(&b)?),
        Bop::Pow => Value::Num(power(&a, &b)?),
        Bop::BitwiseAnd => Value::Num(a & b),
        Bop::BitwiseOr => Value::Num(a | b),
        Bop::BitwiseXor => Value::Num(a ^ b),
        Bop::ShiftLeft => Value::Num(shift_left(a, &b)?),
        Bop::ShiftRight => Value::Num(a >> shift_amount(&b)?),
        Bop::Equals => Value::Bool(a == b),
        Bop::NotEquals => Value::Bool(a != b),
        Bop::Less => Value::Bool(a < b),
        Bop::LessEquals => Value::Bool(a <= b),
        Bop::Greater => Value::Bool(a > b),
        Bop::GreaterEquals => Value::Bool(a >= b),
    })
}

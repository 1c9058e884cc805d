#![forbid(unsafe_code)]

//! Arbitrary-precision signed integers on top of a copy-on-write limb
//! container, plus a small expression evaluator over them.

mod ast;
mod error;
mod interrupt;
mod lexer;
mod num;
mod parser;
mod storage;
mod value;

use error::CalcError;
use value::Value;

pub use interrupt::Interrupt;
pub use num::{BigInt, DivideByZero, ParseBigIntError, ValueTooLarge};
pub use storage::{Limb, LimbVec, StorageError};

#[derive(PartialEq, Eq, Debug)]
pub struct CalcResult {
    main_result: String,
}

impl CalcResult {
    pub fn get_main_result(&self) -> &str {
        self.main_result.as_str()
    }

    fn empty() -> Self {
        Self {
            main_result: String::new(),
        }
    }
}

/// State carried between evaluations: currently the last integer result,
/// which expressions can refer to as `ans`.
#[derive(Clone, Debug, Default)]
pub struct Context {
    ans: Option<BigInt>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_answer(&self) -> Option<&BigInt> {
        self.ans.as_ref()
    }
}

fn evaluate_to_value<I: Interrupt>(
    input: &str,
    ans: Option<&BigInt>,
    int: &I,
) -> Result<Value, CalcError> {
    let tokens = lexer::lex(input)?;
    let parsed = parser::parse_tokens(&tokens)?;
    ast::evaluate(parsed, ans, int)
}

pub fn evaluate(input: &str, context: &mut Context) -> Result<CalcResult, String> {
    evaluate_with_interrupt(input, context, &interrupt::Never::default())
}

/// Like [`evaluate`], but polls `int` while evaluating and gives up with
/// an "interrupted" error once it returns true.
pub fn evaluate_with_interrupt<I: Interrupt>(
    input: &str,
    context: &mut Context,
    int: &I,
) -> Result<CalcResult, String> {
    if input.trim().is_empty() {
        // no or blank input: return no output
        return Ok(CalcResult::empty());
    }
    let result = evaluate_to_value(input, context.ans.as_ref(), int)?;
    if let Value::Num(n) = &result {
        context.ans = Some(n.clone());
    }
    Ok(CalcResult {
        main_result: result.to_string(),
    })
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

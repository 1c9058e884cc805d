use crate::error::CalcError;
use crate::num::BigInt;
use std::fmt;

#[derive(Clone, Debug)]
pub(crate) enum Token {
    Num(BigInt),
    Ident(String),
    Symbol(Symbol),
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub(crate) enum Symbol {
    OpenParens,
    CloseParens,
    Add,
    Sub,
    Mul,
    Pow,
    Div,
    Mod,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseNot,
    Not,
    ShiftLeft,
    ShiftRight,
    DoubleEquals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

// two-character symbols have to be tried before their one-character prefixes
const SYMBOLS: &[(&str, Symbol)] = &[
    ("**", Symbol::Pow),
    ("<<", Symbol::ShiftLeft),
    (">>", Symbol::ShiftRight),
    ("==", Symbol::DoubleEquals),
    ("!=", Symbol::NotEquals),
    ("<=", Symbol::LessEquals),
    (">=", Symbol::GreaterEquals),
    ("(", Symbol::OpenParens),
    (")", Symbol::CloseParens),
    ("+", Symbol::Add),
    ("-", Symbol::Sub),
    ("*", Symbol::Mul),
    ("/", Symbol::Div),
    ("%", Symbol::Mod),
    ("&", Symbol::BitwiseAnd),
    ("|", Symbol::BitwiseOr),
    ("^", Symbol::BitwiseXor),
    ("~", Symbol::BitwiseNot),
    ("!", Symbol::Not),
    ("<", Symbol::Less),
    (">", Symbol::Greater),
];

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = SYMBOLS
            .iter()
            .find(|(_, sym)| sym == self)
            .map_or("?", |(s, _)| *s);
        write!(f, "{}", s)
    }
}

type LexResult<'a, T> = Result<(T, &'a str), CalcError>;

fn parse_integer(input: &str) -> LexResult<'_, BigInt> {
    let mut digits = String::new();
    let mut rest = input;
    let mut last_was_separator = false;
    loop {
        match rest.chars().next() {
            Some(ch) if ch.is_ascii_digit() => {
                digits.push(ch);
                last_was_separator = false;
            }
            Some('_') => {
                if last_was_separator {
                    return Err(CalcError::DigitSeparatorsOnlyBetweenDigits);
                }
                last_was_separator = true;
            }
            _ => break,
        }
        // both cases above are single-byte characters
        rest = &rest[1..];
    }
    if last_was_separator {
        return Err(CalcError::DigitSeparatorsOnlyBetweenDigits);
    }
    Ok((digits.parse()?, rest))
}

fn parse_ident(input: &str) -> (String, &str) {
    let end = input
        .char_indices()
        .find(|&(_, ch)| !(ch.is_alphanumeric() || ch == '_'))
        .map_or(input.len(), |(idx, _)| idx);
    let (ident, rest) = input.split_at(end);
    (ident.to_string(), rest)
}

fn parse_symbol(input: &str) -> Option<(Symbol, &str)> {
    SYMBOLS
        .iter()
        .find(|(s, _)| input.starts_with(s))
        .map(|(s, sym)| (*sym, &input[s.len()..]))
}

pub(crate) fn lex(mut input: &str) -> Result<Vec<Token>, CalcError> {
    let mut res = vec![];
    loop {
        input = input.trim_start();
        let ch = match input.chars().next() {
            Some(ch) => ch,
            None => break,
        };
        let (token, remaining) = if ch.is_ascii_digit() {
            let (num, remaining) = parse_integer(input)?;
            (Token::Num(num), remaining)
        } else if ch.is_alphabetic() {
            let (ident, remaining) = parse_ident(input);
            (Token::Ident(ident), remaining)
        } else if let Some((sym, remaining)) = parse_symbol(input) {
            (Token::Symbol(sym), remaining)
        } else {
            return Err(CalcError::UnexpectedChar(ch));
        };
        res.push(token);
        input = remaining;
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::{lex, Symbol, Token};
    use crate::error::CalcError;

    fn symbols(input: &str) -> Vec<Symbol> {
        lex(input)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t {
                Token::Symbol(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn longest_symbol_wins() {
        assert_eq!(
            symbols("1 ** 2 << 3 >= 4 != 5 < 6 ! ~"),
            vec![
                Symbol::Pow,
                Symbol::ShiftLeft,
                Symbol::GreaterEquals,
                Symbol::NotEquals,
                Symbol::Less,
                Symbol::Not,
                Symbol::BitwiseNot,
            ]
        );
    }

    #[test]
    fn digit_separators() {
        match lex("1_000_000").unwrap().as_slice() {
            [Token::Num(n)] => assert_eq!(n.to_string(), "1000000"),
            other => panic!("unexpected tokens {:?}", other),
        }
        assert_eq!(
            lex("1__0").unwrap_err(),
            CalcError::DigitSeparatorsOnlyBetweenDigits
        );
        assert_eq!(
            lex("10_").unwrap_err(),
            CalcError::DigitSeparatorsOnlyBetweenDigits
        );
    }

    #[test]
    fn identifiers_and_unknown_chars() {
        match lex("ans+1").unwrap().as_slice() {
            [Token::Ident(a), Token::Symbol(Symbol::Add), Token::Num(_)] => {
                assert_eq!(a, "ans")
            }
            other => panic!("unexpected tokens {:?}", other),
        }
        assert_eq!(lex("1 $ 2").unwrap_err(), CalcError::UnexpectedChar('$'));
        assert!(lex("  \t\n").unwrap().is_empty());
    }
}

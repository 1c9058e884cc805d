use crate::ast::{Bop, Expr};
use crate::error::CalcError;
use crate::lexer::{Symbol, Token};

type ParseResult<'a, T = Expr> = Result<(T, &'a [Token]), CalcError>;

fn parse_token(input: &[Token]) -> ParseResult<'_, Token> {
    match input.split_first() {
        Some((token, remaining)) => Ok((token.clone(), remaining)),
        None => Err(CalcError::ExpectedAToken),
    }
}

fn parse_fixed_symbol(input: &[Token], symbol: Symbol) -> ParseResult<'_, ()> {
    let (token, remaining) = parse_token(input)?;
    if let Token::Symbol(sym) = token {
        if sym == symbol {
            Ok(((), remaining))
        } else {
            Err(CalcError::ExpectedToken(sym, symbol))
        }
    } else {
        Err(CalcError::FoundInvalidTokenWhileExpecting(symbol))
    }
}

fn parse_parens(input: &[Token]) -> ParseResult<'_> {
    let ((), input) = parse_fixed_symbol(input, Symbol::OpenParens)?;
    let (inner, mut input) = parse_expression(input)?;
    // allow omitting closing parentheses at end of input
    if !input.is_empty() {
        let ((), remaining) = parse_fixed_symbol(input, Symbol::CloseParens)?;
        input = remaining;
    }
    Ok((Expr::Parens(Box::new(inner)), input))
}

fn parse_parens_or_literal(input: &[Token]) -> ParseResult<'_> {
    let (token, remaining) = parse_token(input)?;
    match token {
        Token::Num(n) => Ok((Expr::Num(n), remaining)),
        Token::Ident(ident) => Ok((Expr::Ident(ident), remaining)),
        Token::Symbol(Symbol::OpenParens) => parse_parens(input),
        Token::Symbol(s) => Err(CalcError::UnexpectedSymbol(s)),
    }
}

// `**` binds tighter than a prefix operator on its left but not on its
// right, so `-2 ** 2` is `-(2 ** 2)` and `2 ** -1` is `2 ** (-1)`
fn parse_power(input: &[Token]) -> ParseResult<'_> {
    let (mut result, mut input) = parse_parens_or_literal(input)?;
    if let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::Pow) {
        let (rhs, remaining) = parse_unary(remaining)?;
        result = Expr::Bop(Bop::Pow, Box::new(result), Box::new(rhs));
        input = remaining;
    }
    Ok((result, input))
}

fn parse_unary(input: &[Token]) -> ParseResult<'_> {
    let prefixes: [(Symbol, fn(Box<Expr>) -> Expr); 4] = [
        (Symbol::Sub, Expr::UnaryMinus),
        (Symbol::Add, Expr::UnaryPlus),
        (Symbol::BitwiseNot, Expr::BitwiseNot),
        (Symbol::Not, Expr::Not),
    ];
    for &(symbol, make) in &prefixes {
        if let Ok(((), remaining)) = parse_fixed_symbol(input, symbol) {
            let (operand, remaining) = parse_unary(remaining)?;
            return Ok((make(Box::new(operand)), remaining));
        }
    }
    parse_power(input)
}

// Folds `next (op next)*` to the left, trying each operator in order.
fn parse_left_assoc<'a>(
    input: &'a [Token],
    next: fn(&'a [Token]) -> ParseResult<'a>,
    operators: &[(Symbol, Bop)],
) -> ParseResult<'a> {
    let (mut result, mut input) = next(input)?;
    'outer: loop {
        for &(symbol, op) in operators {
            if let Ok(((), remaining)) = parse_fixed_symbol(input, symbol) {
                let (rhs, remaining) = next(remaining)?;
                result = Expr::Bop(op, Box::new(result), Box::new(rhs));
                input = remaining;
                continue 'outer;
            }
        }
        return Ok((result, input));
    }
}

fn parse_multiplicative(input: &[Token]) -> ParseResult<'_> {
    parse_left_assoc(
        input,
        parse_unary,
        &[
            (Symbol::Mul, Bop::Mul),
            (Symbol::Div, Bop::Div),
            (Symbol::Mod, Bop::Mod),
        ],
    )
}

fn parse_additive(input: &[Token]) -> ParseResult<'_> {
    parse_left_assoc(
        input,
        parse_multiplicative,
        &[(Symbol::Add, Bop::Add), (Symbol::Sub, Bop::Sub)],
    )
}

fn parse_bitshifts(input: &[Token]) -> ParseResult<'_> {
    parse_left_assoc(
        input,
        parse_additive,
        &[
            (Symbol::ShiftLeft, Bop::ShiftLeft),
            (Symbol::ShiftRight, Bop::ShiftRight),
        ],
    )
}

fn parse_relational(input: &[Token]) -> ParseResult<'_> {
    parse_left_assoc(
        input,
        parse_bitshifts,
        &[
            (Symbol::LessEquals, Bop::LessEquals),
            (Symbol::GreaterEquals, Bop::GreaterEquals),
            (Symbol::Less, Bop::Less),
            (Symbol::Greater, Bop::Greater),
        ],
    )
}

fn parse_equality(input: &[Token]) -> ParseResult<'_> {
    let (lhs, input) = parse_relational(input)?;
    if let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::DoubleEquals) {
        let (rhs, remaining) = parse_relational(remaining)?;
        Ok((Expr::Bop(Bop::Equals, Box::new(lhs), Box::new(rhs)), remaining))
    } else if let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::NotEquals) {
        let (rhs, remaining) = parse_relational(remaining)?;
        Ok((
            Expr::Bop(Bop::NotEquals, Box::new(lhs), Box::new(rhs)),
            remaining,
        ))
    } else {
        Ok((lhs, input))
    }
}

fn parse_bitwise_and(input: &[Token]) -> ParseResult<'_> {
    let (mut result, mut input) = parse_equality(input)?;
    while let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::BitwiseAnd) {
        let (rhs, remaining) = parse_equality(remaining)?;
        result = Expr::Bop(Bop::BitwiseAnd, Box::new(result), Box::new(rhs));
        input = remaining;
    }
    Ok((result, input))
}

fn parse_bitwise_xor(input: &[Token]) -> ParseResult<'_> {
    let (mut result, mut input) = parse_bitwise_and(input)?;
    while let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::BitwiseXor) {
        let (rhs, remaining) = parse_bitwise_and(remaining)?;
        result = Expr::Bop(Bop::BitwiseXor, Box::new(result), Box::new(rhs));
        input = remaining;
    }
    Ok((result, input))
}

fn parse_bitwise_or(input: &[Token]) -> ParseResult<'_> {
    let (mut result, mut input) = parse_bitwise_xor(input)?;
    while let Ok(((), remaining)) = parse_fixed_symbol(input, Symbol::BitwiseOr) {
        let (rhs, remaining) = parse_bitwise_xor(remaining)?;
        result = Expr::Bop(Bop::BitwiseOr, Box::new(result), Box::new(rhs));
        input = remaining;
    }
    Ok((result, input))
}

pub(crate) fn parse_expression(input: &[Token]) -> ParseResult<'_> {
    parse_bitwise_or(input)
}

pub(crate) fn parse_tokens(input: &[Token]) -> Result<Expr, CalcError> {
    let (res, remaining) = parse_expression(input)?;
    if !remaining.is_empty() {
        return Err(CalcError::UnexpectedInput);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::parse_tokens;
    use crate::error::CalcError;
    use crate::lexer::{lex, Symbol};

    #[track_caller]
    fn test_parse(input: &str, expected: &str) {
        let tokens = lex(input).unwrap();
        assert_eq!(parse_tokens(&tokens).unwrap().to_string(), expected);
    }

    #[track_caller]
    fn expect_parse_error(input: &str, expected: CalcError) {
        let tokens = lex(input).unwrap();
        assert_eq!(parse_tokens(&tokens).unwrap_err(), expected);
    }

    #[test]
    fn precedence() {
        test_parse("1 + 2 * 3", "(1+(2*3))");
        test_parse("1 - 2 - 3", "((1-2)-3)");
        test_parse("8 / 4 % 3", "((8/4)%3)");
        test_parse("1 << 2 + 3", "(1<<(2+3))");
        test_parse("1 | 2 ^ 3 & 4", "(1|(2^(3&4)))");
        test_parse("1 + 1 == 2 & true", "(((1+1)==2)&true)");
        test_parse("1 < 2 == true", "((1<2)==true)");
    }

    #[test]
    fn power_and_prefix_operators() {
        test_parse("2 ** 3 ** 2", "(2**(3**2))");
        test_parse("-2 ** 2", "(-(2**2))");
        test_parse("2 ** -1", "(2**(-1))");
        test_parse("--3", "(-(-3))");
        test_parse("~!+x", "(~(!(+x)))");
        test_parse("2 * -3", "(2*(-3))");
    }

    #[test]
    fn parentheses() {
        test_parse("(1 + 2) * 3", "(((1+2))*3)");
        test_parse("2 * (3 + 4", "(2*((3+4)))");
        expect_parse_error(
            "(1 2",
            CalcError::FoundInvalidTokenWhileExpecting(Symbol::CloseParens),
        );
    }

    #[test]
    fn malformed_input() {
        expect_parse_error("1 +", CalcError::ExpectedAToken);
        expect_parse_error("* 2", CalcError::UnexpectedSymbol(Symbol::Mul));
        expect_parse_error("1 2", CalcError::UnexpectedInput);
        expect_parse_error("1 == 2 == 3", CalcError::UnexpectedInput);
        expect_parse_error("()", CalcError::UnexpectedSymbol(Symbol::CloseParens));
    }
}

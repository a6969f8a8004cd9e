//! Recursive-descent parser for arithmetic formula expressions.
//!
//! Grammar (conventional precedence, left-associative binary operators):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::ast::{BinOp, Expr};
use crate::error::SyntaxError;
use crate::lexer::{lex, Spanned, Token};

/// Nesting bound for parentheses and unary operators.
pub const MAX_DEPTH: usize = 64;

/// Token bound for a whole expression. Binary chains build a left-leaning
/// tree, so this also bounds the depth of the tree handed to evaluators.
pub const MAX_TOKENS: usize = 1024;

/// Lex and parse `src` into an expression tree.
pub fn parse_expression(src: &str) -> Result<Expr, SyntaxError> {
    let tokens = lex(src)?;
    if let Some(extra) = tokens.get(MAX_TOKENS) {
        return Err(SyntaxError::new(
            extra.offset,
            format!("expression longer than {} tokens", MAX_TOKENS),
        ));
    }
    let mut parser = Parser::new(&tokens);
    if parser.peek() == &Token::Eof {
        return Err(parser.err("empty expression"));
    }
    let expr = parser.parse_expr()?;
    if parser.peek() != &Token::Eof {
        return Err(parser.err(format!("unexpected {}", describe(parser.peek()))));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.cur().offset, msg)
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.err("expression nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(Expr::Neg(Box::new(operand)))
            }
            Token::Plus => {
                self.advance();
                self.enter()?;
                let operand = self.parse_unary()?;
                self.leave();
                Ok(operand)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek().clone() {
            Token::Number(text) => {
                let offset = self.cur().offset;
                self.advance();
                Decimal::from_str(&text)
                    .map(Expr::Number)
                    .map_err(|_| SyntaxError::new(offset, format!("number '{}' out of range", text)))
            }
            Token::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_expr()?;
                self.leave();
                if self.peek() != &Token::RParen {
                    return Err(self.err(format!("expected ')', got {}", describe(self.peek()))));
                }
                self.advance();
                Ok(inner)
            }
            other => Err(self.err(format!("expected a number or '(', got {}", describe(&other)))),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number '{}'", n),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Eof => "end of expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> Expr {
        Expr::Number(Decimal::from(n))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse_expression("10 * 2 + 1").unwrap(),
            Expr::binary(BinOp::Add, Expr::binary(BinOp::Mul, num(10), num(2)), num(1))
        );
        assert_eq!(
            parse_expression("1 + 10 * 2").unwrap(),
            Expr::binary(BinOp::Add, num(1), Expr::binary(BinOp::Mul, num(10), num(2)))
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            parse_expression("8 - 3 - 2").unwrap(),
            Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, num(8), num(3)), num(2))
        );
    }

    #[test]
    fn parentheses_group() {
        assert_eq!(
            parse_expression("(1 + 2) * 3").unwrap(),
            Expr::binary(BinOp::Mul, Expr::binary(BinOp::Add, num(1), num(2)), num(3))
        );
    }

    #[test]
    fn unary_minus_applies_to_substituted_negatives() {
        assert_eq!(
            parse_expression("10 - -5").unwrap(),
            Expr::binary(BinOp::Sub, num(10), Expr::Neg(Box::new(num(5))))
        );
        assert_eq!(parse_expression("+4").unwrap(), num(4));
    }

    #[test]
    fn rejects_malformed_input() {
        for src in ["", "   ", "1 +", "(1 + 2", "1 + 2)", "()", "2 (3)", "* 2", "1.2.3"] {
            assert!(parse_expression(src).is_err(), "accepted {:?}", src);
        }
    }

    #[test]
    fn reports_offset_of_unbalanced_paren() {
        let err = parse_expression("(1 + 2").unwrap_err();
        assert_eq!(err.offset, 6);
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn deep_nesting_is_rejected_not_overflowed() {
        let src = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        let err = parse_expression(&src).unwrap_err();
        assert!(err.message.contains("nested too deeply"));
        let src = format!("{}1", "-".repeat(200));
        let err = parse_expression(&src).unwrap_err();
        assert!(err.message.contains("nested too deeply"));
        let src = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse_expression(&src).is_err());
    }

    #[test]
    fn long_operator_chain_is_rejected() {
        let src = format!("1{}", " + 1".repeat(20_000));
        let err = parse_expression(&src).unwrap_err();
        assert!(err.message.contains("longer than"));
        assert!(err.offset > 0);

        let src = format!("1{}", " * 2".repeat(200));
        assert!(parse_expression(&src).is_ok());
    }

    #[test]
    fn oversized_literal_is_a_syntax_error() {
        let err = parse_expression("99999999999999999999999999999999999").unwrap_err();
        assert!(err.message.contains("out of range"));
    }
}

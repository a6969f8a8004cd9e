use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Numeric literal, kept as text so the parser controls conversion
    Number(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// Byte offset of the token's first character
    pub offset: usize,
}

/// Split an arithmetic expression into tokens.
///
/// Accepts exactly the characters the evaluator allows: ASCII digits, `.`,
/// whitespace, `+ - * /` and parentheses. Any other character is an error.
/// The returned vector always ends with [`Token::Eof`].
pub fn lex(src: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut text = String::new();
            let mut seen_dot = false;
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    text.push(d);
                } else if d == '.' && !seen_dot {
                    seen_dot = true;
                    text.push(d);
                } else {
                    break;
                }
                chars.next();
            }
            if text == "." {
                return Err(SyntaxError::new(offset, "expected digits around '.'"));
            }
            // "5." and ".5" are both legal literals
            if text.starts_with('.') {
                text.insert(0, '0');
            }
            if text.ends_with('.') {
                text.pop();
            }
            tokens.push(Spanned {
                token: Token::Number(text),
                offset,
            });
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => {
                return Err(SyntaxError::new(
                    offset,
                    format!("unexpected character '{}'", other),
                ))
            }
        };
        tokens.push(Spanned { token, offset });
        chars.next();
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: src.len(),
    });
    Ok(tokens)
}

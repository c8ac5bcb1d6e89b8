//! Tokenizer for constraint expressions.

use std::fmt::{self, Display};

use crate::error::GrammarError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    Quoted(String),
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    Pipe,
    Dot,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Question,
}

impl TokenKind {
    pub(crate) fn is_comparator(&self) -> bool {
        matches!(
            self,
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge | TokenKind::EqEq
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => f.write_str(name),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Quoted(s) => write!(f, "'{}'", s),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Le => f.write_str("<="),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::Ge => f.write_str(">="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::Pipe => f.write_str("|"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Comma => f.write_str(","),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Question => f.write_str("?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits an expression into tokens, skipping whitespace.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, GrammarError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match ch {
            '<' | '>' => {
                chars.next();
                let inclusive = chars.next_if(|&(_, c)| c == '=').is_some();
                match (ch, inclusive) {
                    ('<', false) => TokenKind::Lt,
                    ('<', true) => TokenKind::Le,
                    ('>', false) => TokenKind::Gt,
                    _ => TokenKind::Ge,
                }
            }
            '=' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_none() {
                    return Err(GrammarError::UnexpectedChar { ch, offset });
                }
                TokenKind::EqEq
            }
            '|' => single(&mut chars, TokenKind::Pipe),
            '.' => single(&mut chars, TokenKind::Dot),
            ',' => single(&mut chars, TokenKind::Comma),
            '[' => single(&mut chars, TokenKind::LBracket),
            ']' => single(&mut chars, TokenKind::RBracket),
            '(' => single(&mut chars, TokenKind::LParen),
            ')' => single(&mut chars, TokenKind::RParen),
            '?' => single(&mut chars, TokenKind::Question),
            '\'' | '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => break,
                        },
                        c if c == ch => {
                            closed = true;
                            break;
                        }
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(GrammarError::UnterminatedString { offset });
                }
                TokenKind::Quoted(text)
            }
            c if c.is_ascii_digit() || c == '-' => lex_number(input, &mut chars, offset)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(input[offset..end].to_string())
            }
            _ => return Err(GrammarError::UnexpectedChar { ch, offset }),
        };

        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn single(chars: &mut Chars<'_>, kind: TokenKind) -> TokenKind {
    chars.next();
    kind
}

/// Lexes `-?digits(.digits)?`.
fn lex_number(
    input: &str,
    chars: &mut Chars<'_>,
    offset: usize,
) -> Result<TokenKind, GrammarError> {
    let mut end = offset;
    if let Some((i, '-')) = chars.next_if(|&(_, c)| c == '-') {
        end = i + 1;
        if !matches!(chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
            return Err(GrammarError::UnexpectedChar { ch: '-', offset });
        }
    }

    let mut seen_dot = false;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_ascii_digit() {
            end = i + 1;
            chars.next();
        } else if c == '.' && !seen_dot && next_is_digit(input, i + 1) {
            seen_dot = true;
            end = i + 1;
            chars.next();
        } else {
            break;
        }
    }

    let text = &input[offset..end];
    text.parse::<f64>()
        .map(TokenKind::Number)
        .map_err(|_| GrammarError::UnexpectedChar {
            ch: text.chars().next().unwrap_or('-'),
            offset,
        })
}

fn next_is_digit(input: &str, at: usize) -> bool {
    input[at..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

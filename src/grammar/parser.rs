//! Recursive-descent parser from tokens to [`ConstraintNode`].

use crate::error::GrammarError;
use crate::format::StringFormat;

use super::ast::{check_range, Bound, ConstraintNode, Literal, PrimitiveKind};
use super::lexer::{tokenize, Token, TokenKind};

/// Identifiers that are part of the grammar and never name an alias.
pub(crate) const KEYWORDS: [&str; 6] = ["string", "number", "boolean", "true", "false", "null"];

pub(crate) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    is_alias: &'a dyn Fn(&str) -> bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        input: &str,
        is_alias: &'a dyn Fn(&str) -> bool,
    ) -> Result<Self, GrammarError> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            is_alias,
        })
    }

    /// `expression := union '?'? EOF`
    pub(crate) fn parse_expression(mut self) -> Result<ConstraintNode, GrammarError> {
        if self.tokens.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut node = self.parse_union()?;

        if let Some(token) = self.advance() {
            if token.kind != TokenKind::Question {
                return Err(unexpected(&token, "end of expression"));
            }
            if let Some(trailing) = self.peek() {
                return Err(GrammarError::MisplacedOptional {
                    offset: if trailing.kind == TokenKind::Question {
                        trailing.offset
                    } else {
                        token.offset
                    },
                });
            }
            node = node.optional();
        }

        node.check()?;
        Ok(node)
    }

    /// `union := term ('|' term)*`
    fn parse_union(&mut self) -> Result<ConstraintNode, GrammarError> {
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Pipe {
                return Err(GrammarError::EmptyUnionBranch {
                    offset: token.offset,
                });
            }
        }

        let mut alternatives = vec![self.parse_term()?];
        while let Some(pipe) = self.next_if(|k| *k == TokenKind::Pipe) {
            let branch_missing = match self.peek() {
                None => true,
                Some(next) => matches!(
                    next.kind,
                    TokenKind::Pipe
                        | TokenKind::RBracket
                        | TokenKind::RParen
                        | TokenKind::Comma
                        | TokenKind::Question
                ),
            };
            if branch_missing {
                return Err(GrammarError::EmptyUnionBranch {
                    offset: pipe.offset,
                });
            }
            alternatives.push(self.parse_term()?);
        }

        if alternatives.len() == 1 {
            return Ok(alternatives.remove(0));
        }
        Ok(ConstraintNode::union(alternatives))
    }

    /// `term := NUMBER cmp operand (cmp NUMBER)? | postfix (cmp NUMBER)?`
    fn parse_term(&mut self) -> Result<ConstraintNode, GrammarError> {
        let left_bounded = matches!(
            (self.peek_kind(0), self.peek_kind(1)),
            (Some(TokenKind::Number(_)), Some(cmp)) if cmp.is_comparator()
        );

        if left_bounded {
            let value = self.expect_number()?;
            let left_cmp = self.expect_comparator()?;
            let target_offset = self.current_offset();
            let kind = boundable_kind(&self.parse_postfix()?, target_offset)?;

            let right = match self.next_if(TokenKind::is_comparator) {
                Some(cmp) => Some((cmp, self.expect_number()?)),
                None => None,
            };
            self.reject_extra_comparator()?;
            return build_range(kind, Some((value, left_cmp)), right);
        }

        let target_offset = self.current_offset();
        let node = self.parse_postfix()?;
        match self.next_if(TokenKind::is_comparator) {
            Some(cmp) => {
                let kind = boundable_kind(&node, target_offset)?;
                let bound = self.expect_number()?;
                self.reject_extra_comparator()?;
                build_range(kind, None, Some((cmp, bound)))
            }
            None => Ok(node),
        }
    }

    /// `postfix := atom ('[' ']')*`
    fn parse_postfix(&mut self) -> Result<ConstraintNode, GrammarError> {
        let mut node = self.parse_atom()?;
        while let Some(open) = self.next_if(|k| *k == TokenKind::LBracket) {
            if self.next_if(|k| *k == TokenKind::RBracket).is_none() {
                return Err(GrammarError::UnbalancedBrackets {
                    offset: open.offset,
                });
            }
            node = node.array();
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<ConstraintNode, GrammarError> {
        let token = self
            .advance()
            .ok_or(GrammarError::UnexpectedEnd { expected: "a type" })?;

        match token.kind {
            TokenKind::Quoted(text) => Ok(ConstraintNode::Literal(Literal::String(text))),
            TokenKind::Number(n) => Ok(ConstraintNode::Literal(Literal::Number(n))),
            TokenKind::Ident(name) => self.parse_named(name, token.offset),
            TokenKind::LParen => {
                let inner = self.parse_union()?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) if other.kind != TokenKind::RBracket => {
                        Err(unexpected(&other, "')'"))
                    }
                    _ => Err(GrammarError::UnbalancedBrackets {
                        offset: token.offset,
                    }),
                }
            }
            TokenKind::LBracket => self.parse_tuple(token.offset),
            _ => Err(unexpected(&token, "a type")),
        }
    }

    /// Parses the rest of `[a, b, ...]` after the opening bracket.
    fn parse_tuple(&mut self, open: usize) -> Result<ConstraintNode, GrammarError> {
        let mut items = Vec::new();
        if self.next_if(|k| *k == TokenKind::RBracket).is_some() {
            return Ok(ConstraintNode::Tuple(items));
        }

        loop {
            items.push(self.parse_union()?);
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Comma,
                    offset,
                }) => {
                    if matches!(self.peek_kind(0), Some(TokenKind::RBracket) | None) {
                        return Err(match self.peek() {
                            Some(close) => GrammarError::UnexpectedToken {
                                expected: "a tuple element",
                                found: "]".to_string(),
                                offset: close.offset,
                            },
                            None => GrammarError::UnbalancedBrackets { offset },
                        });
                    }
                }
                Some(Token {
                    kind: TokenKind::RBracket,
                    ..
                }) => return Ok(ConstraintNode::Tuple(items)),
                Some(other) if other.kind != TokenKind::RParen => {
                    return Err(unexpected(&other, "',' or ']'"))
                }
                _ => return Err(GrammarError::UnbalancedBrackets { offset: open }),
            }
        }
    }

    /// Resolves an identifier: type keyword (with optional `.suffix`), literal
    /// keyword, or scope alias.
    fn parse_named(&mut self, name: String, offset: usize) -> Result<ConstraintNode, GrammarError> {
        match name.as_str() {
            "true" => return Ok(ConstraintNode::Literal(Literal::Boolean(true))),
            "false" => return Ok(ConstraintNode::Literal(Literal::Boolean(false))),
            "null" => return Ok(ConstraintNode::Literal(Literal::Null)),
            _ => {}
        }

        let suffix = match self.next_if(|k| *k == TokenKind::Dot) {
            Some(_) => match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(suffix),
                    ..
                }) => Some(suffix),
                Some(other) => return Err(unexpected(&other, "a format name")),
                None => {
                    return Err(GrammarError::UnexpectedEnd {
                        expected: "a format name",
                    })
                }
            },
            None => None,
        };

        let unknown_format = |format: String| GrammarError::UnknownFormat {
            base: name.clone(),
            format,
            offset,
        };

        match (name.as_str(), suffix) {
            ("string", None) => Ok(ConstraintNode::Primitive(PrimitiveKind::String)),
            ("string", Some(format)) => StringFormat::from_suffix(&format)
                .map(ConstraintNode::StringFormat)
                .ok_or_else(|| unknown_format(format)),
            ("number", None) => Ok(ConstraintNode::Primitive(PrimitiveKind::Number)),
            ("number", Some(format)) if format == "integer" => {
                Ok(ConstraintNode::Primitive(PrimitiveKind::Integer))
            }
            ("boolean", None) => Ok(ConstraintNode::Primitive(PrimitiveKind::Boolean)),
            ("number" | "boolean", Some(format)) => Err(unknown_format(format)),
            (alias, None) if (self.is_alias)(alias) => Ok(ConstraintNode::Reference(name.clone())),
            (_, Some(format)) if (self.is_alias)(&name) => Err(unknown_format(format)),
            _ => Err(GrammarError::UnknownType {
                name: name.clone(),
                offset,
            }),
        }
    }

    fn reject_extra_comparator(&mut self) -> Result<(), GrammarError> {
        match self.peek() {
            Some(token) if token.kind.is_comparator() => Err(GrammarError::UnbalancedRange {
                reason: "a range takes at most two comparators",
                offset: token.offset,
            }),
            _ => Ok(()),
        }
    }

    fn expect_number(&mut self) -> Result<f64, GrammarError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Number(n),
                ..
            }) => Ok(n),
            Some(other) => Err(unexpected(&other, "a numeric bound")),
            None => Err(GrammarError::UnexpectedEnd {
                expected: "a numeric bound",
            }),
        }
    }

    fn expect_comparator(&mut self) -> Result<Token, GrammarError> {
        self.next_if(TokenKind::is_comparator)
            .ok_or(GrammarError::UnexpectedEnd {
                expected: "a comparator",
            })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn current_offset(&self) -> usize {
        self.peek()
            .map(|t| t.offset)
            .or_else(|| self.tokens.last().map(|t| t.offset))
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn next_if(&mut self, predicate: impl Fn(&TokenKind) -> bool) -> Option<Token> {
        match self.peek() {
            Some(token) if predicate(&token.kind) => self.advance(),
            _ => None,
        }
    }
}

/// Maps a token found where something else was expected to the closest error.
fn unexpected(token: &Token, expected: &'static str) -> GrammarError {
    match token.kind {
        TokenKind::Question => GrammarError::MisplacedOptional {
            offset: token.offset,
        },
        TokenKind::RBracket | TokenKind::RParen | TokenKind::LBracket => {
            GrammarError::UnbalancedBrackets {
                offset: token.offset,
            }
        }
        TokenKind::Pipe => GrammarError::EmptyUnionBranch {
            offset: token.offset,
        },
        _ => GrammarError::UnexpectedToken {
            expected,
            found: token.kind.to_string(),
            offset: token.offset,
        },
    }
}

fn boundable_kind(node: &ConstraintNode, offset: usize) -> Result<PrimitiveKind, GrammarError> {
    match node {
        ConstraintNode::Primitive(kind) if kind.is_boundable() => Ok(*kind),
        other => Err(GrammarError::UnboundableType {
            target: other.to_string(),
            offset,
        }),
    }
}

/// Builds a range from the comparators found on each side of the bounded type.
fn build_range(
    kind: PrimitiveKind,
    left: Option<(f64, Token)>,
    right: Option<(Token, f64)>,
) -> Result<ConstraintNode, GrammarError> {
    let (min, max) = match (left, right) {
        (Some((lo, lcmp)), Some((rcmp, hi))) => {
            let lower = match lcmp.kind {
                TokenKind::Lt => Bound::exclusive(lo),
                TokenKind::Le => Bound::inclusive(lo),
                _ => return Err(double_bound_error(lcmp.offset)),
            };
            let upper = match rcmp.kind {
                TokenKind::Lt => Bound::exclusive(hi),
                TokenKind::Le => Bound::inclusive(hi),
                _ => return Err(double_bound_error(rcmp.offset)),
            };
            (Some(lower), Some(upper))
        }
        // `value OP kind` reads right to left: `5 < n` bounds n from below.
        (Some((value, cmp)), None) => match cmp.kind {
            TokenKind::Lt => (Some(Bound::exclusive(value)), None),
            TokenKind::Le => (Some(Bound::inclusive(value)), None),
            TokenKind::Gt => (None, Some(Bound::exclusive(value))),
            TokenKind::Ge => (None, Some(Bound::inclusive(value))),
            _ => (Some(Bound::inclusive(value)), Some(Bound::inclusive(value))),
        },
        (None, Some((cmp, value))) => match cmp.kind {
            TokenKind::Gt => (Some(Bound::exclusive(value)), None),
            TokenKind::Ge => (Some(Bound::inclusive(value)), None),
            TokenKind::Lt => (None, Some(Bound::exclusive(value))),
            TokenKind::Le => (None, Some(Bound::inclusive(value))),
            _ => (Some(Bound::inclusive(value)), Some(Bound::inclusive(value))),
        },
        (None, None) => (None, None),
    };

    check_range(kind, min, max)?;
    Ok(ConstraintNode::Range { kind, min, max })
}

fn double_bound_error(offset: usize) -> GrammarError {
    GrammarError::UnbalancedRange {
        reason: "double-bounded ranges must use < or <= on both sides",
        offset,
    }
}

use crate::lang::ast::*;
use crate::lang::builtins::{self, Builtin, QUALIFIERS, VARIABLE};
use crate::lang::error::{LangError, LangResult};
use crate::lang::token::{Span, Token, TokenKind};

/// Deepest expression tree accepted before giving up. Counts nested
/// subexpressions as well as operator chains such as `x+x+x`.
const MAX_DEPTH: usize = 200;

/// Pratt parser for single-variable function expressions.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse a whole expression; trailing tokens are an error.
    pub fn parse_expression(&mut self) -> LangResult<Expr> {
        if self.is_at_end() {
            return Err(LangError::parse("empty expression"));
        }
        let expr = self.parse_expr(0)?;
        if !self.is_at_end() {
            let tok = self.peek();
            return Err(
                LangError::parse(format!("unexpected {:?} after expression", tok.kind))
                    .with_span(tok.span),
            );
        }
        Ok(expr)
    }

    /// Pratt parser: parse expression with given minimum binding power.
    fn parse_expr(&mut self, min_bp: u8) -> LangResult<Expr> {
        let saved = self.depth;
        self.enter()?;
        let result = self.parse_expr_inner(min_bp);
        self.depth = saved;
        result
    }

    /// One level deeper into the tree; fails past [`MAX_DEPTH`].
    fn enter(&mut self) -> LangResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(LangError::parse("expression is nested too deeply").with_span(self.peek().span));
        }
        Ok(())
    }

    fn parse_expr_inner(&mut self, min_bp: u8) -> LangResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let (op, left_bp, right_bp) = match self.peek_kind() {
                TokenKind::Plus => (BinOpKind::Add, 9, 10),
                TokenKind::Minus => (BinOpKind::Sub, 9, 10),
                TokenKind::Star => (BinOpKind::Mul, 11, 12),
                TokenKind::Slash => (BinOpKind::Div, 11, 12),
                TokenKind::Percent => (BinOpKind::Mod, 11, 12),
                // `x(x+1)`: the lexer leaves identifier-paren pairs alone
                TokenKind::LParen => (BinOpKind::Mul, 11, 12),
                TokenKind::Pow => (BinOpKind::Pow, 16, 15), // right-associative
                _ => break,
            };

            if left_bp < min_bp {
                break;
            }

            // Each operator in a chain adds a level to the left spine
            self.enter()?;
            if self.peek_kind() != TokenKind::LParen {
                self.advance(); // consume operator
            }
            let rhs = self.parse_expr(right_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::BinOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }

        Ok(lhs)
    }

    /// Parse prefix expression (atom or unary operator).
    fn parse_prefix(&mut self) -> LangResult<Expr> {
        match self.peek_kind() {
            TokenKind::Number(_) => self.parse_number(),
            TokenKind::Ident(_) => self.parse_name(),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::Minus => {
                let op_span = self.advance().span;
                let operand = self.parse_expr(13)?; // unary - binds tighter than + - but looser than ^
                let span = op_span.merge(operand.span());
                Ok(Expr::Neg {
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_expr(13)
            }
            TokenKind::Pipe => self.parse_abs(),
            _ => {
                let tok = self.peek();
                Err(LangError::parse(format!(
                    "expected expression, found {:?}",
                    tok.kind
                ))
                .with_span(tok.span))
            }
        }
    }

    fn parse_number(&mut self) -> LangResult<Expr> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n, tok.span)),
            _ => unreachable!(),
        }
    }

    /// Identifier, optionally qualified: `x`, `pi`, `sin(x)`, `np.sqrt(x)`.
    fn parse_name(&mut self) -> LangResult<Expr> {
        let tok = self.advance();
        let TokenKind::Ident(first) = tok.kind else {
            unreachable!()
        };
        let mut span = tok.span;
        let mut qualified = false;

        let name = if self.peek_kind() == TokenKind::Dot {
            if !QUALIFIERS.contains(&first.as_str()) {
                return Err(LangError::name(format!(
                    "attribute access on '{}' is not supported",
                    first
                ))
                .with_span(span));
            }
            self.advance();
            let member = self.advance();
            match member.kind {
                TokenKind::Ident(name) => {
                    span = span.merge(member.span);
                    qualified = true;
                    name
                }
                other => {
                    return Err(LangError::parse(format!(
                        "expected a name after '{}.', found {:?}",
                        first, other
                    ))
                    .with_span(member.span))
                }
            }
        } else {
            first
        };

        if name == VARIABLE && !qualified {
            return Ok(Expr::Var(span));
        }

        match builtins::lookup(&name) {
            Some(Builtin::Const(value)) => Ok(Expr::Number(value, span)),
            Some(Builtin::Func { unary, binary }) => {
                if self.peek_kind() != TokenKind::LParen {
                    return Err(LangError::parse(format!(
                        "'{}' is a function, call it as {}(...)",
                        name, name
                    ))
                    .with_span(span));
                }
                self.parse_call(&name, span, unary, binary)
            }
            None => Err(LangError::name(format!("unknown identifier '{}'", name)).with_span(span)),
        }
    }

    fn parse_call(
        &mut self,
        name: &str,
        start: Span,
        unary: Option<builtins::UnaryFn>,
        binary: Option<builtins::BinaryFn>,
    ) -> LangResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();

        if self.peek_kind() != TokenKind::RParen {
            args.push(self.parse_expr(0)?);
            while self.peek_kind() == TokenKind::Comma {
                self.advance();
                if self.peek_kind() == TokenKind::RParen {
                    break;
                }
                args.push(self.parse_expr(0)?);
            }
        }

        let end = self.expect(TokenKind::RParen)?.span;
        let span = start.merge(end);

        let got = args.len();
        let mut args = args.into_iter();
        match (unary, binary, args.next(), args.next(), args.next()) {
            (Some(func), _, Some(arg), None, None) => Ok(Expr::Call1 {
                func,
                arg: Box::new(arg),
                span,
            }),
            (_, Some(func), Some(lhs), Some(rhs), None) => Ok(Expr::Call2 {
                func,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            }),
            _ => {
                let expected = match (unary.is_some(), binary.is_some()) {
                    (true, true) => "1 or 2 arguments",
                    (true, false) => "1 argument",
                    _ => "2 arguments",
                };
                Err(LangError::arity(format!(
                    "{} expects {}, got {}",
                    name, expected, got
                ))
                .with_span(span))
            }
        }
    }

    fn parse_grouped(&mut self) -> LangResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_abs(&mut self) -> LangResult<Expr> {
        let start = self.expect(TokenKind::Pipe)?.span;
        let inner = self.parse_expr(0)?;
        let end = self.expect(TokenKind::Pipe)?.span;
        // Desugar |x| to abs(x)
        Ok(Expr::Call1 {
            func: builtins::UnaryFn {
                name: "abs",
                func: f64::abs,
            },
            arg: Box::new(inner),
            span: start.merge(end),
        })
    }

    // --- Token helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> LangResult<Token> {
        let tok = self.peek().clone();
        if std::mem::discriminant(&tok.kind) == std::mem::discriminant(&kind) {
            Ok(self.advance())
        } else {
            Err(LangError::parse(format!(
                "expected {:?}, found {:?}",
                kind, tok.kind
            ))
            .with_span(tok.span))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.tokens[self.pos].kind, TokenKind::Eof)
    }
}

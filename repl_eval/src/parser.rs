//! Recursive-descent parser
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparisons, `+ -`,
//! `* / // %`, unary `- +`, `**`, then calls and attribute access.
//! `**` binds tighter than a unary operator on its left and is
//! right-associative, so `-2 ** 2` is `-(2 ** 2)`.

use crate::ast::{BinOp, BoolOp, CmpOp, Expr, Stmt, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::{tokenize, Spanned, Token};

/// Deepest expression tree the parser builds
///
/// Parenthesised groups, unary operators, calls and each link of an
/// operator chain all count toward it, which keeps evaluation recursion
/// bounded along with the parser's own.
pub const MAX_NESTING: usize = 100;

/// Parses text as a single expression
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(source)?;
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parses text as a `;`-separated statement sequence
///
/// Empty text and empty statements parse to nothing.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, SyntaxError> {
    let mut parser = Parser::new(source)?;
    let mut statements = Vec::new();

    loop {
        while parser.eat(&Token::Semicolon) {}
        if parser.at_end() {
            break;
        }
        statements.push(parser.statement()?);
        if !parser.at_end() && !parser.eat(&Token::Semicolon) {
            return Err(parser.unexpected());
        }
    }

    Ok(statements)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end_column: usize,
    depth: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            end_column: source.chars().count() + 1,
            depth: 0,
        })
    }

    /// Goes one level deeper, failing past `MAX_NESTING`
    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::new(
                "expression nested too deeply",
                self.column(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn column(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|s| s.column)
            .unwrap_or(self.end_column)
    }

    fn unexpected(&self) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError::new(
                format!("invalid syntax near '{}'", token.describe()),
                self.column(),
            ),
            None => SyntaxError::new("unexpected end of input", self.column()),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SyntaxError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_name(&mut self) -> Result<String, SyntaxError> {
        match self.peek() {
            Some(Token::Name(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::Pass), _) => {
                self.pos += 1;
                Ok(Stmt::Pass)
            }
            (Some(Token::Del), _) => {
                self.pos += 1;
                let mut names = vec![self.expect_name()?];
                while self.eat(&Token::Comma) {
                    names.push(self.expect_name()?);
                }
                Ok(Stmt::Del(names))
            }
            (Some(Token::Name(_)), Some(Token::Assign)) => {
                let name = self.expect_name()?;
                self.pos += 1;
                let value = self.expression()?;
                Ok(Stmt::Assign { name, value })
            }
            (Some(Token::Name(_)), Some(Token::AugAssign(op))) => {
                let op = *op;
                let name = self.expect_name()?;
                self.pos += 1;
                let value = self.expression()?;
                Ok(Stmt::AugAssign { name, op, value })
            }
            _ => Ok(Stmt::Expr(self.expression()?)),
        }
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.or_test()
    }

    fn or_test(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut left = self.and_test()?;
        while self.eat(&Token::Or) {
            self.enter()?;
            let right = self.and_test()?;
            left = Expr::Logical {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn and_test(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut left = self.not_test()?;
        while self.eat(&Token::And) {
            self.enter()?;
            let right = self.not_test()?;
            left = Expr::Logical {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn not_test(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&Token::Not) {
            let depth = self.depth;
            self.enter()?;
            let operand = self.not_test()?;
            self.depth = depth;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.arith()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => CmpOp::Eq,
                Some(Token::NotEq) => CmpOp::NotEq,
                Some(Token::Lt) => CmpOp::Lt,
                Some(Token::Le) => CmpOp::Le,
                Some(Token::Gt) => CmpOp::Gt,
                Some(Token::Ge) => CmpOp::Ge,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.arith()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn arith(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.enter()?;
            let right = self.term()?;
            left = binary(op, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.pos += 1;
            self.enter()?;
            let right = self.factor()?;
            left = binary(op, left, right);
        }
        self.depth = depth;
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Pos,
            _ => return self.power(),
        };
        self.pos += 1;
        let depth = self.depth;
        self.enter()?;
        let operand = self.factor()?;
        self.depth = depth;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.primary()?;
        if self.eat(&Token::DoubleStar) {
            let depth = self.depth;
            self.enter()?;
            let exponent = self.factor()?;
            self.depth = depth;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut expr = self.atom()?;
        loop {
            if self.eat(&Token::Dot) {
                self.enter()?;
                let name = self.expect_name()?;
                expr = Expr::Attribute {
                    target: Box::new(expr),
                    name,
                };
            } else if self.eat(&Token::LParen) {
                self.enter()?;
                let (args, keywords) = self.call_arguments()?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    keywords,
                };
            } else {
                self.depth = depth;
                return Ok(expr);
            }
        }
    }

    /// Arguments after an opening parenthesis, through the closing one
    fn call_arguments(&mut self) -> Result<(Vec<Expr>, Vec<(String, Expr)>), SyntaxError> {
        let mut args = Vec::new();
        let mut keywords: Vec<(String, Expr)> = Vec::new();

        while !self.eat(&Token::RParen) {
            let is_keyword = matches!(
                (self.peek(), self.peek_at(1)),
                (Some(Token::Name(_)), Some(Token::Assign))
            );
            if is_keyword {
                let column = self.column();
                let name = self.expect_name()?;
                self.pos += 1;
                if keywords.iter().any(|(existing, _)| *existing == name) {
                    return Err(SyntaxError::new(
                        format!("keyword argument repeated: {}", name),
                        column,
                    ));
                }
                keywords.push((name, self.expression()?));
            } else if !keywords.is_empty() {
                return Err(SyntaxError::new(
                    "positional argument follows keyword argument",
                    self.column(),
                ));
            } else {
                args.push(self.expression()?);
            }

            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }

        Ok((args, keywords))
    }

    fn atom(&mut self) -> Result<Expr, SyntaxError> {
        let column = self.column();
        let expr = match self.advance() {
            Some(Token::Int(i)) => Expr::Int(i),
            Some(Token::Float(x)) => Expr::Float(x),
            Some(Token::Str(s)) => {
                let mut text = s;
                while let Some(Token::Str(next)) = self.peek() {
                    text.push_str(next);
                    self.pos += 1;
                }
                Expr::Str(text)
            }
            Some(Token::Name(name)) => Expr::Name(name),
            Some(Token::True) => Expr::Bool(true),
            Some(Token::False) => Expr::Bool(false),
            Some(Token::NoneKw) => Expr::None,
            Some(Token::LParen) => {
                let depth = self.depth;
                self.enter()?;
                let inner = self.expression()?;
                self.expect(&Token::RParen)?;
                self.depth = depth;
                inner
            }
            Some(token) => {
                return Err(SyntaxError::new(
                    format!("invalid syntax near '{}'", token.describe()),
                    column,
                ))
            }
            None => return Err(SyntaxError::new("unexpected end of input", column)),
        };
        Ok(expr)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

//! Tokenizer for single-line source text

use crate::ast::BinOp;
use crate::error::SyntaxError;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),

    // Keywords
    And,
    Or,
    Not,
    True,
    False,
    NoneKw,
    Pass,
    Del,
    /// A reserved word with no meaning in this grammar (`if`, `def`, ...)
    Reserved(String),

    // Operators
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    AugAssign(BinOp),

    // Delimiters
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
}

impl Token {
    /// Source-like text for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Str(_) => "string literal".to_string(),
            Self::Name(n) | Self::Reserved(n) => n.clone(),
            Self::And => "and".to_string(),
            Self::Or => "or".to_string(),
            Self::Not => "not".to_string(),
            Self::True => "True".to_string(),
            Self::False => "False".to_string(),
            Self::NoneKw => "None".to_string(),
            Self::Pass => "pass".to_string(),
            Self::Del => "del".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::DoubleStar => "**".to_string(),
            Self::Slash => "/".to_string(),
            Self::DoubleSlash => "//".to_string(),
            Self::Percent => "%".to_string(),
            Self::EqEq => "==".to_string(),
            Self::NotEq => "!=".to_string(),
            Self::Lt => "<".to_string(),
            Self::Le => "<=".to_string(),
            Self::Gt => ">".to_string(),
            Self::Ge => ">=".to_string(),
            Self::Assign => "=".to_string(),
            Self::AugAssign(op) => format!("{}=", op.symbol()),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Comma => ",".to_string(),
            Self::Dot => ".".to_string(),
            Self::Semicolon => ";".to_string(),
        }
    }
}

/// A token with its 1-based starting column
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub column: usize,
}

const RESERVED: &[&str] = &[
    "as", "assert", "async", "await", "break", "class", "continue", "def", "elif", "else",
    "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "raise", "return", "try", "while", "with", "yield",
];

fn keyword(word: &str) -> Option<Token> {
    let token = match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "True" => Token::True,
        "False" => Token::False,
        "None" => Token::NoneKw,
        "pass" => Token::Pass,
        "del" => Token::Del,
        _ if RESERVED.contains(&word) => Token::Reserved(word.to_string()),
        _ => return None,
    };
    Some(token)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn column(&self) -> usize {
        self.pos + 1
    }

    fn number(&mut self, column: usize) -> Result<Token, SyntaxError> {
        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits = self.take_digits(|c| c.is_digit(radix));
                return i64::from_str_radix(&digits, radix)
                    .map(Token::Int)
                    .map_err(|_| SyntaxError::new("invalid integer literal", column));
            }
        }

        let mut text = self.take_digits(|c| c.is_ascii_digit());
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            text.push('.');
            text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = self.peek_at(1);
            let has_sign = matches!(sign, Some('+') | Some('-'));
            let first_digit = if has_sign { self.peek_at(2) } else { sign };
            if first_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1;
                text.push('e');
                if has_sign {
                    text.extend(self.bump());
                }
                text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
            }
        }

        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return Err(SyntaxError::new("invalid decimal literal", column));
        }

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| SyntaxError::new("invalid float literal", column))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| SyntaxError::new("integer literal too large", column))
        }
    }

    /// Digits with `_` separators removed
    fn take_digits(&mut self, is_digit: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if is_digit(c) {
                out.push(c);
            } else if c != '_' || !self.peek_at(1).is_some_and(&is_digit) {
                break;
            }
            self.pos += 1;
        }
        out
    }

    fn string(&mut self, quote: char, column: usize) -> Result<Token, SyntaxError> {
        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| SyntaxError::new("unterminated string literal", column))?;
            if c == quote {
                return Ok(Token::Str(out));
            }
            if c == '\n' {
                return Err(SyntaxError::new("unterminated string literal", column));
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = self
                .bump()
                .ok_or_else(|| SyntaxError::new("unterminated string literal", column))?;
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' | '\'' | '"' => out.push(escaped),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn operator(&mut self, c: char, column: usize) -> Result<Token, SyntaxError> {
        let token = match c {
            '+' if self.eat('=') => Token::AugAssign(BinOp::Add),
            '+' => Token::Plus,
            '-' if self.eat('=') => Token::AugAssign(BinOp::Sub),
            '-' => Token::Minus,
            '*' if self.eat('*') => {
                if self.eat('=') {
                    Token::AugAssign(BinOp::Pow)
                } else {
                    Token::DoubleStar
                }
            }
            '*' if self.eat('=') => Token::AugAssign(BinOp::Mul),
            '*' => Token::Star,
            '/' if self.eat('/') => {
                if self.eat('=') {
                    Token::AugAssign(BinOp::FloorDiv)
                } else {
                    Token::DoubleSlash
                }
            }
            '/' if self.eat('=') => Token::AugAssign(BinOp::Div),
            '/' => Token::Slash,
            '%' if self.eat('=') => Token::AugAssign(BinOp::Mod),
            '%' => Token::Percent,
            '=' if self.eat('=') => Token::EqEq,
            '=' => Token::Assign,
            '!' if self.eat('=') => Token::NotEq,
            '<' if self.eat('=') => Token::Le,
            '<' => Token::Lt,
            '>' if self.eat('=') => Token::Ge,
            '>' => Token::Gt,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '.' => Token::Dot,
            ';' | '\n' => Token::Semicolon,
            other => {
                return Err(SyntaxError::new(
                    format!("invalid character '{}' (U+{:04X})", other, other as u32),
                    column,
                ))
            }
        };
        Ok(token)
    }
}

/// Splits source text into tokens
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();

    while let Some(c) = lexer.peek() {
        let column = lexer.column();

        if c == ' ' || c == '\t' || c == '\r' {
            lexer.pos += 1;
            continue;
        }
        if c == '#' {
            while lexer.peek().is_some_and(|c| c != '\n') {
                lexer.pos += 1;
            }
            continue;
        }

        let token = if c.is_ascii_digit()
            || (c == '.' && lexer.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            lexer.number(column)?
        } else if c == '"' || c == '\'' {
            lexer.pos += 1;
            lexer.string(c, column)?
        } else if c.is_alphabetic() || c == '_' {
            let mut word = String::new();
            while let Some(c) = lexer.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
                word.push(c);
                lexer.pos += 1;
            }
            keyword(&word).unwrap_or(Token::Name(word))
        } else {
            lexer.pos += 1;
            lexer.operator(c, column)?
        };

        tokens.push(Spanned { token, column });
    }

    Ok(tokens)
}

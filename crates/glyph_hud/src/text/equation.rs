//! Number equations
//!
//! Small arithmetic language over one variable `t`, applied to every number
//! before it is formatted. Supports `+ - * / % ^`, unary minus, parentheses
//! and the functions `abs`, `round`, `floor`, `ceil`, `sqrt`, `min`, `max`.

use crate::error::{HudError, HudResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Abs,
    Round,
    Floor,
    Ceil,
    Sqrt,
    Min,
    Max,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Self::Abs,
            "round" => Self::Round,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "sqrt" => Self::Sqrt,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        })
    }

    const fn arity(self) -> usize {
        match self {
            Self::Min | Self::Max => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Variable,
    Negate(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

impl Expr {
    fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Variable => t,
            Self::Negate(inner) => -inner.evaluate(t),
            Self::Binary(op, a, b) => {
                let (a, b) = (a.evaluate(t), b.evaluate(t));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Self::Call(func, args) => {
                let first = args.first().map_or(f64::NAN, |a| a.evaluate(t));
                match func {
                    Function::Abs => first.abs(),
                    Function::Round => first.round(),
                    Function::Floor => first.floor(),
                    Function::Ceil => first.ceil(),
                    Function::Sqrt => first.sqrt(),
                    Function::Min => args.get(1).map_or(f64::NAN, |b| first.min(b.evaluate(t))),
                    Function::Max => args.get(1).map_or(f64::NAN, |b| first.max(b.evaluate(t))),
                }
            }
        }
    }
}

/// A parsed equation in `t`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    source: String,
    root: Expr,
}

impl Equation {
    /// The identity equation `t`
    pub fn identity() -> Self {
        Self {
            source: "t".to_string(),
            root: Expr::Variable,
        }
    }

    /// Parse an expression
    pub fn parse(source: &str) -> HudResult<Self> {
        let mut parser = Parser {
            source,
            chars: source.char_indices().peekable(),
        };
        let root = parser.expression()?;
        parser.skip_whitespace();
        if let Some((at, c)) = parser.chars.next() {
            return Err(parser.error(format!("unexpected '{c}' at {at}")));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this is `t` itself
    pub fn is_identity(&self) -> bool {
        self.root == Expr::Variable
    }

    /// Value at `t`, `None` when the result is not finite
    pub fn evaluate(&self, t: f64) -> Option<f64> {
        Some(self.root.evaluate(t)).filter(|v| v.is_finite())
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn error(&self, reason: String) -> HudError {
        HudError::Equation {
            expression: self.source.to_string(),
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().map(|&(_, c)| c)
    }

    fn expect(&mut self, expected: char) -> HudResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.chars.next();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end"))),
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> HudResult<Expr> {
        let mut left = self.term()?;
        while let Some(op) = self.peek().and_then(|c| match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            _ => None,
        }) {
            self.chars.next();
            let right = self.term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> HudResult<Expr> {
        let mut left = self.unary()?;
        while let Some(op) = self.peek().and_then(|c| match c {
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '%' => Some(BinaryOp::Rem),
            _ => None,
        }) {
            self.chars.next();
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // unary := '-' unary | power
    fn unary(&mut self) -> HudResult<Expr> {
        if self.peek() == Some('-') {
            self.chars.next();
            return Ok(Expr::Negate(Box::new(self.unary()?)));
        }
        self.power()
    }

    // power := primary ('^' unary)?
    fn power(&mut self) -> HudResult<Expr> {
        let base = self.primary()?;
        if self.peek() == Some('^') {
            self.chars.next();
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> HudResult<Expr> {
        match self.peek() {
            Some('(') => {
                self.chars.next();
                let inner = self.expression()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.identifier(),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
            None => Err(self.error("unexpected end".to_string())),
        }
    }

    fn number(&mut self) -> HudResult<Expr> {
        let mut text = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit() || *c == '.') {
            text.push(c);
        }
        text.parse()
            .map(Expr::Number)
            .map_err(|_| self.error(format!("invalid number '{text}'")))
    }

    fn identifier(&mut self) -> HudResult<Expr> {
        let mut name = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_alphanumeric()) {
            name.push(c);
        }
        if name == "t" {
            return Ok(Expr::Variable);
        }
        let func = Function::from_name(&name)
            .ok_or_else(|| self.error(format!("unknown identifier '{name}'")))?;
        self.expect('(')?;
        let mut args = vec![self.expression()?];
        while self.peek() == Some(',') {
            self.chars.next();
            args.push(self.expression()?);
        }
        self.expect(')')?;
        if args.len() != func.arity() {
            return Err(self.error(format!(
                "'{name}' takes {} argument(s), got {}",
                func.arity(),
                args.len()
            )));
        }
        Ok(Expr::Call(func, args))
    }
}

//! Polynomial normalization for symbolic answer comparison.
//!
//! Expressions are parsed into a canonical polynomial form (a map from
//! monomials to coefficients), so `2x+2`, `2(x+1)` and `2*x + 1 + 1` all
//! normalize to the same value. Supported syntax:
//!
//! - numbers (`3`, `0.5`), identifiers (`x`, `theta`, `x1`)
//! - `+ - * /` and `^` or `**` for powers, parentheses
//! - implicit multiplication: `2x`, `3(x+1)`, `(x+1)(x-1)`, `x(x+1)`
//!
//! Division is only supported by nonzero constants and exponents must be
//! small non-negative integers; anything else is a [`SymbolicError`], which the
//! grader treats as "not comparable symbolically".
//!
//! Submitted answers are untrusted, so parsing is bounded: nesting depth,
//! the number of terms in any intermediate polynomial, and the degree of any
//! monomial are all capped.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::SymbolicError;

/// Coefficients below this magnitude are treated as zero.
const ZERO_EPSILON: f64 = 1e-9;

/// Largest exponent accepted in `a ^ n`.
const MAX_EXPONENT: u32 = 32;

/// Most terms any intermediate polynomial may hold.
const MAX_TERMS: usize = 512;

/// Highest total degree of a single monomial.
const MAX_DEGREE: u32 = 256;

/// Deepest nesting of parentheses, signs and exponents.
const MAX_DEPTH: usize = 128;

/// A product of variables raised to powers, e.g. `x^2 y`.
type Monomial = BTreeMap<String, u32>;

/// A polynomial in canonical form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, f64>,
}

impl Polynomial {
    pub fn constant(value: f64) -> Self {
        let mut p = Self::default();
        p.add_term(Monomial::new(), value);
        p
    }

    pub fn variable(name: &str) -> Self {
        let mut mono = Monomial::new();
        mono.insert(name.to_string(), 1);
        let mut p = Self::default();
        p.add_term(mono, 1.0);
        p
    }

    fn add_term(&mut self, mono: Monomial, coeff: f64) {
        let entry = self.terms.entry(mono.clone()).or_insert(0.0);
        *entry += coeff;
        if entry.abs() < ZERO_EPSILON {
            self.terms.remove(&mono);
        }
    }

    /// Whether every coefficient is (numerically) zero.
    pub fn is_zero(&self) -> bool {
        self.terms.values().all(|c| c.abs() < ZERO_EPSILON)
    }

    /// The value of a constant polynomial, or `None` if it has variables.
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self.terms.get(&Monomial::new()).copied(),
            _ => None,
        }
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (mono, coeff) in &other.terms {
            out.add_term(mono.clone(), *coeff);
        }
        out
    }

    pub fn neg(&self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }

    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    /// Number of nonzero terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multiply, failing once the product grows past the term or degree caps.
    pub fn mul(&self, other: &Polynomial) -> Result<Polynomial, SymbolicError> {
        if self.terms.len().saturating_mul(other.terms.len()) > MAX_TERMS * MAX_TERMS {
            return Err(SymbolicError::TooComplex);
        }
        let mut out = Polynomial::default();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let mut mono = m1.clone();
                for (var, pow) in m2 {
                    *mono.entry(var.clone()).or_insert(0) += pow;
                }
                if mono.values().sum::<u32>() > MAX_DEGREE {
                    return Err(SymbolicError::TooComplex);
                }
                out.add_term(mono, c1 * c2);
                if out.terms.len() > MAX_TERMS {
                    return Err(SymbolicError::TooComplex);
                }
            }
        }
        Ok(out)
    }

    pub fn pow(&self, exponent: u32) -> Result<Polynomial, SymbolicError> {
        let mut out = Polynomial::constant(1.0);
        for _ in 0..exponent {
            out = out.mul(self)?;
        }
        Ok(out)
    }

    fn scale(&self, factor: f64) -> Polynomial {
        let mut out = Polynomial::default();
        for (mono, coeff) in &self.terms {
            out.add_term(mono.clone(), coeff * factor);
        }
        out
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for (mono, coeff) in &self.terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "{coeff}")?;
            for (var, pow) in mono {
                if *pow == 1 {
                    write!(f, "*{var}")?;
                } else {
                    write!(f, "*{var}^{pow}")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, SymbolicError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => {
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| SymbolicError::UnexpectedToken(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            other => return Err(SymbolicError::UnexpectedChar { ch: other, pos: i }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|p| self.tokens.get(p))
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expression(&mut self) -> Result<Polynomial, SymbolicError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc = acc.add(&self.term()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc = acc.sub(&self.term()?);
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Polynomial, SymbolicError> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc = acc.mul(&self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    acc = match divisor.as_constant() {
                        Some(c) if c.abs() >= ZERO_EPSILON => acc.scale(1.0 / c),
                        _ => return Err(SymbolicError::UnsupportedDivision(divisor.to_string())),
                    };
                }
                Some(next) if self.implicit_product(next) => {
                    acc = acc.mul(&self.power()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// Juxtaposition is multiplication after a number, identifier or closing
    /// parenthesis, except for two adjacent identifiers or numbers.
    fn implicit_product(&self, next: &Token) -> bool {
        match (self.previous(), next) {
            (Some(Token::Number(_)), Token::Ident(_) | Token::LParen) => true,
            (Some(Token::Ident(_)), Token::LParen) => true,
            (Some(Token::RParen), Token::Ident(_) | Token::LParen | Token::Number(_)) => true,
            _ => false,
        }
    }

    /// Every nested subexpression passes through here, so this is where
    /// depth is counted.
    fn unary(&mut self) -> Result<Polynomial, SymbolicError> {
        if self.depth >= MAX_DEPTH {
            return Err(SymbolicError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = self.signed_power();
        self.depth -= 1;
        result
    }

    fn signed_power(&mut self) -> Result<Polynomial, SymbolicError> {
        let mut negate = false;
        while let Some(sign @ (Token::Minus | Token::Plus)) = self.peek() {
            if *sign == Token::Minus {
                negate = !negate;
            }
            self.pos += 1;
        }
        let value = self.power()?;
        Ok(if negate { value.neg() } else { value })
    }

    fn power(&mut self) -> Result<Polynomial, SymbolicError> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.unary()?;
        match exponent.as_constant() {
            Some(e) if e >= 0.0 && e.fract() == 0.0 && e <= MAX_EXPONENT as f64 => {
                base.pow(e as u32)
            }
            _ => Err(SymbolicError::UnsupportedExponent(exponent.to_string())),
        }
    }

    fn atom(&mut self) -> Result<Polynomial, SymbolicError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Polynomial::constant(n)),
            Some(Token::Ident(name)) => Ok(Polynomial::variable(&name)),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(SymbolicError::Unbalanced),
                }
            }
            Some(Token::RParen) => Err(SymbolicError::Unbalanced),
            Some(other) => Err(SymbolicError::UnexpectedToken(other.to_string())),
            None => Err(SymbolicError::UnexpectedEnd),
        }
    }
}

/// Parse an expression into canonical polynomial form.
pub fn parse(input: &str) -> Result<Polynomial, SymbolicError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(SymbolicError::UnexpectedEnd);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let poly = parser.expression()?;
    match parser.next() {
        None => Ok(poly),
        Some(Token::RParen) => Err(SymbolicError::Unbalanced),
        Some(tok) => Err(SymbolicError::UnexpectedToken(tok.to_string())),
    }
}

/// Whether `expected - submitted` simplifies to zero.
pub fn equivalent(expected: &str, submitted: &str) -> Result<bool, SymbolicError> {
    let lhs = parse(expected)?;
    let rhs = parse(submitted)?;
    Ok(lhs.sub(&rhs).is_zero())
}

/// Heuristic for whether expected text is an algebraic expression rather
/// than prose: it must contain a digit or an arithmetic operator.
pub fn looks_symbolic(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')'))
}

// src/expression.rs

//! Arithmetic expressions over named columns.
//!
//! Used by `Table::recalc` and `Table::append_expression`. An expression is
//! parsed once into an AST and then evaluated column-wise with `ndarray`.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/' | '%') unary)*
//! unary    := ('-' | '+') unary | power
//! power    := primary (('**' | '^') unary)?
//! primary  := number | '(' expr ')' | name '(' args ')' | "data" '[' string ']' | name
//! ```
//!
//! Names resolve to numeric columns; `pi` and `e` are constants unless a column
//! of that name exists.
//!
//! Nesting (parentheses, unary signs, operator chains) is limited to
//! `MAX_EXPRESSION_DEPTH` levels.

use ndarray::{Array1, ArrayView1, Zip};

use crate::constants::{DATA_VARIABLE, MAX_EXPRESSION_DEPTH};
use crate::error::ExpressionError;

type EvalResult<T> = std::result::Result<T, ExpressionError>;

/// Source of column values for evaluation.
pub trait Variables {
    fn rows(&self) -> usize;
    fn lookup(&self, name: &str) -> EvalResult<ArrayView1<'_, f64>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Abs,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Atan2,
    Pow,
    Min,
    Max,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sqrt" => Self::Sqrt,
            "abs" | "fabs" => Self::Abs,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "atan2" | "arctan2" => Self::Atan2,
            "pow" => Self::Pow,
            "min" | "minimum" => Self::Min,
            "max" | "maximum" => Self::Max,
            _ => return None,
        };
        Some(f)
    }

    fn arity(self) -> usize {
        match self {
            Self::Atan2 | Self::Pow | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }

    fn unary(self) -> Option<fn(f64) -> f64> {
        let f: fn(f64) -> f64 = match self {
            Self::Sqrt => f64::sqrt,
            Self::Abs => f64::abs,
            Self::Exp => f64::exp,
            Self::Log => f64::ln,
            Self::Log10 => f64::log10,
            Self::Sin => f64::sin,
            Self::Cos => f64::cos,
            Self::Tan => f64::tan,
            Self::Asin => f64::asin,
            Self::Acos => f64::acos,
            Self::Atan => f64::atan,
            Self::Sinh => f64::sinh,
            Self::Cosh => f64::cosh,
            Self::Tanh => f64::tanh,
            Self::Floor => f64::floor,
            Self::Ceil => f64::ceil,
            Self::Atan2 | Self::Pow | Self::Min | Self::Max => return None,
        };
        Some(f)
    }

    fn binary(self) -> Option<fn(f64, f64) -> f64> {
        let f: fn(f64, f64) -> f64 = match self {
            Self::Atan2 => f64::atan2,
            Self::Pow => f64::powf,
            Self::Min => f64::min,
            Self::Max => f64::max,
            _ => return None,
        };
        Some(f)
    }
}

/// Parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn parse(source: &str) -> EvalResult<Expr> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0, depth: 0 };
        let expr = parser.parse_expr()?;
        match parser.current() {
            Token::Eof => Ok(expr),
            other => Err(parser.error(format!("unexpected {:?}", other))),
        }
    }

    /// Evaluates the expression for every row.
    pub fn evaluate<V: Variables + ?Sized>(&self, vars: &V) -> EvalResult<Vec<f64>> {
        Ok(self.eval(vars)?.to_vec())
    }

    fn eval<V: Variables + ?Sized>(&self, vars: &V) -> EvalResult<Array1<f64>> {
        let rows = vars.rows();
        match self {
            Expr::Number(x) => Ok(Array1::from_elem(rows, *x)),
            Expr::Variable(name) => match vars.lookup(name) {
                Ok(view) => Ok(view.to_owned()),
                Err(ExpressionError::UnknownColumn(_)) if name == "pi" => {
                    Ok(Array1::from_elem(rows, std::f64::consts::PI))
                }
                Err(ExpressionError::UnknownColumn(_)) if name == "e" => {
                    Ok(Array1::from_elem(rows, std::f64::consts::E))
                }
                Err(e) => Err(e),
            },
            Expr::Neg(inner) => Ok(-inner.eval(vars)?),
            Expr::Binary { op, left, right } => {
                let l = left.eval(vars)?;
                let r = right.eval(vars)?;
                Ok(match op {
                    BinaryOp::Add => &l + &r,
                    BinaryOp::Sub => &l - &r,
                    BinaryOp::Mul => &l * &r,
                    BinaryOp::Div => &l / &r,
                    BinaryOp::Rem => &l % &r,
                    BinaryOp::Pow => Zip::from(&l).and(&r).map_collect(|&x, &y| x.powf(y)),
                })
            }
            Expr::Call { func, args } => {
                if args.len() != func.arity() {
                    return Err(ExpressionError::WrongArity {
                        name: format!("{:?}", func).to_lowercase(),
                        expected: func.arity(),
                        actual: args.len(),
                    });
                }
                match (func.unary(), func.binary()) {
                    (Some(f), _) => Ok(args[0].eval(vars)?.mapv(f)),
                    (None, Some(f)) => {
                        let a = args[0].eval(vars)?;
                        let b = args[1].eval(vars)?;
                        Ok(Zip::from(&a).and(&b).map_collect(|&x, &y| f(x, y)))
                    }
                    (None, None) => Err(ExpressionError::UnknownFunction(format!("{:?}", func))),
                }
            }
        }
    }
}

// ── lexer ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eof,
}

fn tokenize(source: &str) -> EvalResult<Vec<(Token, usize)>> {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '^' => Some(Token::Pow),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push((token, start));
            i += 1;
            continue;
        }
        if c == '*' {
            if i + 1 < len && chars[i + 1] == '*' {
                tokens.push((Token::Pow, start));
                i += 2;
            } else {
                tokens.push((Token::Star, start));
                i += 1;
            }
            continue;
        }

        // quoted column name for data['...']
        if c == '\'' || c == '"' {
            i += 1;
            let body = i;
            while i < len && chars[i] != c {
                i += 1;
            }
            if i >= len {
                return Err(ExpressionError::Syntax {
                    pos: start,
                    message: "unterminated string".to_string(),
                });
            }
            tokens.push((Token::Str(chars[body..i].iter().collect()), start));
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && i + 1 < len && chars[i + 1].is_ascii_digit()) {
            while i < len && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            if i < len && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < len && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < len && chars[j].is_ascii_digit() {
                    i = j;
                    while i < len && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text.parse::<f64>().map_err(|_| ExpressionError::Syntax {
                pos: start,
                message: format!("invalid number '{}'", text),
            })?;
            tokens.push((Token::Number(value), start));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push((Token::Ident(chars[start..i].iter().collect()), start));
            continue;
        }

        return Err(ExpressionError::Syntax {
            pos: start,
            message: format!("unexpected character '{}'", c),
        });
    }

    tokens.push((Token::Eof, len));
    Ok(tokens)
}

// ── parser ─────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: String) -> ExpressionError {
        ExpressionError::Syntax { pos: self.tokens[self.pos].1, message }
    }

    // Every level of nesting and every link of an operator chain deepens the tree.
    fn descend(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(self.error("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> EvalResult<()> {
        if *self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, self.current())))
        }
    }

    fn parse_expr(&mut self) -> EvalResult<Expr> {
        let depth = self.depth;
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => {
                    self.depth = depth;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let right = self.parse_term()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
    }

    fn parse_term(&mut self) -> EvalResult<Expr> {
        let depth = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => {
                    self.depth = depth;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let right = self.parse_unary()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        self.descend()?;
        let expr = match self.current() {
            Token::Minus => {
                self.advance();
                self.parse_unary().map(|inner| Expr::Neg(Box::new(inner)))
            }
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        };
        self.depth -= 1;
        expr
    }

    fn parse_power(&mut self) -> EvalResult<Expr> {
        let base = self.parse_primary()?;
        if *self.current() == Token::Pow {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> EvalResult<Expr> {
        match self.advance() {
            Token::Number(x) => Ok(Expr::Number(x)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => match self.current() {
                Token::LParen => {
                    self.advance();
                    self.parse_call(name)
                }
                Token::LBracket if name == DATA_VARIABLE => {
                    self.advance();
                    let column = match self.advance() {
                        Token::Str(s) => s,
                        other => {
                            return Err(self.error(format!("expected column name, found {:?}", other)))
                        }
                    };
                    self.expect(Token::RBracket)?;
                    Ok(Expr::Variable(column))
                }
                _ => Ok(Expr::Variable(name)),
            },
            Token::Eof => Err(self.error("unexpected end of expression".to_string())),
            other => Err(self.error(format!("unexpected {:?}", other))),
        }
    }

    fn parse_call(&mut self, name: String) -> EvalResult<Expr> {
        let func = Function::from_name(&name).ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
        let mut args = Vec::new();
        if *self.current() != Token::RParen {
            loop {
                args.push(self.parse_expr()?);
                if *self.current() == Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        if args.len() != func.arity() {
            return Err(ExpressionError::WrongArity {
                name,
                expected: func.arity(),
                actual: args.len(),
            });
        }
        Ok(Expr::Call { func, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapVars {
        rows: usize,
        columns: HashMap<String, Vec<f64>>,
    }

    impl Variables for MapVars {
        fn rows(&self) -> usize {
            self.rows
        }

        fn lookup(&self, name: &str) -> EvalResult<ArrayView1<'_, f64>> {
            self.columns
                .get(name)
                .map(|v| ArrayView1::from(v.as_slice()))
                .ok_or_else(|| ExpressionError::UnknownColumn(name.to_string()))
        }
    }

    fn vars() -> MapVars {
        let mut columns = HashMap::new();
        columns.insert("a".to_string(), vec![1.0, 2.0, 3.0]);
        columns.insert("b c".to_string(), vec![4.0, 5.0, 6.0]);
        MapVars { rows: 3, columns }
    }

    fn eval(src: &str) -> EvalResult<Vec<f64>> {
        Expr::parse(src)?.evaluate(&vars())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), vec![7.0; 3]);
        assert_eq!(eval("(1 + 2) * 3").unwrap(), vec![9.0; 3]);
        assert_eq!(eval("-2 ** 2").unwrap(), vec![-4.0; 3]);
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), vec![512.0; 3]);
        assert_eq!(eval("7 % 4").unwrap(), vec![3.0; 3]);
    }

    #[test]
    fn test_columns_and_subscript() {
        assert_eq!(eval("a * 2").unwrap(), vec![2.0, 4.0, 6.0]);
        assert_eq!(eval("data['b c'] - a").unwrap(), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(eval("sqrt(a * a)").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(eval("max(a, 2)").unwrap(), vec![2.0, 2.0, 3.0]);
        let v = eval("cos(pi)").unwrap();
        assert!((v[0] + 1.0).abs() < 1e-12);
        assert_eq!(eval("1.5e1").unwrap(), vec![15.0; 3]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(eval("a +"), Err(ExpressionError::Syntax { .. })));
        assert!(matches!(eval("nope(a)"), Err(ExpressionError::UnknownFunction(_))));
        assert!(matches!(eval("atan2(a)"), Err(ExpressionError::WrongArity { expected: 2, actual: 1, .. })));
        assert!(matches!(eval("zz + 1"), Err(ExpressionError::UnknownColumn(ref n)) if n == "zz"));
        assert!(matches!(eval("a $ 1"), Err(ExpressionError::Syntax { pos: 2, .. })));
        assert!(matches!(eval("(a"), Err(ExpressionError::Syntax { .. })));
    }

    #[test]
    fn test_deep_nesting_is_syntax_error() {
        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        match Expr::parse(&deep) {
            Err(ExpressionError::Syntax { message, .. }) => {
                assert_eq!(message, "expression nested too deeply")
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
        let signs = format!("{}a", "-".repeat(200_000));
        assert!(matches!(Expr::parse(&signs), Err(ExpressionError::Syntax { .. })));
        let chain = format!("a{}", " + a".repeat(200_000));
        assert!(matches!(Expr::parse(&chain), Err(ExpressionError::Syntax { .. })));
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let nested = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&nested).unwrap(), vec![1.0, 2.0, 3.0]);
        let chain = format!("a{}", " + 1".repeat(50));
        assert_eq!(eval(&chain).unwrap(), vec![51.0, 52.0, 53.0]);
        // sibling groups do not add up
        let siblings = vec!["((a))"; 100].join(" * 1 + ");
        assert_eq!(eval(&siblings).unwrap()[0], 100.0);
    }
}

// src/expression.rs

//! src/ast.rs
//!
//! Syntax tree for the slice of Go the generator reads: the package clause
//! and the `import`, `const` and `type` declarations. Function and variable
//! declarations are skipped by the parser and never reach the tree.

/// One parsed `.go` file.
#[derive(Debug, PartialEq, Clone)]
pub struct SourceFile {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Declaration {
    Gen(GenDecl),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
}

/// A generic declaration: a keyword followed by one spec or a parenthesised
/// group of specs. For `const`, each spec is one declaration line.
#[derive(Debug, PartialEq, Clone)]
pub struct GenDecl {
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Ident {
    pub name: String,
    /// Byte offset in the source file.
    pub offset: usize,
}

/// `statusA, statusB status = iota, iota` style line.
#[derive(Debug, PartialEq, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub type_name: Option<String>,
    pub values: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    /// Set only for `type name ident`; aliases, composite and qualified
    /// types leave it empty.
    pub underlying: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LiteralKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Source text, quotes included for runes and strings.
    pub text: String,
}

impl Literal {
    pub fn int(text: &str) -> Self {
        Literal {
            kind: LiteralKind::Int,
            text: text.to_string(),
        }
    }

    pub fn rune(text: &str) -> Self {
        Literal {
            kind: LiteralKind::Char,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
    Complement,
    Deref,
    AddressOf,
    Receive,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitAnd,
    BitOr,
    BitXor,
    AndNot,
    ShiftLeft,
    ShiftRight,
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::AndNot => "&^",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterOrEqual => ">=",
        }
    }

    /// Go binary precedence, 5 binds tightest.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterOrEqual => 3,
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::BitOr
            | BinaryOperator::BitXor => 4,
            BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Remainder
            | BinaryOperator::ShiftLeft
            | BinaryOperator::ShiftRight
            | BinaryOperator::BitAnd
            | BinaryOperator::AndNot => 5,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl BinaryExpression {
    pub fn new(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(String),
    Literal(Literal),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary(BinaryExpression),
    Paren(Box<Expression>),
    Selector {
        base: Box<Expression>,
        field: String,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Expression::Identifier(name) => format!("identifier `{}`", name),
            Expression::Literal(lit) => format!("literal {}", lit.text),
            Expression::Unary { .. } => "unary expression".to_string(),
            Expression::Binary(bin) => format!("nested `{}` expression", bin.operator.symbol()),
            Expression::Paren(_) => "parenthesized expression".to_string(),
            Expression::Selector { field, .. } => format!("selector `.{}`", field),
            Expression::Call { .. } => "function call".to_string(),
            Expression::Index { .. } => "index expression".to_string(),
        }
    }
}

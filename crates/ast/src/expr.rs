use crate::{
    common::{Identifier, QualifiedName},
    data_type::{DataType, IntervalField},
    stmt::{Query, SortItem, WindowSpecification},
    token::{Keyword, TokenKind},
};

#[derive(Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Dereference {
        base: Box<Expression>,
        field: Identifier,
    },
    Literal(Literal),
    /// `DATE '2023-01-01'`, `TIMESTAMP '...'`, `DECIMAL '1.5'`
    TypedLiteral {
        type_name: Identifier,
        value: String,
    },
    Interval(Interval),
    /// `?`, numbered from 0 in order of appearance
    Parameter(usize),
    Operation(Operation),
    QuantifiedComparison {
        op: ComparisonOperator,
        quantifier: ComparisonQuantifier,
        lhs: Box<Expression>,
        subquery: Box<Query>,
    },
    Between {
        expr: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
        negated: bool,
    },
    InList {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },
    InSubquery {
        expr: Box<Expression>,
        subquery: Box<Query>,
        negated: bool,
    },
    Like {
        expr: Box<Expression>,
        pattern: Box<Expression>,
        escape: Option<Box<Expression>>,
        negated: bool,
    },
    IsNull {
        expr: Box<Expression>,
        negated: bool,
    },
    IsDistinctFrom {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        negated: bool,
    },
    AtTimeZone {
        expr: Box<Expression>,
        zone: Box<Expression>,
    },
    FunctionCall(FunctionCall),
    Cast {
        expr: Box<Expression>,
        data_type: DataType,
        /// `TRY_CAST`
        safe: bool,
    },
    Case {
        operand: Option<Box<Expression>>,
        whens: Vec<WhenClause>,
        default: Option<Box<Expression>>,
    },
    Exists(Box<Query>),
    Subquery(Box<Query>),
    Row(Vec<Expression>),
    Array(Vec<Expression>),
    Subscript {
        base: Box<Expression>,
        index: Box<Expression>,
    },
    Lambda {
        params: Vec<Identifier>,
        body: Box<Expression>,
    },
    Extract {
        field: Identifier,
        expr: Box<Expression>,
    },
    Position {
        needle: Box<Expression>,
        haystack: Box<Expression>,
    },
    Substring {
        expr: Box<Expression>,
        from: Box<Expression>,
        length: Option<Box<Expression>>,
    },
    Trim {
        spec: Option<TrimSpec>,
        chars: Option<Box<Expression>>,
        source: Box<Expression>,
    },
    CurrentTime {
        kind: CurrentTime,
        precision: Option<String>,
    },
    Grouping(Vec<QualifiedName>),
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<Operation> for Expression {
    fn from(op: Operation) -> Self {
        Self::Operation(op)
    }
}

#[derive(Debug, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Exact numbers that do not fit an `i64`, kept as written.
    Decimal(String),
    Double(f64),
    String(String),
    /// Hex digits of `X'...'`
    Binary(String),
}

#[derive(Debug, PartialEq)]
pub struct Interval {
    pub negative: bool,
    pub value: String,
    pub from: IntervalField,
    pub to: Option<IntervalField>,
}

#[derive(Debug, PartialEq)]
pub struct FunctionCall {
    pub name: QualifiedName,
    pub distinct: bool,
    /// `count(*)`
    pub wildcard: bool,
    pub args: Vec<Expression>,
    pub order_by: Vec<SortItem>,
    /// `WITHIN GROUP (ORDER BY ...)`
    pub within_group: Vec<SortItem>,
    pub filter: Option<Box<Expression>>,
    pub null_treatment: Option<NullTreatment>,
    pub over: Option<Window>,
}

impl FunctionCall {
    pub fn new(name: QualifiedName, args: Vec<Expression>) -> Self {
        Self {
            name,
            distinct: false,
            wildcard: false,
            args,
            order_by: vec![],
            within_group: vec![],
            filter: None,
            null_treatment: None,
            over: None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Window {
    Named(Identifier),
    Specification(WindowSpecification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullTreatment {
    Ignore,
    Respect,
}

#[derive(Debug, PartialEq)]
pub struct WhenClause {
    pub condition: Expression,
    pub result: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonQuantifier {
    All,
    Any,
    Some,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSpec {
    Both,
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentTime {
    Date,
    Time,
    Timestamp,
    LocalTime,
    LocalTimestamp,
    User,
    Catalog,
    Schema,
    Path,
}

pub trait Operator: Sized {
    /// Looks up the corresponding operator for a token, if one exists
    fn from(token: &TokenKind) -> Option<Self>;

    /// Returns the operator's associativity
    fn assoc(&self) -> u8;

    /// Returns the operator's precedence
    fn prec(&self) -> u8;
}

macro_rules! op_variants {
    ($((unary, $($uop:ident)*))* $((binary, $($bop:ident)*))*) => {
        #[derive(Debug, PartialEq)]
        pub enum Operation {
            $($($uop(Box<Expression>),)*)*
            $($($bop(Box<Expression>, Box<Expression>),)*)*
        }

        impl Operation {
            /// Operands from left to right.
            pub fn operands(&self) -> Vec<&Expression> {
                match self {
                    $($(Self::$uop(expr) => vec![expr.as_ref()],)*)*
                    $($(Self::$bop(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],)*)*
                }
            }
        }
    }
}

macro_rules! build_expr {
    (unary { $($op:ident)* }) => {
        pub fn build_expr(&self, expr: Expression) -> Expression {
            let expr = Box::new(expr);

            match self {
                $( Self::$op => Operation::$op(expr), )*
            }
            .into()
        }
    };
    (binary { $($op:ident)* }) => {
        pub fn build_expr(&self, lhs: Expression, rhs: Expression) -> Expression {
            let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));

            match self {
                $( Self::$op => Operation::$op(lhs, rhs), )*
            }
            .into()
        }
    };
}

macro_rules! operations {
    {
        $(
            $ty:ident $id:ident {
                $( ($op:ident, ($token:pat), $prec:literal, $assoc:literal), )*
            }
        )*
    }
    => {
        op_variants!($(($ty, $($op)*))*);

        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum $id {
                $( $op, )*
            }

            impl $id {
                build_expr!($ty {$($op)*});
            }

            impl Operator for $id {
                fn from(token: &TokenKind) -> Option<Self> {
                    Some(match token {
                        $( $token => Self::$op, )*
                        _ => return None,
                    })
                }

                fn assoc(&self) -> u8 {
                    match self {
                        $( Self::$op => $assoc, )*
                    }
                }

                fn prec(&self) -> u8 {
                    match self {
                        $( Self::$op => $prec, )*
                    }
                }
            }
        )*
    }
}

// Boolean operators bind looser than predicates; arithmetic binds tighter.
// Comparisons are not associative, so their precedence is never consulted.
operations!(
    unary PrefixOperator {
        (Positive, (TokenKind::Plus), 4, 0),
        (Negative, (TokenKind::Minus), 4, 0),
    }

    unary LogicalNot {
        (Not, (TokenKind::Keyword(Keyword::NOT)), 3, 0),
    }

    binary LogicalOperator {
        (Or, (TokenKind::Keyword(Keyword::OR)), 1, 1),
        (And, (TokenKind::Keyword(Keyword::AND)), 2, 1),
    }

    binary ComparisonOperator {
        (Equal, (TokenKind::Equal), 0, 0),
        (NotEqual, (TokenKind::NotEqual), 0, 0),
        (GreaterThan, (TokenKind::GreaterThan), 0, 0),
        (GreaterThanOrEqual, (TokenKind::GreaterThanOrEqual), 0, 0),
        (LessThan, (TokenKind::LessThan), 0, 0),
        (LessThanOrEqual, (TokenKind::LessThanOrEqual), 0, 0),
    }

    binary ArithmeticOperator {
        (Concat, (TokenKind::Concat), 1, 1),
        (Add, (TokenKind::Plus), 2, 1),
        (Subtract, (TokenKind::Minus), 2, 1),
        (Multiply, (TokenKind::Asterisk), 3, 1),
        (Divide, (TokenKind::Slash), 3, 1),
        (Modulo, (TokenKind::Percent), 3, 1),
    }
);

use {ast::Span, snafu::Snafu};

pub type Result<T> = std::result::Result<T, Error>;

/// The token a parse error was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offending {
    /// Position in the token buffer; later tokens have larger indices.
    pub index: usize,
    /// Token text quoted as in messages, `'<EOF>'` at the end of input.
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("mismatched input {} expecting {expected}", offending.text))]
    MismatchedInput { expected: String, offending: Offending },

    #[snafu(display("no viable alternative at input {}", offending.text))]
    NoViableAlternative { offending: Offending },

    #[snafu(display(
        "identifiers must not start with a digit; surround the identifier with double quotes"
    ))]
    DigitIdentifier { offending: Offending },

    #[snafu(display("input nests deeper than {limit} levels"))]
    TooDeep { limit: usize, offending: Offending },
}

impl Error {
    pub fn offending(&self) -> &Offending {
        match self {
            Self::MismatchedInput { offending, .. }
            | Self::NoViableAlternative { offending }
            | Self::DigitIdentifier { offending }
            | Self::TooDeep { offending, .. } => offending,
        }
    }

    /// Of two failed alternatives, keeps the one that got further.
    pub(super) fn furthest(self, other: Self) -> Self {
        match other.offending().index > self.offending().index {
            true => other,
            false => self,
        }
    }
}

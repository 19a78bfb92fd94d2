use {ast::Span, snafu::Snafu};

/// Where a lexical error starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("token recognition error at: '{text}'"))]
    UnrecognizedInput { text: String, position: Position },

    #[snafu(display("token recognition error at: '{text}': unterminated string literal"))]
    UnterminatedString { text: String, position: Position },

    #[snafu(display("token recognition error at: '{text}': unterminated quoted identifier"))]
    UnterminatedIdentifier { text: String, position: Position },

    #[snafu(display("token recognition error at: '{text}': unterminated comment"))]
    UnterminatedComment { text: String, position: Position },
}

impl Error {
    pub fn position(&self) -> &Position {
        match self {
            Self::UnrecognizedInput { position, .. }
            | Self::UnterminatedString { position, .. }
            | Self::UnterminatedIdentifier { position, .. }
            | Self::UnterminatedComment { position, .. } => position,
        }
    }
}

use std::fmt::{Display, Formatter, Result};

/// Byte range into the source text, both ends inclusive.
pub type Span = std::ops::RangeInclusive<usize>;

#[derive(Debug, Clone)]
pub struct Spanned<T>(pub T, pub Span);

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

/// An identifier with quotes removed and escapes resolved.
pub type Identifier = Spanned<String>;

pub fn identifier_from_str(s: &str) -> Identifier {
    Spanned(s.to_string(), 0..=s.len().saturating_sub(1))
}

/// A dotted name such as `catalog.schema.table`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName(pub Vec<Identifier>);

impl QualifiedName {
    pub fn parts(&self) -> &[Identifier] {
        &self.0
    }

    /// The last part of the name.
    pub fn base(&self) -> Option<&Identifier> {
        self.0.last()
    }

    pub fn span(&self) -> Option<Span> {
        let first = self.0.first()?;
        let last = self.0.last()?;
        Some(*first.1.start()..=*last.1.end())
    }
}

impl From<Vec<&str>> for QualifiedName {
    fn from(parts: Vec<&str>) -> Self {
        Self(parts.into_iter().map(identifier_from_str).collect())
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            part.fmt(f)?;
        }
        Ok(())
    }
}

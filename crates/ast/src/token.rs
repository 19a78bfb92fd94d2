use {crate::common::Span, std::fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Default,
    /// Whitespace, comments and error tokens. The parser never sees these.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),

    Identifier,
    QuotedIdentifier,
    BackquotedIdentifier,
    DigitIdentifier,

    String,
    UnicodeString,
    BinaryLiteral,
    Integer,
    Decimal,
    Double,

    Comma,
    Period,
    Semicolon,
    Colon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Question,

    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Concat,
    Arrow,
    DoubleArrow,

    Whitespace,
    LineComment,
    BlockComment,

    Error,
    Eof,
}

impl TokenKind {
    pub fn channel(&self) -> Channel {
        match self {
            Self::Whitespace | Self::LineComment | Self::BlockComment | Self::Error => {
                Channel::Hidden
            }
            _ => Channel::Default,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        *self == Self::Keyword(keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Keyword(keyword) => return write!(f, "'{}'", keyword.as_str()),
            Self::Identifier
            | Self::QuotedIdentifier
            | Self::BackquotedIdentifier
            | Self::DigitIdentifier => "identifier",
            Self::String | Self::UnicodeString => "string",
            Self::BinaryLiteral => "binary literal",
            Self::Integer => "integer",
            Self::Decimal | Self::Double => "number",
            Self::Comma => "','",
            Self::Period => "'.'",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Question => "'?'",
            Self::Equal => "'='",
            Self::NotEqual => "'<>'",
            Self::GreaterThan => "'>'",
            Self::GreaterThanOrEqual => "'>='",
            Self::LessThan => "'<'",
            Self::LessThanOrEqual => "'<='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Asterisk => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Concat => "'||'",
            Self::Arrow => "'->'",
            Self::DoubleArrow => "'=>'",
            Self::Whitespace => "whitespace",
            Self::LineComment | Self::BlockComment => "comment",
            Self::Error => "invalid token",
            Self::Eof => "<EOF>",
        };

        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
    /// 1-based line of the first character.
    pub line: usize,
    /// 0-based character offset of the first character within its line.
    pub column: usize,
    pub channel: Channel,
}

impl<'a> Token<'a> {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Quoted token text as it appears in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "'<EOF>'".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

macro_rules! keywords {
    (
        reserved { $( $reserved:ident, )* }
        non_reserved { $( $non_reserved:ident, )* }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(non_camel_case_types)]
        pub enum Keyword {
            $($reserved,)*
            $($non_reserved,)*
        }

        impl Keyword {
            /// Reserved keywords can only be used as identifiers when quoted.
            pub fn is_reserved(&self) -> bool {
                matches!(*self, $(Self::$reserved)|*)
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$reserved => stringify!($reserved),)*
                    $(Self::$non_reserved => stringify!($non_reserved),)*
                }
            }
        }

        #[derive(Debug)]
        pub struct NotKeywordError {}

        impl fmt::Display for NotKeywordError {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "not a keyword")
            }
        }

        impl std::error::Error for NotKeywordError {}

        impl std::str::FromStr for Keyword {
            type Err = NotKeywordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $(stringify!($reserved) => Ok(Self::$reserved),)*
                    $(stringify!($non_reserved) => Ok(Self::$non_reserved),)*
                    _ => Err(NotKeywordError {}),
                }
            }
        }
    };
}

keywords! {
    reserved {
        ALTER,
        AND,
        AS,
        BETWEEN,
        BY,
        CASE,
        CAST,
        CONSTRAINT,
        CREATE,
        CROSS,
        CUBE,
        CURRENT_CATALOG,
        CURRENT_DATE,
        CURRENT_PATH,
        CURRENT_ROLE,
        CURRENT_SCHEMA,
        CURRENT_TIME,
        CURRENT_TIMESTAMP,
        CURRENT_USER,
        DEALLOCATE,
        DELETE,
        DESCRIBE,
        DISTINCT,
        DROP,
        ELSE,
        END,
        ESCAPE,
        EXCEPT,
        EXECUTE,
        EXISTS,
        EXTRACT,
        FALSE,
        FOR,
        FROM,
        FULL,
        GROUP,
        GROUPING,
        HAVING,
        IN,
        INNER,
        INSERT,
        INTERSECT,
        INTO,
        IS,
        JOIN,
        LEFT,
        LIKE,
        LOCALTIME,
        LOCALTIMESTAMP,
        NATURAL,
        NORMALIZE,
        NOT,
        NULL,
        ON,
        OR,
        ORDER,
        OUTER,
        PREPARE,
        RECURSIVE,
        RIGHT,
        ROLLUP,
        SELECT,
        TABLE,
        THEN,
        TRIM,
        TRUE,
        UESCAPE,
        UNION,
        UNNEST,
        USING,
        VALUES,
        WHEN,
        WHERE,
        WITH,
    }
    non_reserved {
        ADD,
        AFTER,
        ALL,
        ANALYZE,
        ANY,
        ARRAY,
        ASC,
        AT,
        BERNOULLI,
        BIN_PACK,
        BOTH,
        BUCKETS,
        CASCADE,
        CATALOGS,
        CHANGE,
        CLUSTERED,
        COLLECTION,
        COLUMN,
        COLUMNS,
        COMMENT,
        CURRENT,
        DATA,
        DATABASE,
        DATABASES,
        DAY,
        DBPROPERTIES,
        DEFAULT,
        DEFINED,
        DEFINER,
        DELIMITED,
        DESC,
        DOUBLE,
        ESCAPED,
        EXPLAIN,
        EXTENDED,
        EXTERNAL,
        FETCH,
        FIELDS,
        FILTER,
        FIRST,
        FOLLOWING,
        FORMAT,
        FORMATTED,
        FUNCTIONS,
        GROUPS,
        HOUR,
        IF,
        IGNORE,
        INPUT,
        INPUTFORMAT,
        INTERVAL,
        INVOKER,
        ITEMS,
        KEYS,
        LAST,
        LATERAL,
        LEADING,
        LIMIT,
        LINES,
        LOCATION,
        MAP,
        MATCHED,
        MERGE,
        MINUTE,
        MONTH,
        MSCK,
        NEXT,
        NO,
        NULLS,
        OF,
        OFFSET,
        ONLY,
        OPTIMIZE,
        ORDINALITY,
        OUTPUT,
        OUTPUTFORMAT,
        OVER,
        PARTITION,
        PARTITIONED,
        PARTITIONS,
        POSITION,
        PRECEDING,
        PRECISION,
        PROPERTIES,
        RANGE,
        RENAME,
        REPAIR,
        REPLACE,
        RESPECT,
        RESTRICT,
        REWRITE,
        ROW,
        ROWS,
        SCHEMA,
        SCHEMAS,
        SECOND,
        SECURITY,
        SERDE,
        SERDEPROPERTIES,
        SESSION,
        SET,
        SETS,
        SHOW,
        SOME,
        SORTED,
        STATS,
        STORED,
        STRUCT,
        SUBSTRING,
        SYSTEM,
        TABLES,
        TABLESAMPLE,
        TBLPROPERTIES,
        TERMINATED,
        TIES,
        TIME,
        TIMESTAMP,
        TO,
        TRAILING,
        TRY_CAST,
        TYPE,
        UNBOUNDED,
        UNLOAD,
        UPDATE,
        USE,
        VACUUM,
        VERBOSE,
        VERSION,
        VIEW,
        VIEWS,
        WINDOW,
        WITHIN,
        WITHOUT,
        YEAR,
        ZONE,
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::str::FromStr};

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Keyword::from_str("select").unwrap(), Keyword::SELECT);
        assert_eq!(Keyword::from_str("PartitionS").unwrap(), Keyword::PARTITIONS);
        assert!(Keyword::from_str("orders").is_err());
    }

    #[test]
    fn reserved_split() {
        assert!(Keyword::FROM.is_reserved());
        assert!(Keyword::TABLE.is_reserved());
        assert!(!Keyword::PARTITIONS.is_reserved());
        assert!(!Keyword::LOCATION.is_reserved());
        assert!(!Keyword::FORMAT.is_reserved());
    }

    #[test]
    fn hidden_channel() {
        assert_eq!(TokenKind::Whitespace.channel(), Channel::Hidden);
        assert_eq!(TokenKind::Error.channel(), Channel::Hidden);
        assert_eq!(TokenKind::Keyword(Keyword::SHOW).channel(), Channel::Default);
    }
}

use {
    super::error::{self, Result},
    parser::{ErrorStrategy, MarkerCollector, ParseOptions, Parser, SyntaxErrorMarker},
    serde::Serialize,
    snafu::ResultExt,
    std::{
        fmt, fs,
        io::{self, Read, Write},
        path::Path,
        str::FromStr,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// `file:line:column: message`, one marker per line
    #[default]
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Accept `;` separated statements instead of exactly one.
    pub script: bool,
    pub bail: bool,
}

impl CheckOptions {
    fn parse_options(&self) -> ParseOptions {
        let strategy = match self.bail {
            true => ErrorStrategy::Bail,
            false => ErrorStrategy::Recover,
        };

        ParseOptions { strategy }
    }
}

/// Outcome of checking one input.
#[derive(Debug, Serialize)]
pub struct Report {
    pub source: String,
    pub statements: usize,
    pub markers: Vec<SyntaxErrorMarker>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Checks `sql`, naming it `source` in the report.
pub fn check_sql(source: &str, sql: &str, options: &CheckOptions) -> Report {
    let mut parser = Parser::new(sql)
        .with_listener(MarkerCollector::new())
        .with_options(options.parse_options());

    let statements = match options.script {
        true => parser.statements().len(),
        false => parser.single_statement().map_or(0, |_| 1),
    };
    let markers = parser.into_listener().into_markers();

    tracing::info!(source, statements, markers = markers.len(), "checked");

    Report {
        source: source.to_string(),
        statements,
        markers,
    }
}

pub fn check_file(path: &Path, options: &CheckOptions) -> Result<Report> {
    let sql = fs::read_to_string(path).context(error::ReadInputSnafu { path })?;

    Ok(check_sql(&path.display().to_string(), &sql, options))
}

pub fn check_stdin(options: &CheckOptions) -> Result<Report> {
    let mut sql = String::new();
    io::stdin()
        .read_to_string(&mut sql)
        .context(error::ReadStdinSnafu)?;

    Ok(check_sql("<stdin>", &sql, options))
}

pub fn write_reports<W: Write>(out: &mut W, reports: &[Report], format: Format) -> Result<()> {
    match format {
        Format::Text => {
            for report in reports {
                for marker in &report.markers {
                    writeln!(
                        out,
                        "{}:{}:{}: {}",
                        report.source, marker.line, marker.column, marker.message
                    )
                    .context(error::WriteReportSnafu)?;
                }
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, reports).context(error::SerializeSnafu)?;
            writeln!(out).context(error::WriteReportSnafu)?;
        }
    }

    Ok(())
}

use {
    snafu::prelude::*,
    std::{io, path::PathBuf},
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("Failed to read {}, source: {}", path.display(), source))]
    ReadInput { path: PathBuf, source: io::Error },

    #[snafu(display("Failed to read standard input, source: {}", source))]
    ReadStdin { source: io::Error },

    #[snafu(display("Failed to serialize the report, source: {}", source))]
    Serialize { source: serde_json::Error },

    #[snafu(display("Failed to write the report, source: {}", source))]
    WriteReport { source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

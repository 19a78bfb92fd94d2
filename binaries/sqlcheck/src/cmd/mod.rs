mod check;
mod error;

pub use self::{
    check::{check_file, check_sql, check_stdin, write_reports, CheckOptions, Format, Report},
    error::{Error, Result},
};

#[cfg(test)]
mod tests {
    mod check;
}

//! Tokens and syntax tree of the Athena SQL dialect.
mod common;
pub mod data_type;
pub mod expr;
mod stmt;
pub mod token;

pub use crate::{common::*, stmt::*};

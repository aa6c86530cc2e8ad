//! Wanda, a concatenative language evaluated by string rewriting.
//!
//! A program is a sequence of whitespace separated atoms. The cursor atom `$`
//! splits it in two: atoms to its left form the stack, atoms to its right are
//! the program still to run. Evaluation repeatedly rewrites the leftmost
//! position that matches a builtin or a user defined rule until nothing
//! matches any more.

mod reader;
mod rewrite;

use thiserror::Error;

pub use reader::parse;
pub use rewrite::evaluate;

pub const CURSOR: &str = "$";
pub const DEFINE: &str = ":";
pub const ARROW: &str = "->";
pub const END: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WandaError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

/// Settings read from the environment mapping handed to `evaluate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log every rewrite at debug level.
    pub trace: bool,
}

pub fn format(redex: &[String]) -> String {
    redex.join(" ")
}

/// Reads an atom as an integer literal: an optional `-` followed by digits.
pub(crate) fn integer(atom: &str) -> Option<i64> {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    atom.parse().ok()
}

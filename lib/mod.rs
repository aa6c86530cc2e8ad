//! Runs Wanda programs through an embedded script machine.
//!
//! The host hands source text to a [`Bridge`], which writes it into the
//! machine's global namespace and runs a short driver script that calls the
//! machine's `parse`, `evaluate` and `format` builtins in turn.
//!
//! ```rust,no_run
//! use wanda_playground::{catalog, Bridge};
//!
//! let bridge = Bridge::new().unwrap();
//! let fact = catalog::find("fact.wanda").unwrap();
//! assert_eq!(bridge.execute(fact.source).unwrap(), "120 $");
//! ```

pub mod ast;
pub mod bridge;
pub mod catalog;
pub mod lexer;
pub mod machine;
pub mod parser;
pub mod token;
pub mod wanda;

mod engine;
#[cfg(feature = "wasm")]
mod web;

pub use bridge::{Bridge, BridgeError};
pub use catalog::{ExampleEntry, Selector};
pub use engine::Engine;
pub use lexer::Lexer;
pub use parser::Parser;
pub use wanda::RunOptions;

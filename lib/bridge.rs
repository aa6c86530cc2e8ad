use std::cell::{RefCell, RefMut};

use log::debug;
use thiserror::Error;

use crate::{
    ast::Program,
    machine::{self, Object},
    wanda::{RunOptions, WandaError},
    Engine,
};

/// Name of the global the source text is written to before each run.
pub const SHARED_SLOT: &str = "currentProgramText";

pub const DRIVER_SCRIPT: &str = r#"
let program = parse(currentProgramText);
let result = evaluate(program, {});
format(result);
"#;

pub const TRACE_DRIVER_SCRIPT: &str = r#"
let program = parse(currentProgramText);
let result = evaluate(program, {"trace": true});
format(result);
"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
    #[error("embedded runtime error: {0}")]
    EmbeddedRuntime(String),
    #[error("a run is already in progress")]
    Busy,
}

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<WandaError>() {
            Ok(WandaError::Parse(message)) => BridgeError::Parse(message),
            Ok(WandaError::Evaluation(message)) => BridgeError::Evaluation(message),
            Err(other) => BridgeError::EmbeddedRuntime(format!("{other:#}")),
        }
    }
}

/// Runs Wanda programs inside an embedded machine.
///
/// The machine has a single slot for the program text, so only one run may be
/// in flight at a time. The bridge is not reentrant: a call made while another
/// is still running (for example from inside a builtin) fails with
/// [`BridgeError::Busy`] instead of overwriting the slot.
///
/// A run cannot be interrupted. A program that never stops rewriting blocks
/// the caller forever.
pub struct Bridge {
    engine: RefCell<Box<dyn Engine>>,
    driver: Program,
}

impl Bridge {
    pub fn new() -> Result<Self, BridgeError> {
        Self::with_options(RunOptions::default())
    }

    pub fn with_options(options: RunOptions) -> Result<Self, BridgeError> {
        let driver = if options.trace {
            TRACE_DRIVER_SCRIPT
        } else {
            DRIVER_SCRIPT
        };
        Self::with_engine(machine::new_engine(), driver)
    }

    /// Builds a bridge over any engine. The driver is loaded once, up front; it
    /// must leave a string as its final value.
    pub fn with_engine(mut engine: Box<dyn Engine>, driver: &str) -> Result<Self, BridgeError> {
        let driver = engine
            .load(driver)
            .map_err(|err| BridgeError::EmbeddedRuntime(format!("loading driver: {err:#}")))?;
        Ok(Self {
            engine: RefCell::new(engine),
            driver,
        })
    }

    pub fn execute(&self, source: &str) -> Result<String, BridgeError> {
        let engine = self
            .engine
            .try_borrow_mut()
            .map_err(|_| BridgeError::Busy)?;
        let mut slot = SlotGuard::fill(engine, source);

        debug!("running program ({} bytes)", source.len());
        let value = slot.engine.exec(&self.driver)?;

        match value {
            Object::String(text) => Ok(text),
            other => Err(BridgeError::EmbeddedRuntime(format!(
                "driver returned {} instead of string",
                other.type_name()
            ))),
        }
    }
}

/// Holds the machine for one run; the shared slot is emptied when it drops,
/// whether the run succeeded, failed or panicked.
struct SlotGuard<'a> {
    engine: RefMut<'a, Box<dyn Engine>>,
}

impl<'a> SlotGuard<'a> {
    fn fill(mut engine: RefMut<'a, Box<dyn Engine>>, source: &str) -> Self {
        engine.set_global(SHARED_SLOT, Object::String(source.to_string()));
        Self { engine }
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.engine.remove_global(SHARED_SLOT);
    }
}

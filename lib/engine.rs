use anyhow::Result;

use crate::{
    ast::Program,
    machine::{Builtin, Object},
};

/// The embedded script machine as seen from the host.
///
/// Values only cross this boundary by copy: `set_global` takes ownership of the
/// object it is given and `global` hands back a clone, so neither side keeps a
/// live reference into the other's memory.
pub trait Engine {
    fn set_global(&mut self, name: &str, value: Object);

    fn global(&self, name: &str) -> Option<Object>;

    fn remove_global(&mut self, name: &str) -> Option<Object>;

    fn register(&mut self, name: &str, builtin: Builtin) {
        self.set_global(name, Object::BuiltInFunction(builtin));
    }

    /// Lexes and parses a script without running it.
    fn load(&mut self, script: &str) -> Result<Program>;

    /// Runs a loaded script to completion and returns its final value.
    fn exec(&mut self, program: &Program) -> Result<Object>;

    fn run(&mut self, script: &str) -> Result<Object> {
        let program = self.load(script)?;
        self.exec(&program)
    }
}

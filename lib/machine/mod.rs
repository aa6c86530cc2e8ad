mod builtins;
mod environment;
mod evaluator;
mod object;

use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
pub use builtins::Builtins;
pub use environment::Environment;
pub use evaluator::Evaluator;
pub use object::{Builtin, Object};

use crate::{ast::Program, Engine, Lexer, Parser};

/// A machine with the Wanda pipeline registered as `parse`, `evaluate` and
/// `format`.
pub fn new_engine() -> Box<dyn Engine> {
    let mut machine = Machine::new();
    for (name, builtin) in Builtins::get() {
        machine.register(name, builtin);
    }
    Box::new(machine)
}

/// A bare machine: an empty global namespace and no builtins.
pub struct Machine {
    globals: Rc<RefCell<Environment>>,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            globals: Environment::new(),
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Machine {
    fn set_global(&mut self, name: &str, value: Object) {
        self.globals.borrow_mut().set(name, value);
    }

    fn global(&self, name: &str) -> Option<Object> {
        self.globals.borrow().get(name)
    }

    fn remove_global(&mut self, name: &str) -> Option<Object> {
        self.globals.borrow_mut().remove(name)
    }

    fn load(&mut self, script: &str) -> Result<Program> {
        let lexer = Lexer::new(script);
        let mut parser = Parser::new(lexer);
        parser.parse_program()
    }

    fn exec(&mut self, program: &Program) -> Result<Object> {
        // `let` inside a script binds in a scope that dies with the run.
        let scope = Environment::new_enclosed_environment(self.globals.clone());
        let mut evaluator = Evaluator::new(scope);
        evaluator.eval(program)
    }
}

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::{anyhow, bail, Result};

use super::{environment::Environment, object::Object};
use crate::ast::{Expression, Program, Statement};

pub struct Evaluator {
    env: Rc<RefCell<Environment>>,
}

impl Evaluator {
    pub fn new(env: Rc<RefCell<Environment>>) -> Self {
        Self { env }
    }

    pub fn eval(&mut self, program: &Program) -> Result<Object> {
        let mut result = Object::Null;
        for statement in &program.statements {
            result = match self.eval_statement(statement)? {
                Object::ReturnValue(value) => return Ok(*value),
                object => object,
            };
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<Object> {
        let object = match statement {
            Statement::Expression(expression) => self.eval_expression(expression)?,
            Statement::Return(expression) => {
                let value = self.eval_expression(expression)?;
                Object::ReturnValue(Box::new(value))
            }
            Statement::Let { name, value } => {
                let value = self.eval_expression(value)?;
                self.env.borrow_mut().set(name, value);
                Object::Null
            }
        };
        Ok(object)
    }

    fn eval_expression(&mut self, expression: &Expression) -> Result<Object> {
        let object = match expression {
            Expression::IntegerLiteral(value) => Object::Integer(*value),
            Expression::StringLiteral(value) => Object::String(value.clone()),
            Expression::BooleanLiteral(value) => Object::Boolean(*value),
            Expression::NullLiteral => Object::Null,
            Expression::Identifier(name) => self.eval_identifier_expression(name)?,
            Expression::Call {
                function,
                arguments,
            } => self.eval_call_function(function, arguments)?,
            Expression::ArrayLiteral(elements) => self.eval_array_literal(elements)?,
            Expression::HashLiteral(pairs) => self.eval_hash_literal(pairs)?,
        };
        Ok(object)
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)]) -> Result<Object> {
        let mut hash = HashMap::new();
        for (key, value) in pairs {
            let key = self.eval_expression(key)?;
            if !key.hashable() {
                bail!("unusable as hash key: {}", key)
            }
            let value = self.eval_expression(value)?;
            hash.insert(key, value);
        }
        Ok(Object::Hash(hash))
    }

    fn eval_array_literal(&mut self, elements: &[Expression]) -> Result<Object> {
        let elements = elements
            .iter()
            .map(|e| self.eval_expression(e))
            .collect::<Result<Vec<Object>>>()?;
        Ok(Object::Array(elements))
    }

    fn eval_call_function(
        &mut self,
        function: &Expression,
        arguments: &[Expression],
    ) -> Result<Object> {
        let callee = self.eval_expression(function)?;
        let args = arguments
            .iter()
            .map(|arg| self.eval_expression(arg))
            .collect::<Result<Vec<Object>>>()?;
        match callee {
            // Errors raised by builtins are passed through untouched so hosts can
            // downcast them.
            Object::BuiltInFunction(builtin) => builtin(args),
            _ => bail!("{} is not a function", callee),
        }
    }

    fn eval_identifier_expression(&mut self, name: &str) -> Result<Object> {
        match self.env.borrow().get(name) {
            Some(value) => Ok(value),
            None => Err(anyhow!("identifier not found: {}", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    #[test]
    fn test_literals() {
        let tests = vec![
            ("5", Object::Integer(5)),
            ("-10", Object::Integer(-10)),
            ("true", Object::Boolean(true)),
            ("false", Object::Boolean(false)),
            ("null", Object::Null),
            (r#""hello""#, Object::String("hello".to_string())),
            ("", Object::Null),
        ];

        for (input, expected) in tests {
            let evaluated = test_eval(input).unwrap();
            assert_eq!(evaluated, expected);
        }
    }

    #[test]
    fn test_return_statements() {
        let tests = vec![
            ("return 10;", Object::Integer(10)),
            ("return 10; 9;", Object::Integer(10)),
            ("9; return \"x\"; 9;", Object::String("x".to_string())),
            ("9; 8;", Object::Integer(8)),
        ];

        for (input, expected) in tests {
            let evaluated = test_eval(input).unwrap();
            assert_eq!(evaluated, expected);
        }
    }

    #[test]
    fn test_let_statements() {
        let tests = vec![
            ("let a = 5; a;", Object::Integer(5)),
            ("let a = 5; let b = a; b;", Object::Integer(5)),
            ("let a = \"x\"; let a = 1; a", Object::Integer(1)),
            ("let a = 5;", Object::Null),
        ];

        for (input, expected) in tests {
            let evaluated = test_eval(input).unwrap();
            assert_eq!(evaluated, expected);
        }
    }

    #[test]
    fn test_array_and_hash_literals() {
        assert_eq!(
            test_eval(r#"[1, "2", true, [null]]"#).unwrap(),
            Object::Array(vec![
                Object::Integer(1),
                Object::String("2".to_string()),
                Object::Boolean(true),
                Object::Array(vec![Object::Null]),
            ])
        );
        assert_eq!(
            test_eval(r#"{"one": 1, 2: "two", true: [], "one": 3}"#).unwrap(),
            Object::Hash(
                vec![
                    (Object::String("one".to_string()), Object::Integer(3)),
                    (Object::Integer(2), Object::String("two".to_string())),
                    (Object::Boolean(true), Object::Array(vec![])),
                ]
                .into_iter()
                .collect(),
            )
        );
    }

    #[test]
    fn test_builtin_calls() {
        let env = Environment::new();
        env.borrow_mut()
            .set("count", Object::BuiltInFunction(count_builtin));
        let tests = vec![
            ("count()", Object::Integer(0)),
            ("count(1, \"two\", [3])", Object::Integer(3)),
            ("let c = count; c(null)", Object::Integer(1)),
            ("(count)(count)", Object::Integer(1)),
        ];
        for (input, expected) in tests {
            let evaluated = test_eval_in(input, env.clone()).unwrap();
            assert_eq!(evaluated, expected);
        }
    }

    #[test]
    fn test_builtin_errors_pass_through() {
        let env = Environment::new();
        env.borrow_mut()
            .set("fail", Object::BuiltInFunction(failing_builtin));
        let err = test_eval_in("let x = fail(); x", env).unwrap_err();
        assert_eq!(err.to_string(), "refused");
        assert!(err.downcast_ref::<std::fmt::Error>().is_some());
    }

    #[test]
    fn test_error_handling() {
        let tests = vec![
            ("foobar", "identifier not found: foobar"),
            ("5(1)", "5 is not a function"),
            ("\"f\"()", "f is not a function"),
            ("{[1]: 2}", "unusable as hash key: [1]"),
            ("let a = 1; b(a)", "identifier not found: b"),
        ];

        for (input, expected) in tests {
            match test_eval(input) {
                Ok(_) => panic!("no error returned for {}", input),
                Err(error) => assert_eq!(error.to_string(), expected),
            }
        }
    }

    fn count_builtin(args: Vec<Object>) -> Result<Object> {
        Ok(Object::Integer(args.len() as i64))
    }

    fn failing_builtin(_args: Vec<Object>) -> Result<Object> {
        Err(anyhow::Error::new(std::fmt::Error).context("refused"))
    }

    fn test_eval(input: &str) -> Result<Object> {
        test_eval_in(input, Environment::new())
    }

    fn test_eval_in(input: &str, env: Rc<RefCell<Environment>>) -> Result<Object> {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program().unwrap();
        let mut evaluator = Evaluator::new(env);
        evaluator.eval(&program)
    }
}

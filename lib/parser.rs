use anyhow::{anyhow, bail, Result};

use crate::{
    ast::{Expression, Program, Statement},
    lexer::Lexer,
    token::Token,
};

pub struct Parser {
    lexer: Lexer,
    cur_token: Option<Token>,
    peek_token: Option<Token>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        Self {
            cur_token: lexer.next_token(),
            peek_token: lexer.next_token(),
            lexer,
        }
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements: Vec<Statement> = Vec::new();
        while self.cur_token().is_some() {
            let statement = self.parse_statement()?;
            statements.push(statement);
            self.next_token();
        }
        Ok(Program { statements })
    }

    fn cur_token(&self) -> Option<Token> {
        self.cur_token.clone()
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek_token.clone()
    }

    fn next_token(&mut self) -> &mut Self {
        self.cur_token = self.peek_token();
        self.peek_token = self.lexer.next_token();
        self
    }

    fn peek_is(&self, token: Token) -> bool {
        self.peek_token
            .as_ref()
            .is_some_and(|peek| peek.variant_eq(token))
    }

    fn expect_peek(&mut self, exp_token: Token) -> Result<()> {
        let peek_token = self
            .peek_token()
            .ok_or(anyhow!("expected next token to be {exp_token}, found end of input"))?;
        if peek_token.variant_eq(exp_token.clone()) {
            self.next_token();
            Ok(())
        } else {
            bail!("expected next token to be {exp_token}, found {peek_token}")
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(Token::Semicolon) {
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur_token().ok_or(anyhow!("no token found"))? {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement> {
        let name = match self
            .next_token()
            .cur_token()
            .ok_or(anyhow!("expected identifier, found end of input"))?
        {
            Token::Ident(value) => value,
            token => bail!("expected identifier, found {token}"),
        };

        self.expect_peek(Token::Assign)?;

        self.next_token();

        let value = self.parse_expression()?;

        self.skip_semicolon();

        Ok(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.next_token();

        let value = self.parse_expression()?;

        self.skip_semicolon();

        Ok(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression()?;

        self.skip_semicolon();

        Ok(Statement::Expression(expression))
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        let cur_token = self
            .cur_token()
            .ok_or(anyhow!("expected expression, found end of input"))?;

        let mut left_exp = match cur_token {
            Token::Ident(value) => Expression::Identifier(value),
            Token::Int(value) => self.parse_integer_literal(value)?,
            Token::String(value) => Expression::StringLiteral(value),
            Token::True => Expression::BooleanLiteral(true),
            Token::False => Expression::BooleanLiteral(false),
            Token::Null => Expression::NullLiteral,
            Token::Lparen => self.parse_grouped_expression()?,
            Token::Lbracket => self.parse_array_literal()?,
            Token::Lbrace => self.parse_hash_literal()?,
            Token::Illegal(value) => bail!("illegal token {value}"),
            token => bail!("no prefix parse function for {token}"),
        };

        while self.peek_is(Token::Lparen) {
            self.next_token();
            left_exp = self.parse_call_expression(left_exp)?;
        }

        Ok(left_exp)
    }

    fn parse_integer_literal(&mut self, literal: String) -> Result<Expression> {
        let value = literal
            .parse::<i64>()
            .map_err(|err| anyhow!("could not parse integer literal as i64: {err}"))?;
        Ok(Expression::IntegerLiteral(value))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();
        let exp = self.parse_expression()?;
        self.expect_peek(Token::Rparen)?;
        Ok(exp)
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let elements = self.parse_expression_list(Token::Rbracket)?;

        Ok(Expression::ArrayLiteral(elements))
    }

    fn parse_hash_literal(&mut self) -> Result<Expression> {
        let mut pairs: Vec<(Expression, Expression)> = Vec::new();

        while self.peek_token().is_some() && !self.peek_is(Token::Rbrace) {
            self.next_token();
            let key = self.parse_expression()?;
            self.expect_peek(Token::Colon)?;
            self.next_token();
            let value = self.parse_expression()?;
            pairs.push((key, value));
            if !self.peek_is(Token::Rbrace) {
                self.expect_peek(Token::Comma)?;
            }
        }

        self.expect_peek(Token::Rbrace)?;

        Ok(Expression::HashLiteral(pairs))
    }

    fn parse_expression_list(&mut self, end_token: Token) -> Result<Vec<Expression>> {
        let mut expressions: Vec<Expression> = Vec::new();

        if self.peek_is(end_token.clone()) {
            self.next_token();
            return Ok(expressions);
        }

        self.next_token();

        expressions.push(self.parse_expression()?);

        while self.peek_is(Token::Comma) {
            self.next_token();
            self.next_token();
            expressions.push(self.parse_expression()?);
        }

        self.expect_peek(end_token)?;

        Ok(expressions)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(Token::Rparen)?;
        Ok(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn let_statements() {
        let program = get_program("let program = parse(currentProgramText);");
        assert_eq!(program.statements.len(), 1);
        assert_eq!(
            program.statements[0],
            Statement::Let {
                name: "program".to_string(),
                value: Expression::Call {
                    function: Box::new(Expression::Identifier("parse".to_string())),
                    arguments: vec![Expression::Identifier("currentProgramText".to_string())],
                },
            }
        );
    }

    #[test]
    fn return_statements() {
        let program = get_program("return 5; return \"five\"");
        assert_eq!(
            program.statements,
            vec![
                Statement::Return(Expression::IntegerLiteral(5)),
                Statement::Return(Expression::StringLiteral("five".to_string())),
            ]
        );
    }

    #[test]
    fn literal_expressions() {
        let program = get_program("5; -7; true; false; null; \"hello world\";");
        let expected = vec![
            Expression::IntegerLiteral(5),
            Expression::IntegerLiteral(-7),
            Expression::BooleanLiteral(true),
            Expression::BooleanLiteral(false),
            Expression::NullLiteral,
            Expression::StringLiteral("hello world".to_string()),
        ];
        assert_eq!(
            program.statements,
            expected
                .into_iter()
                .map(Statement::Expression)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn array_literals() {
        let program = get_program("[1, \"two\", [], f(3)];");
        match &program.statements[0] {
            Statement::Expression(Expression::ArrayLiteral(values)) => {
                assert_eq!(values.len(), 4);
                assert_eq!(values[0], Expression::IntegerLiteral(1));
                assert_eq!(values[1], Expression::StringLiteral("two".to_string()));
                assert_eq!(values[2], Expression::ArrayLiteral(vec![]));
                assert_eq!(
                    values[3],
                    Expression::Call {
                        function: Box::new(Expression::Identifier("f".to_string())),
                        arguments: vec![Expression::IntegerLiteral(3)],
                    }
                );
            }
            other => panic!("expected array literal, found {other}"),
        }
    }

    #[test]
    fn hash_literals() {
        let program = get_program(r#"{}; {"trace": true, 1: null}"#);
        assert_eq!(
            program.statements,
            vec![
                Statement::Expression(Expression::HashLiteral(vec![])),
                Statement::Expression(Expression::HashLiteral(vec![
                    (
                        Expression::StringLiteral("trace".to_string()),
                        Expression::BooleanLiteral(true)
                    ),
                    (Expression::IntegerLiteral(1), Expression::NullLiteral),
                ])),
            ]
        );
    }

    #[test]
    fn call_expressions() {
        let program = get_program("evaluate(program, {})(1)();");
        let inner = Expression::Call {
            function: Box::new(Expression::Identifier("evaluate".to_string())),
            arguments: vec![
                Expression::Identifier("program".to_string()),
                Expression::HashLiteral(vec![]),
            ],
        };
        let middle = Expression::Call {
            function: Box::new(inner),
            arguments: vec![Expression::IntegerLiteral(1)],
        };
        let outer = Expression::Call {
            function: Box::new(middle),
            arguments: vec![],
        };
        assert_eq!(program.statements, vec![Statement::Expression(outer)]);
    }

    #[test]
    fn display_round_trips_driver() {
        let program = get_program("let r = evaluate(p, {\"trace\": true}); format(r)");
        assert_eq!(
            program.to_string(),
            "let r = evaluate(p, {\"trace\": true});\nformat(r);\n"
        );
    }

    #[test]
    fn parse_errors() {
        let cases = vec![
            ("let = 5;", "expected identifier, found ="),
            ("let x 5;", "expected next token to be =, found 5"),
            ("f(1, 2", "expected next token to be ), found end of input"),
            ("{\"a\" 1}", "expected next token to be :, found 1"),
            ("x + 1", "illegal token +"),
            ("let x = ;", "no prefix parse function for ;"),
        ];
        for (input, expected) in cases {
            let mut parser = Parser::new(Lexer::new(input));
            match parser.parse_program() {
                Ok(program) => panic!("no error returned for {input}: {program}"),
                Err(err) => assert_eq!(err.to_string(), expected, "input: {input}"),
            }
        }
    }

    fn get_program(input: &str) -> Program {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        parser.parse_program().unwrap()
    }
}

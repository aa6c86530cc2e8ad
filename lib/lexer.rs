use crate::token::Token;

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let char = chars.first().copied();
        Self {
            chars,
            position: 0,
            char,
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_trivia();

        let token = match self.char {
            Some(char) => match char {
                '=' => Some(Token::Assign),
                ';' => Some(Token::Semicolon),
                ',' => Some(Token::Comma),
                ':' => Some(Token::Colon),
                '(' => Some(Token::Lparen),
                ')' => Some(Token::Rparen),
                '{' => Some(Token::Lbrace),
                '}' => Some(Token::Rbrace),
                '[' => Some(Token::Lbracket),
                ']' => Some(Token::Rbracket),
                '"' => Some(self.read_string()),
                '-' if self.next_char().is_some_and(|next| next.is_ascii_digit()) => {
                    self.read_char();
                    let digits = self.read_until(|char| !char.is_ascii_digit());
                    Some(Token::Int(format!("-{digits}")))
                }
                _ if char.is_ascii_digit() => {
                    let literal = self.read_until(|char| !char.is_ascii_digit());
                    Some(Token::Int(literal))
                }
                _ if char.is_ascii_alphabetic() || char == '_' => {
                    let literal =
                        self.read_until(|char| !char.is_ascii_alphanumeric() && char != '_');
                    match literal.as_str() {
                        "let" => Some(Token::Let),
                        "return" => Some(Token::Return),
                        "true" => Some(Token::True),
                        "false" => Some(Token::False),
                        "null" => Some(Token::Null),
                        _ => Some(Token::Ident(literal)),
                    }
                }
                _ => Some(Token::Illegal(char.to_string())),
            },
            None => None,
        };

        self.read_char();

        token
    }

    fn read_char(&mut self) {
        self.position += 1;
        self.char = self.chars.get(self.position).copied();
    }

    fn next_char(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Skips whitespace and `#` comments running to the end of the line.
    fn skip_trivia(&mut self) {
        loop {
            match self.char {
                Some(char) if char.is_whitespace() => self.read_char(),
                Some('#') => {
                    while self.char.is_some_and(|char| char != '\n') {
                        self.read_char();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_until(&mut self, condition: impl Fn(char) -> bool) -> String {
        let mut literal = String::new();
        while let Some(char) = self.char {
            if condition(char) {
                self.position -= 1;
                break;
            }
            literal.push(char);
            self.read_char();
        }
        literal
    }

    // Leaves the cursor on the closing quote so `next_token` steps past it.
    fn read_string(&mut self) -> Token {
        let mut literal = String::new();
        loop {
            self.read_char();
            match self.char {
                None => return Token::Illegal(format!("\"{literal}")),
                Some('"') => return Token::String(literal),
                Some('\\') => {
                    self.read_char();
                    match self.char {
                        Some('n') => literal.push('\n'),
                        Some('t') => literal.push('\t'),
                        Some('"') => literal.push('"'),
                        Some('\\') => literal.push('\\'),
                        Some(other) => {
                            literal.push('\\');
                            literal.push(other);
                        }
                        None => return Token::Illegal(format!("\"{literal}\\")),
                    }
                }
                Some(char) => literal.push(char),
            }
        }
    }
}

use std::iter::Peekable;
use std::str::Chars;

use crate::token;
use crate::token::{Token, TokenKind, TokenSource};

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn read_while<F>(&mut self, first: Option<char>, mut predicate: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut res = String::new();
        res.extend(first);

        while let Some(c) = self.input.next_if(|&c| predicate(c)) {
            res.push(c);
        }

        res
    }

    fn read_string(&mut self) -> String {
        let res = self.read_while(None, |c| c != '"');

        // Consume the closing '"'
        self.read_char();

        res
    }

    fn skip_whitespace(&mut self) {
        while self.input.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn either(
        &mut self,
        second: char,
        double: (TokenKind, &str),
        single: (TokenKind, &str),
    ) -> Token {
        if self.input.next_if_eq(&second).is_some() {
            Token::new(double.0, double.1)
        } else {
            Token::new(single.0, single.1)
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.read_char() {
            Some(c) => c,
            None => return Token::eof(),
        };

        let kind = match c {
            '=' => return self.either('=', (TokenKind::Eq, "=="), (TokenKind::Assign, "=")),
            '!' => return self.either('=', (TokenKind::Ne, "!="), (TokenKind::Bang, "!")),
            '"' => return Token::new(TokenKind::String, self.read_string()),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::SemiColon,
            ':' => TokenKind::Colon,
            c if is_id_start(c) => {
                let ident = self.read_while(Some(c), is_id_continue);
                return Token::new(token::lookup_ident(&ident), ident);
            }
            c if c.is_ascii_digit() => {
                let number = self.read_while(Some(c), |c| c.is_ascii_digit());
                return Token::new(TokenKind::Int, number);
            }
            _ => TokenKind::Illegal,
        };

        Token::new(kind, c.to_string())
    }
}

impl<'a> TokenSource for Lexer<'a> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase() || c == '_'
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}

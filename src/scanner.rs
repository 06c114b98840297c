// ABOUTME: Scanner — turns Lox source text into a token stream ending in EOF

use crate::error::Reporter;
use crate::token::{Literal, Token, TokenType};

pub struct Scanner {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source, reporting errors through `reporter` and
    /// continuing scanning past them. Always ends with exactly one EOF
    /// token.
    pub fn scan_tokens(mut self, reporter: &mut Reporter) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(reporter);
        }

        self.tokens
            .push(Token::new(TokenType::Eof, String::new(), None, self.line));
        self.tokens
    }

    fn scan_token(&mut self, reporter: &mut Reporter) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                let t = if self.match_char('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(t);
            }
            '=' => {
                let t = if self.match_char('=') { TokenType::EqualEqual } else { TokenType::Equal };
                self.add_token(t);
            }
            '<' => {
                let t = if self.match_char('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(t);
            }
            '>' => {
                let t = if self.match_char('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(t);
            }
            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(reporter),
            c if c.is_ascii_digit() => self.number(),
            c if is_id_start(c) => self.identifier(),
            _ => reporter.error(self.line, "Unexpected character."),
        }
    }

    fn string(&mut self, reporter: &mut Reporter) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            reporter.error(self.line, "Unterminated string.");
            return;
        }

        // Consume the closing quote.
        self.advance();

        let value: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        self.add_token_with_literal(TokenType::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.chars[self.start..self.current].iter().collect();
        let value: f64 = text.parse().expect("number lexeme must parse as f64");
        self.add_token_with_literal(TokenType::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while is_id_continue(self.peek()) {
            self.advance();
        }

        let text: String = self.chars[self.start..self.current].iter().collect();
        let token_type = keyword(&text).unwrap_or(TokenType::Identifier);
        self.add_token(token_type);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, None);
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal: Option<Literal>) {
        let text: String = self.chars[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(token_type, text, literal, self.line));
    }
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}

fn keyword(text: &str) -> Option<TokenType> {
    Some(match text {
        "and" => TokenType::And,
        "class" => TokenType::Class,
        "else" => TokenType::Else,
        "false" => TokenType::False,
        "for" => TokenType::For,
        "fun" => TokenType::Fun,
        "if" => TokenType::If,
        "nil" => TokenType::Nil,
        "or" => TokenType::Or,
        "print" => TokenType::Print,
        "return" => TokenType::Return,
        "super" => TokenType::Super,
        "this" => TokenType::This,
        "true" => TokenType::True,
        "var" => TokenType::Var,
        "while" => TokenType::While,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let mut reporter = Reporter::new();
        let tokens = Scanner::new(source).scan_tokens(&mut reporter);
        assert!(!reporter.had_error, "unexpected scan error for {source:?}");
        tokens
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn ends_with_exactly_one_eof() {
        let tokens = scan("var a = 1;");
        assert_eq!(tokens.last().unwrap().token_type, TokenType::Eof);
        assert_eq!(tokens.iter().filter(|t| t.token_type == TokenType::Eof).count(), 1);
    }

    #[test]
    fn scans_single_and_double_char_operators() {
        let tokens = scan("!= == <= >= < > = !");
        use TokenType::*;
        assert_eq!(
            types(&tokens),
            vec![BangEqual, EqualEqual, LessEqual, GreaterEqual, Less, Greater, Equal, Bang, Eof]
        );
    }

    #[test]
    fn line_comment_consumes_to_newline_not_including_it() {
        let tokens = scan("1 // comment\n2");
        use TokenType::*;
        assert_eq!(types(&tokens), vec![Number, Number, Eof]);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn string_literal_value_excludes_quotes() {
        let tokens = scan(r#""hello""#);
        match &tokens[0].literal {
            Some(Literal::String(s)) => assert_eq!(s, "hello"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn multiline_string_increments_line_counter() {
        let tokens = scan("\"a\nb\"");
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn unterminated_string_reports_error_and_is_discarded() {
        let mut reporter = Reporter::new();
        let tokens = Scanner::new("\"unterminated").scan_tokens(&mut reporter);
        assert!(reporter.had_error);
        assert_eq!(types(&tokens), vec![TokenType::Eof]);
    }

    #[test]
    fn number_literal_without_trailing_digit_does_not_consume_dot() {
        let tokens = scan("123.");
        use TokenType::*;
        assert_eq!(types(&tokens), vec![Number, Dot, Eof]);
    }

    #[test]
    fn number_literal_parses_fractional_part() {
        let tokens = scan("3.14");
        match tokens[0].literal {
            Some(Literal::Number(n)) => assert!((n - 3.14).abs() < 1e-9),
            ref other => panic!("expected number literal, got {other:?}"),
        }
    }

    #[test]
    fn keywords_are_recognized_and_identifiers_are_not() {
        let tokens = scan("and class fluffy");
        use TokenType::*;
        assert_eq!(types(&tokens), vec![And, Class, Identifier, Eof]);
    }

    #[test]
    fn unexpected_character_reports_and_continues_scanning() {
        let mut reporter = Reporter::new();
        let tokens = Scanner::new("@1").scan_tokens(&mut reporter);
        assert!(reporter.had_error);
        assert_eq!(types(&tokens), vec![TokenType::Number, TokenType::Eof]);
    }

    #[test]
    fn right_paren_and_right_brace_are_not_confused() {
        let tokens = scan(")}");
        assert_eq!(types(&tokens), vec![TokenType::RightParen, TokenType::RightBrace, TokenType::Eof]);
    }
}

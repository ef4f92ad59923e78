use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    token::{Token, TokenKind},
    value::Literal,
};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::str::Chars;

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "break" => TokenKind::Break,
    "class" => TokenKind::Class,
    "continue" => TokenKind::Continue,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "nil" => TokenKind::Nil,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "super" => TokenKind::Super,
    "this" => TokenKind::This,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
};

type Lexed = (TokenKind, Option<Literal>);

/// Turns source text into tokens, one lexeme at a time.
///
/// As an iterator it yields `Err` for each character it can't classify and
/// carries on with the next one; `scan_tokens` moves those errors into a
/// `Diagnostics` sink and appends the trailing EOF token.
pub struct Scanner<'a> {
    src: PeekMoreIterator<Chars<'a>>,
    lexeme_buffer: String,
    line: usize,
}

impl <'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        while self.src.peek().is_some() {
            let line = self.line;
            let lexed = self.next_lexeme();
            let lexeme = std::mem::take(&mut self.lexeme_buffer);

            if let Some(lexed) = lexed {
                return Some(lexed.map(|(kind, literal)| Token {
                    kind,
                    lexeme,
                    literal,
                    line,
                }));
            }
        }
        None
    }
}

impl <'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().peekmore(),
            lexeme_buffer: String::new(),
            line: 1,
        }
    }

    /// Scans the whole input. Lexical errors are recorded in `diagnostics`
    /// and skipped; only a fatal error stops the scan early.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(scanned) = self.next() {
            match scanned {
                Ok(token) => tokens.push(token),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => diagnostics.record(e.line(), e.message()),
            }
        }
        tokens.push(Token::eof(self.line));
        Ok(tokens)
    }

    /// Consumes one lexeme. `None` means it produced no token (whitespace,
    /// a newline or a comment).
    fn next_lexeme(&mut self) -> Option<Result<Lexed>> {
        let next_char = self.src.next()?;
        self.lexeme_buffer.push(next_char);

        use TokenKind::*;
        let kind = match next_char {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '?' => Question,
            ':' => Colon,
            '*' => if self.does_next_match('*') { StarStar } else { Star },
            '!' => if self.does_next_match('=') { BangEqual } else { Bang },
            '=' => if self.does_next_match('=') { EqualEqual } else { Equal },
            '<' => if self.does_next_match('=') { LessEqual } else { Less },
            '>' => if self.does_next_match('=') { GreaterEqual } else { Greater },
            '/' => {
                if self.does_next_match('/') {
                    // The newline is left for the next call so it bumps `line`.
                    self.advance_until(|n| n == &'\n');
                    return None;
                }
                Slash
            },
            ' ' | '\r' | '\t' => return None,
            '\n' => {
                self.line += 1;
                return None;
            },
            '"' => return Some(self.extract_string()),
            c if c.is_ascii_digit() => return Some(self.extract_number()),
            c if can_start_identifier(&c) => return Some(Ok(self.extract_identifier())),
            c => return Some(Err(Error::lexical(self.line, format!("Unexpected character: {}", c)))),
        };
        Some(Ok((kind, None)))
    }

    fn does_next_match(&mut self, c: char) -> bool {
        if self.src.peek() != Some(&c) {
            return false;
        }
        self.advance();
        true
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.src.next()?;
        self.lexeme_buffer.push(next);
        Some(next)
    }

    fn extract_string(&mut self) -> Result<Lexed> {
        let mut newline_count = 0;
        self.advance_until_for_each(|n| n == &'"', |c| if c == '\n' { newline_count += 1 });
        self.line += newline_count;

        match self.advance() {
            None => Err(Error::lexical(self.line, "Unterminated string.")),
            Some(_closing_quote) => {
                let contents = &self.lexeme_buffer[1..self.lexeme_buffer.len() - 1];
                Ok((TokenKind::String, Some(Literal::from(contents))))
            },
        }
    }

    fn extract_number(&mut self) -> Result<Lexed> {
        self.advance_until(|n| !n.is_ascii_digit());

        // A '.' only belongs to the number when a digit follows it.
        let has_fraction = self.src.peek() == Some(&'.')
            && self.src.peek_nth(1).map_or(false, char::is_ascii_digit);
        if has_fraction {
            self.advance();
            self.advance_until(|n| !n.is_ascii_digit());
        }

        match self.lexeme_buffer.parse::<f64>() {
            Err(_) => Err(Error::invalid_number(self.line, &self.lexeme_buffer)),
            Ok(number) => Ok((TokenKind::Number, Some(Literal::Number(number)))),
        }
    }

    fn extract_identifier(&mut self) -> Lexed {
        self.advance_until(|n| !is_part_of_valid_identifier(n));

        match KEYWORDS.get(self.lexeme_buffer.as_str()) {
            Some(keyword) => (*keyword, None),
            None => (TokenKind::Identifier, None),
        }
    }

    fn advance_until(&mut self, should_stop: impl Fn(&char) -> bool) {
        self.advance_until_for_each(should_stop, |_| {})
    }

    fn advance_until_for_each(
        &mut self,
        should_stop: impl Fn(&char) -> bool,
        mut f: impl FnMut(char),
    ) {
        while self.src.peek().map_or(false, |n| !should_stop(n)) {
            if let Some(next) = self.advance() {
                f(next);
            }
        }
    }
}

fn can_start_identifier(c: &char) -> bool {
    c.is_ascii_alphabetic() || c == &'_'
}

fn is_part_of_valid_identifier(c: &char) -> bool {
    can_start_identifier(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn scan(src: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(src).scan_tokens(&mut diagnostics).unwrap();
        (tokens, diagnostics)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        scan(src).0.iter().map(Token::kind).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        let (tokens, diagnostics) = scan("");
        assert_eq!(vec![Token::eof(1)], tokens);
        assert!(!diagnostics.had_error());
    }

    #[test]
    fn single_character_punctuation() {
        assert_eq!(
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus,
                Semicolon, Slash, Star, Question, Colon, Equal, Bang, Greater, Less,
                EndOfFile,
            ],
            kinds("(){},.-+;/*?:=!><"),
        );
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(
            vec![EqualEqual, BangEqual, GreaterEqual, LessEqual, StarStar, EndOfFile],
            kinds("== != >= <= **"),
        );
    }

    #[test]
    fn power_is_a_single_token_but_spaced_stars_are_not() {
        assert_eq!(vec![StarStar, EndOfFile], kinds("**"));
        assert_eq!(vec![Star, Star, EndOfFile], kinds("* *"));
        assert_eq!(vec![StarStar, Star, EndOfFile], kinds("***"));
    }

    #[test]
    fn integer_number() {
        let (tokens, _) = scan("10");
        assert_eq!(Number, tokens[0].kind);
        assert_eq!("10", tokens[0].lexeme);
        assert_eq!(Some(&Literal::Number(10.0)), tokens[0].literal());
    }

    #[test]
    fn fractional_number() {
        let (tokens, _) = scan("10.5");
        assert_eq!(2, tokens.len());
        assert_eq!("10.5", tokens[0].lexeme);
        assert_eq!(Some(&Literal::Number(10.5)), tokens[0].literal());
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        let (tokens, _) = scan("10.");
        assert_eq!(vec![Number, Dot, EndOfFile], tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert_eq!("10", tokens[0].lexeme);
        assert_eq!(".", tokens[1].lexeme);
    }

    #[test]
    fn method_call_on_a_number() {
        assert_eq!(vec![Number, Dot, Identifier, EndOfFile], kinds("12.abs"));
    }

    #[test]
    fn comment_lines_produce_no_tokens() {
        let (tokens, _) = scan("// comment\nvar");
        assert_eq!(2, tokens.len());
        assert_eq!(Var, tokens[0].kind);
        assert_eq!(2, tokens[0].line);
    }

    #[test]
    fn comment_may_run_to_end_of_input() {
        let (tokens, diagnostics) = scan("1 // no newline");
        assert_eq!(vec![Number, EndOfFile], tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert!(!diagnostics.had_error());
    }

    #[test]
    fn keywords_only_match_whole_lexemes() {
        assert_eq!(vec![Print, EndOfFile], kinds("print"));
        assert_eq!(vec![Identifier, EndOfFile], kinds("printer"));
        assert_eq!(vec![Identifier, EndOfFile], kinds("fo"));
    }

    #[test]
    fn every_keyword_is_recognised() {
        assert_eq!(
            vec![
                And, Or, Class, If, Else, True, False, Fun, For, Nil, Print, Return,
                Super, This, Var, While, Break, Continue, EndOfFile,
            ],
            kinds("and or class if else true false fun for nil print return super this var while break continue"),
        );
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        let (tokens, _) = scan("_tmp a1b2");
        assert_eq!("_tmp", tokens[0].lexeme);
        assert_eq!("a1b2", tokens[1].lexeme);
        assert_eq!(Identifier, tokens[1].kind);
    }

    #[test]
    fn string_literal() {
        let (tokens, _) = scan("\"hi there\"");
        assert_eq!(String, tokens[0].kind);
        assert_eq!("\"hi there\"", tokens[0].lexeme);
        assert_eq!(Some(&Literal::from("hi there")), tokens[0].literal());
    }

    #[test]
    fn multi_line_string_advances_line() {
        let (tokens, _) = scan("\"a\nb\" x");
        assert_eq!(Some(&Literal::from("a\nb")), tokens[0].literal());
        assert_eq!(2, tokens[1].line);
    }

    #[test]
    fn multi_line_string_sits_on_its_opening_line() {
        let (tokens, _) = scan("\"a\nb\"");
        assert_eq!(String, tokens[0].kind);
        assert_eq!(1, tokens[0].line);
        assert_eq!(Token::eof(2), tokens[1]);
    }

    #[test]
    fn unterminated_string_is_reported_on_its_last_line() {
        let (_, diagnostics) = scan("\"a\nb");
        assert_eq!(2, diagnostics.errors()[0].line());
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (tokens, diagnostics) = scan("\"open");
        assert_eq!(vec![Token::eof(1)], tokens);
        assert_eq!("[line 1] Error: Unterminated string.", diagnostics.errors()[0].to_string());
    }

    #[test]
    fn unexpected_character_is_skipped_and_reported() {
        let (tokens, diagnostics) = scan("1\n@ 2");
        assert_eq!(vec![Number, Number, EndOfFile], tokens.iter().map(Token::kind).collect::<Vec<_>>());
        assert!(diagnostics.had_error());
        assert_eq!(1, diagnostics.len());
        assert_eq!("[line 2] Error: Unexpected character: @", diagnostics.errors()[0].to_string());
    }

    #[test]
    fn iterator_yields_lexical_errors_in_place() {
        let items: Vec<_> = Scanner::new("a # b").collect();
        assert_eq!(3, items.len());
        assert!(items[0].is_ok());
        assert_eq!(&crate::error::ErrorKind::Lexical { line: 1 }, items[1].as_ref().unwrap_err().kind());
        assert!(items[2].is_ok());
    }

    #[test]
    fn long_runs_of_whitespace_do_not_recurse() {
        let src = " ".repeat(200_000) + "x";
        assert_eq!(vec![Identifier, EndOfFile], kinds(&src));
    }

    #[test]
    fn eof_carries_the_final_line() {
        let (tokens, _) = scan("a\nb\n");
        assert_eq!(Token::eof(3), tokens[2]);
    }
}

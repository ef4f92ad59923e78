use std::fmt::{self, Display};

use crate::value::Literal;

/// A classified, line-tagged lexeme. Built once by the scanner and
/// read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) lexeme: String,
    pub(crate) literal: Option<Literal>,
    pub(crate) line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(
        kind: TokenKind,
        lexeme: S,
        literal: Option<Literal>,
        line: usize,
    ) -> Self {
        Token { kind, lexeme: lexeme.into(), literal, line }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", None, line)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Decoded value, present only for `Number` and `String` tokens.
    pub fn literal(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    /// 1-based line of the token's first character.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{}, {} {}", self.kind, self.lexeme, literal),
            None => write!(f, "{}, {} nil", self.kind, self.lexeme),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    LeftParen, RightParen, LeftBrace, RightBrace,
    Comma, Dot, Minus, Plus, Semicolon, Slash, Star,
    Question, Colon,

    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual,
    Less, LessEqual,
    StarStar,

    Identifier, String, Number,

    And, Break, Class, Continue, Else, False, Fun, For, If, Nil, Or,
    Print, Return, Super, This, True, Var, While,

    EndOfFile,
    // Never produced by the scanner.
    Invalid,
}

impl TokenKind {
    fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            LeftParen => "LEFT_PAREN",
            RightParen => "RIGHT_PAREN",
            LeftBrace => "LEFT_BRACE",
            RightBrace => "RIGHT_BRACE",
            Comma => "COMMA",
            Dot => "DOT",
            Minus => "MINUS",
            Plus => "PLUS",
            Semicolon => "SEMICOLON",
            Slash => "SLASH",
            Star => "STAR",
            Question => "QUESTION",
            Colon => "COLON",
            Bang => "BANG",
            BangEqual => "BANG_EQUAL",
            Equal => "EQUAL",
            EqualEqual => "EQUAL_EQUAL",
            Greater => "GREATER",
            GreaterEqual => "GREATER_EQUAL",
            Less => "LESS",
            LessEqual => "LESS_EQUAL",
            StarStar => "STAR_STAR",
            Identifier => "IDENTIFIER",
            String => "STRING",
            Number => "NUMBER",
            And => "AND",
            Break => "BREAK",
            Class => "CLASS",
            Continue => "CONTINUE",
            Else => "ELSE",
            False => "FALSE",
            Fun => "FUN",
            For => "FOR",
            If => "IF",
            Nil => "NIL",
            Or => "OR",
            Print => "PRINT",
            Return => "RETURN",
            Super => "SUPER",
            This => "THIS",
            True => "TRUE",
            Var => "VAR",
            While => "WHILE",
            EndOfFile => "EOF",
            Invalid => "INVALID",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

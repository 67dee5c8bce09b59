//! Tokens of the declaration language.

use logos::Logos;

use super::SyntaxError;
use crate::base::{TextRange, TextSize};

fn is_identifier(lex: &mut logos::Lexer<Token>) -> bool {
    let mut chars = lex.slice().chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Skips a `/* ... */` comment; an unterminated one is an error.
fn block_comment(lex: &mut logos::Lexer<Token>) -> logos::FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            logos::FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            logos::FilterResult::Error(())
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // ===== Literals =====
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", is_identifier, priority = 1)]
    Identifier,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("this")]
    This,

    // ===== Declarations =====
    #[token("namespace")]
    Namespace,

    #[token("class")]
    Class,

    #[token("struct")]
    Struct,

    #[token("interface")]
    Interface,

    #[token("enum")]
    Enum,

    #[token("delegate")]
    Delegate,

    #[token("where")]
    Where,

    #[token("const")]
    Const,

    #[token("ref")]
    Ref,

    // ===== Modifiers =====
    #[token("public")]
    Public,

    #[token("private")]
    Private,

    #[token("protected")]
    Protected,

    #[token("internal")]
    Internal,

    #[token("static")]
    Static,

    #[token("readonly")]
    Readonly,

    #[token("unsafe")]
    Unsafe,

    #[token("new")]
    New,

    #[token("abstract")]
    Abstract,

    #[token("virtual")]
    Virtual,

    #[token("override")]
    Override,

    #[token("sealed")]
    Sealed,

    // ===== Statements =====
    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    // ===== Braces =====
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    // ===== Punctuation =====
    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,

    #[token("*")]
    Star,

    #[token("/*", block_comment)]
    BlockComment,
}

impl Token {
    /// Spelling used in "expected ..., found ..." messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Identifier => "identifier",
            Token::Integer => "integer literal",
            Token::String => "string literal",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::This => "'this'",
            Token::Namespace => "'namespace'",
            Token::Class => "'class'",
            Token::Struct => "'struct'",
            Token::Interface => "'interface'",
            Token::Enum => "'enum'",
            Token::Delegate => "'delegate'",
            Token::Where => "'where'",
            Token::Const => "'const'",
            Token::Ref => "'ref'",
            Token::Public => "'public'",
            Token::Private => "'private'",
            Token::Protected => "'protected'",
            Token::Internal => "'internal'",
            Token::Static => "'static'",
            Token::Readonly => "'readonly'",
            Token::Unsafe => "'unsafe'",
            Token::New => "'new'",
            Token::Abstract => "'abstract'",
            Token::Virtual => "'virtual'",
            Token::Override => "'override'",
            Token::Sealed => "'sealed'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::Break => "'break'",
            Token::Continue => "'continue'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::Less => "'<'",
            Token::Greater => "'>'",
            Token::Semicolon => "';'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::Colon => "':'",
            Token::Equals => "'='",
            Token::Star => "'*'",
            Token::BlockComment => "comment",
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::Public
                | Token::Private
                | Token::Protected
                | Token::Internal
                | Token::Static
                | Token::Readonly
                | Token::Unsafe
                | Token::New
                | Token::Abstract
                | Token::Virtual
                | Token::Override
                | Token::Sealed
        )
    }
}

/// A token with its source range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub range: TextRange,
}

/// Lex `text`, failing on the first unrecognized character.
pub fn lex(text: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let mut lexer = Token::lexer(text);
    let mut out = Vec::new();
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(TextSize::from(span.start as u32), TextSize::from(span.end as u32));
        match token {
            Ok(token) => out.push(Lexeme { token, range }),
            Err(()) => {
                return Err(SyntaxError::InvalidToken {
                    text: lexer.slice().into(),
                    range,
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        lex(text).unwrap().into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("class C : Base { }"),
            vec![Token::Class, Token::Identifier, Token::Colon, Token::Identifier, Token::LBrace, Token::RBrace]
        );
        assert_eq!(tokens("classy"), vec![Token::Identifier]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokens("// line\nint /* block */ x;"),
            vec![Token::Identifier, Token::Identifier, Token::Semicolon]
        );
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(
            tokens("/**/ a /* * / ** */ b /* multi\nline */;"),
            vec![Token::Identifier, Token::Identifier, Token::Semicolon]
        );
        let lexemes = lex("x /* c */ y").unwrap();
        assert_eq!(lexemes[1].range, TextRange::new(TextSize::from(10), TextSize::from(11)));
        assert!(matches!(lex("int /* open"), Err(SyntaxError::InvalidToken { .. })));
    }

    #[test]
    fn test_ranges() {
        let lexemes = lex("a[1]").unwrap();
        assert_eq!(lexemes[2].range, TextRange::new(TextSize::from(2), TextSize::from(3)));
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(lex("int #x;"), Err(SyntaxError::InvalidToken { .. })));
    }
}

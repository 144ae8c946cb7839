//! Logos-based lexer for Java source.
//!
//! Only what the declaration scanner needs is told apart: identifiers,
//! declaration keywords, literals (so their contents never look like braces)
//! and bracket punctuation. Operators collapse into [`TokenKind::Operator`].

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    /// `/** ... */`
    pub fn is_doc_comment(&self) -> bool {
        self.kind == TokenKind::BlockComment && self.text.starts_with("/**") && self.text.len() > 4
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();
        Some(Token {
            kind,
            text: self.inner.slice(),
            offset: TextSize::new(span.start as u32),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    /// Block and javadoc comments, see [`Token::is_doc_comment`].
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#)]
    TextBlock,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*")]
    Number,

    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Ident,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("package")]
    PackageKw,
    #[token("import")]
    ImportKw,
    #[token("class")]
    ClassKw,
    #[token("interface")]
    InterfaceKw,
    #[token("enum")]
    EnumKw,
    #[token("extends")]
    ExtendsKw,
    #[token("implements")]
    ImplementsKw,
    #[token("throws")]
    ThrowsKw,
    #[token("new")]
    NewKw,
    #[token("default")]
    DefaultKw,

    // Modifiers
    #[token("public")]
    PublicKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("static")]
    StaticKw,
    #[token("final")]
    FinalKw,
    #[token("abstract")]
    AbstractKw,
    #[token("native")]
    NativeKw,
    #[token("synchronized")]
    SynchronizedKw,
    #[token("transient")]
    TransientKw,
    #[token("volatile")]
    VolatileKw,
    #[token("strictfp")]
    StrictfpKw,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("&")]
    Amp,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[regex(r"[+\-*/%!~^|]")]
    Operator,

    Error,
}

impl TokenKind {
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::PublicKw
                | TokenKind::PrivateKw
                | TokenKind::ProtectedKw
                | TokenKind::StaticKw
                | TokenKind::FinalKw
                | TokenKind::AbstractKw
                | TokenKind::NativeKw
                | TokenKind::SynchronizedKw
                | TokenKind::TransientKw
                | TokenKind::VolatileKw
                | TokenKind::StrictfpKw
                | TokenKind::DefaultKw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lex_package() {
        let tokens: Vec<_> = Lexer::new("package a.b;").collect();
        assert_eq!(tokens.len(), 6); // package, whitespace, a, ., b, ;
        assert_eq!(tokens[0].kind, TokenKind::PackageKw);
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[5].kind, TokenKind::Semicolon);
        assert_eq!(tokens[2].offset, TextSize::new(8));
    }

    #[test]
    fn test_lex_generic_field() {
        assert_eq!(
            kinds("Map<String, List<Integer>> m;"),
            vec![
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Ident,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_literals_hide_braces() {
        assert_eq!(
            kinds(r#"s = "{" + '}';"#),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::String,
                TokenKind::Operator,
                TokenKind::Char,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_doc_comment_is_told_apart() {
        let tokens = tokenize("/** doc */ /* plain */ /**/");
        let docs: Vec<_> = tokens.iter().map(|t| t.is_doc_comment()).collect();
        assert_eq!(docs, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_varargs_and_identifiers() {
        assert_eq!(
            kinds("String... $x_1"),
            vec![TokenKind::Ident, TokenKind::Ellipsis, TokenKind::Ident]
        );
    }
}

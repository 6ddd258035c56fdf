use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for markup fragments.
///
/// Only the shapes the document tree needs are recognised. Anything the
/// lexer cannot classify is surfaced as raw text by [`tokenize`].
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Opening or self-closing tag, attributes included. Quoted attribute
    // values may contain `>`.
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    OpenTag(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![^-][^>]*>", |lex| lex.slice())]
    Doctype(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // A `<` that does not start a tag is literal text.
    #[token("<", |lex| lex.slice())]
    Lt(&'src str),
}

fn lex_comment<'s>(lex: &mut logos::Lexer<'s, Token<'s>>) -> &'s str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => lex.bump(end + 3),
        None => lex.bump(rest.len()),
    }
    lex.slice()
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::OpenTag(s)
            | Token::CloseTag(s)
            | Token::Comment(s)
            | Token::Doctype(s)
            | Token::Text(s)
            | Token::Lt(s) => write!(f, "{}", s),
        }
    }
}

impl<'src> Token<'src> {
    /// Lower-cased tag name for open/close tags.
    pub fn tag_name(&self) -> Option<String> {
        let raw = match self {
            Token::OpenTag(s) => &s[1..],
            Token::CloseTag(s) => &s[2..],
            _ => return None,
        };
        let name: String = raw
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(name.to_ascii_lowercase())
        }
    }

    /// True for `<tag ... />`.
    pub fn is_self_closing(&self) -> bool {
        matches!(self, Token::OpenTag(s) if s.trim_end_matches('>').trim_end().ends_with('/'))
    }
}

/// Tokenize markup into spanned tokens.
///
/// Lexer errors never abort tokenization; the offending slice is returned as
/// [`Token::Text`].
pub fn tokenize(source: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => tokens.push((Token::Text(&source[span.clone()]), span)),
        }
    }

    tokens
}

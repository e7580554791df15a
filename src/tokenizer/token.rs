use nom::{
    branch::alt,
    character::complete::anychar,
    combinator::{map, recognize},
    error::{context, VerboseError},
    IResult,
};

use super::{
    comment::{parse_comment_marker, parse_newline},
    keyword::{parse_keyword, Keyword},
    literal::{parse_quoted_literal, unquote},
};

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Keyword(Keyword),
    /// Single-quoted literal, raw text including the quotes.
    Literal(&'a str),
    /// `//`
    CommentMarker,
    Newline(&'a str),
    /// Fallback: exactly one character of anything else.
    Char(&'a str),
}

impl<'a> Token<'a> {
    /// The exact source text this token was produced from.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Keyword(kw) => keyword_text(*kw),
            Token::Literal(raw) | Token::Newline(raw) | Token::Char(raw) => raw,
            Token::CommentMarker => "//",
        }
    }

    /// Literal content without the quotes.
    pub fn literal_text(&self) -> Option<&'a str> {
        match self {
            Token::Literal(raw) => Some(unquote(raw)),
            _ => None,
        }
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Newline(_))
    }
}

fn keyword_text(kw: Keyword) -> &'static str {
    match kw {
        Keyword::Halt => "__END__",
        Keyword::End => "end",
        Keyword::BeforeEach => "before_each",
        Keyword::AfterEach => "after_each",
        Keyword::Before => "before",
        Keyword::After => "after",
        Keyword::It => "it",
        Keyword::Describe => "describe",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan<'a> {
    pub token: Token<'a>,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub line: usize,
    pub column: usize,
}

impl From<&TokenSpan<'_>> for Span {
    fn from(span: &TokenSpan<'_>) -> Self {
        Span {
            start: span.start,
            line: span.line,
            column: span.column,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Entry point of the tokenizer. Holds no state; every call to
/// [`tokenize`](Tokenizer::tokenize) starts a fresh pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize<'a>(&self, input: &'a str) -> Tokens<'a> {
        Tokens {
            remaining: input,
            position: 0,
            line: 1,
            column: 1,
            previous: None,
        }
    }
}

/// Lazy token stream over a source string.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    remaining: &'a str,
    position: usize,
    line: usize,
    column: usize,
    previous: Option<char>,
}

impl<'a> Tokens<'a> {
    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.previous = Some(c);
        }
    }

    fn keyword_allowed(&self) -> bool {
        !self
            .previous
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = TokenSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let input = self.remaining;
        let (rest, token) = next_token(input, self.keyword_allowed());
        let consumed = &input[..input.len() - rest.len()];

        let span = TokenSpan {
            token,
            start: self.position,
            end: self.position + consumed.len(),
            line: self.line,
            column: self.column,
        };
        self.update_position(consumed);
        self.remaining = rest;
        Some(span)
    }
}

fn next_token(input: &str, keyword_allowed: bool) -> (&str, Token<'_>) {
    if keyword_allowed {
        if let Ok((rest, kw)) = parse_keyword(input) {
            return (rest, Token::Keyword(kw));
        }
    }

    alt((
        map(parse_quoted_literal, Token::Literal),
        parse_comment_marker,
        parse_newline,
        parse_char,
    ))(input)
    .unwrap_or_else(|_| {
        // `parse_char` only fails on empty input, which the iterator never passes.
        let len = input.chars().next().map_or(input.len(), char::len_utf8);
        (&input[len..], Token::Char(&input[..len]))
    })
}

fn parse_char(input: &str) -> ParserResult<Token<'_>> {
    context("character", map(recognize(anychar), Token::Char))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new().tokenize(input).map(|s| s.token).collect()
    }

    #[test]
    fn test_structure_tokens() {
        assert_eq!(
            tokens("describe 'a'\n  it 'b' end\nend"),
            vec![
                Token::Keyword(Keyword::Describe),
                Token::Char(" "),
                Token::Literal("'a'"),
                Token::Newline("\n"),
                Token::Char(" "),
                Token::Char(" "),
                Token::Keyword(Keyword::It),
                Token::Char(" "),
                Token::Literal("'b'"),
                Token::Char(" "),
                Token::Keyword(Keyword::End),
                Token::Newline("\n"),
                Token::Keyword(Keyword::End),
            ]
        );
    }

    #[test]
    fn test_keywords_inside_words_are_plain_text() {
        let toks = tokens("friend x.it_works end_of");
        assert!(toks.iter().all(|t| matches!(t, Token::Char(_))));
    }

    #[test]
    fn test_body_code_is_single_characters() {
        let toks = tokens("x.should_eql(1)");
        assert_eq!(toks.len(), "x.should_eql(1)".len());
    }

    #[test]
    fn test_positions() {
        let spans: Vec<_> = Tokenizer::new().tokenize("it\n  end").collect();
        let end = spans.last().unwrap();
        assert_eq!(end.token, Token::Keyword(Keyword::End));
        assert_eq!((end.line, end.column), (2, 3));
        assert_eq!((end.start, end.end), (5, 8));
    }

    #[test]
    fn test_tokenize_is_restartable() {
        let tokenizer = Tokenizer::new();
        let input = "describe 'x' end";
        let first: Vec<_> = tokenizer.tokenize(input).collect();
        let second: Vec<_> = tokenizer.tokenize(input).collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_tokens_cover_every_byte(input in "(describe|it|end|before_each|'[a-z ]*'|//|\n|[a-z_. ()'])*") {
            let joined: String = Tokenizer::new()
                .tokenize(&input)
                .map(|span| span.token.raw())
                .collect();
            prop_assert_eq!(joined, input);
        }
    }
}

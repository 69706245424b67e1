//! Delimited tool-call grammar
//!
//! ```text
//! <|start|>assistant<|channel|>commentary to=functions.NAME <|constrain|>json<|message|>JSON
//! ```
//!
//! The header up to `<|message|>` is tokenized into markers and text runs;
//! everything after `<|message|>` is the argument payload and is never
//! scanned for markers, so marker-like text inside the JSON is harmless.

pub const START: &str = "start";
pub const CHANNEL: &str = "channel";
pub const CONSTRAIN: &str = "constrain";
pub const MESSAGE: &str = "message";

const ROLE: &str = "assistant";
const CHANNEL_NAME: &str = "commentary";
const RECIPIENT_PREFIX: &str = "to=functions.";
const FORMAT: &str = "json";

/// Render a call in the delimited grammar
pub fn render_call(name: &str, arguments: &str) -> String {
    format!(
        "<|{START}|>{ROLE}<|{CHANNEL}|>{CHANNEL_NAME} {RECIPIENT_PREFIX}{name} <|{CONSTRAIN}|>{FORMAT}<|{MESSAGE}|>{arguments}"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `<|word|>`
    Marker(&'a str),
    /// Text between markers
    Text(&'a str),
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Marker word at the cursor, if the cursor sits on `<|word|>`
    fn marker_at(&self) -> Option<(&'a str, usize)> {
        let rest = self.rest();
        let body = rest.strip_prefix("<|")?;
        let end = body.find("|>")?;
        let word = &body[..end];
        let is_word = !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        is_word.then_some((word, end + 4))
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }
        if let Some((word, len)) = self.marker_at() {
            self.pos += len;
            return Some(Token::Marker(word));
        }

        let start = self.pos;
        loop {
            match self.input[self.pos..].find("<|") {
                Some(0) if self.pos > start && self.marker_at().is_some() => break,
                Some(0) => self.pos += 2,
                Some(offset) => {
                    self.pos += offset;
                    if self.marker_at().is_some() {
                        break;
                    }
                }
                None => {
                    self.pos = self.input.len();
                    break;
                }
            }
        }
        Some(Token::Text(&self.input[start..self.pos]))
    }
}

/// A call recognized in the delimited grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerCall<'a> {
    pub name: &'a str,
    /// Raw argument text, not yet parsed
    pub arguments: &'a str,
}

fn is_tool_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Match `content` (leading/trailing whitespace ignored) against the grammar
pub fn match_call(content: &str) -> Option<MarkerCall<'_>> {
    let mut lexer = Lexer::new(content.trim());

    if lexer.next_token()? != Token::Marker(START) {
        return None;
    }
    if lexer.next_token()? != Token::Text(ROLE) {
        return None;
    }
    if lexer.next_token()? != Token::Marker(CHANNEL) {
        return None;
    }

    let Token::Text(header) = lexer.next_token()? else {
        return None;
    };
    let mut words = header.split_whitespace();
    if words.next()? != CHANNEL_NAME {
        return None;
    }
    let name = words.next()?.strip_prefix(RECIPIENT_PREFIX)?;
    if words.next().is_some() || !is_tool_name(name) {
        return None;
    }

    if lexer.next_token()? != Token::Marker(CONSTRAIN) {
        return None;
    }
    if lexer.next_token()?.text()?.trim() != FORMAT {
        return None;
    }
    if lexer.next_token()? != Token::Marker(MESSAGE) {
        return None;
    }

    Some(MarkerCall {
        name,
        arguments: lexer.rest().trim(),
    })
}

impl<'a> Token<'a> {
    fn text(self) -> Option<&'a str> {
        match self {
            Token::Text(text) => Some(text),
            Token::Marker(_) => None,
        }
    }
}

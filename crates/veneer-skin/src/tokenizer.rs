//! Skin markup tokenizer.
//!
//! Consumes a `&str` and yields tags, text and problems with their source
//! line. The grammar is a small XML-like subset: start / end /
//! self-closing tags, case-insensitive attributes with double-, single- or
//! un-quoted values, `<!-- comments -->`, and raw text inside `<script>`.
//! Malformed input is reported as [`Token::Error`] and skipped; the
//! tokenizer never panics.

use veneer_ui::attrs::Attributes;

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// An opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Attributes,
    pub self_closing: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start(Tag),
    End { name: String, line: usize },
    /// Non-blank character data, trimmed.
    Text { text: String, line: usize },
    Error { message: String, line: usize },
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Self::Start(t) => t.line,
            Self::End { line, .. } | Self::Text { line, .. } | Self::Error { line, .. } => *line,
        }
    }
}

/// Tags whose content is opaque text.
const RAW_TEXT_TAGS: &[&str] = &["script"];

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    /// Set after a raw-text start tag: the next token is its content.
    raw_until: Option<String>,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            raw_until: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i).is_some_and(|p| p.eq_ignore_ascii_case(&c)))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.') {
                name.push(c.to_ascii_lowercase());
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn text(&mut self) -> Option<Token> {
        let line = self.line;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '<' {
                break;
            }
            text.push(c);
            self.advance();
        }
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| Token::Text {
            text: decode_entities(trimmed),
            line,
        })
    }

    fn raw_text(&mut self, tag: &str) -> Token {
        let line = self.line;
        let close = format!("</{tag}");
        let mut text = String::new();
        while self.peek().is_some() && !self.starts_with(&close) {
            if let Some(c) = self.advance() {
                text.push(c);
            }
        }
        Token::Text {
            text: text.trim().to_string(),
            line,
        }
    }

    fn comment(&mut self) -> Option<Token> {
        let line = self.line;
        for _ in 0..4 {
            self.advance();
        }
        while self.peek().is_some() {
            if self.starts_with("-->") {
                for _ in 0..3 {
                    self.advance();
                }
                return None;
            }
            self.advance();
        }
        Some(Token::Error {
            message: "unterminated comment".into(),
            line,
        })
    }

    fn end_tag(&mut self) -> Token {
        let line = self.line;
        self.advance();
        self.advance();
        let name = self.read_name();
        self.skip_whitespace();
        if self.peek() == Some('>') {
            self.advance();
            Token::End { name, line }
        } else {
            self.recover();
            Token::Error {
                message: format!("malformed end tag '</{name}'"),
                line,
            }
        }
    }

    /// Skip to just past the next `>`.
    fn recover(&mut self) {
        while let Some(c) = self.advance() {
            if c == '>' {
                break;
            }
        }
    }

    fn attr_value(&mut self) -> Option<String> {
        match self.peek()? {
            q @ ('"' | '\'') => {
                self.advance();
                let mut v = String::new();
                loop {
                    match self.advance()? {
                        c if c == q => return Some(decode_entities(&v)),
                        c => v.push(c),
                    }
                }
            },
            _ => {
                let mut v = String::new();
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' || (c == '/' && self.peek_at(1) == Some('>')) {
                        break;
                    }
                    v.push(c);
                    self.advance();
                }
                Some(decode_entities(&v))
            },
        }
    }

    fn start_tag(&mut self) -> Token {
        let line = self.line;
        self.advance();
        let name = self.read_name();
        if name.is_empty() {
            self.recover();
            return Token::Error {
                message: "tag without a name".into(),
                line,
            };
        }
        let mut attrs = Attributes::new(line);
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Token::Error {
                        message: format!("unterminated tag '<{name}'"),
                        line,
                    };
                },
                Some('>') => {
                    self.advance();
                    if RAW_TEXT_TAGS.contains(&name.as_str()) {
                        self.raw_until = Some(name.clone());
                    }
                    return Token::Start(Tag {
                        name,
                        attrs,
                        self_closing: false,
                        line,
                    });
                },
                Some('/') if self.peek_at(1) == Some('>') => {
                    self.advance();
                    self.advance();
                    return Token::Start(Tag {
                        name,
                        attrs,
                        self_closing: true,
                        line,
                    });
                },
                Some(_) => {
                    let key = self.read_name();
                    if key.is_empty() {
                        self.recover();
                        return Token::Error {
                            message: format!("bad attribute syntax in '<{name}'"),
                            line,
                        };
                    }
                    self.skip_whitespace();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.skip_whitespace();
                        match self.attr_value() {
                            Some(v) => attrs.insert(&key, v),
                            None => {
                                return Token::Error {
                                    message: format!("unterminated value for '{key}'"),
                                    line,
                                };
                            },
                        }
                    } else {
                        // bare attribute acts as a flag
                        attrs.insert(&key, "1");
                    }
                },
            }
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(tag) = self.raw_until.take() {
            let token = self.raw_text(&tag);
            if let Token::Text { text, .. } = &token
                && !text.is_empty()
            {
                return Some(token);
            }
        }
        loop {
            match self.peek()? {
                '<' if self.starts_with("<!--") => {
                    if let Some(err) = self.comment() {
                        return Some(err);
                    }
                },
                '<' if self.peek_at(1) == Some('/') => return Some(self.end_tag()),
                '<' if self.peek_at(1) == Some('?') || self.peek_at(1) == Some('!') => {
                    // prolog / doctype: ignored
                    self.recover();
                },
                '<' => return Some(self.start_tag()),
                _ => {
                    if let Some(text) = self.text() {
                        return Some(text);
                    }
                },
            }
        }
    }
}

/// Tokenize a whole document.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

/// Replace the five predefined XML entities.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

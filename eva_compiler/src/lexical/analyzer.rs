//! Incremental tokenizer
//!
//! [`next_token`] is a split function over a growing byte buffer: it either
//! matches one token, asks for more input, or reports that only whitespace is
//! left. [`Scanner`] drives it over any `Read` and [`tokenize`] over a complete
//! string, so both share the exact same token boundaries.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenKind, TokenSource};
use crate::utils::{Position, Span};
use crate::log_debug;
use std::collections::BTreeMap;
use std::io::{self, Read};

/// Lexical analysis errors
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("bad token '{character}' at {position}")]
    BadToken { character: char, position: Position },

    #[error("token too long: {length} bytes (max {MAX_TOKEN_SIZE})")]
    TokenTooLong { length: usize },

    #[error("too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::BadToken { .. } => codes::lexical::BAD_TOKEN,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::Io(_) => codes::input::READ_FAILURE,
        }
    }
}

/// Result of one call to the split function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// `buffer[start..end]` is a token; consume `advance` bytes
    Token {
        advance: usize,
        start: usize,
        end: usize,
    },
    /// Same as `Token` for the statement terminator; nothing follows it
    Final {
        advance: usize,
        start: usize,
        end: usize,
    },
    /// Drop `advance` bytes of whitespace and call again with more data
    NeedMore { advance: usize },
    /// End of input with nothing but whitespace left
    Exhausted,
}

type Matcher = fn(&[u8]) -> Option<usize>;

fn match_byte<const B: u8>(input: &[u8]) -> Option<usize> {
    (input.first() == Some(&B)).then_some(1)
}

fn match_digits(input: &[u8]) -> Option<usize> {
    let len = input.iter().take_while(|b| b.is_ascii_digit()).count();
    (len > 0).then_some(len)
}

/// Tried in this order; the patterns are disjoint on their first byte
const MATCHERS: [(TokenKind, Matcher); 6] = [
    (TokenKind::Plus, match_byte::<b'+'>),
    (TokenKind::Star, match_byte::<b'*'>),
    (TokenKind::LeftParen, match_byte::<b'('>),
    (TokenKind::RightParen, match_byte::<b')'>),
    (TokenKind::Number, match_digits),
    (TokenKind::Semicolon, match_byte::<b';'>),
];

/// Space, tab, newline, vertical tab, carriage return and form feed
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | b'\r' | 0x0C)
}

/// First character of `bytes`, decoding lossily
fn leading_char(bytes: &[u8]) -> char {
    let end = bytes.len().min(4);
    String::from_utf8_lossy(&bytes[..end])
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Split the next token out of `buffer`
///
/// Positions in a returned `BadToken` are relative to the start of `buffer`.
pub fn next_token(buffer: &[u8], at_eof: bool) -> Result<SplitOutcome, LexerError> {
    let start = buffer.iter().take_while(|b| is_whitespace(**b)).count();
    let rest = &buffer[start..];

    if rest.is_empty() {
        return Ok(if at_eof {
            SplitOutcome::Exhausted
        } else {
            SplitOutcome::NeedMore { advance: start }
        });
    }

    for (kind, matcher) in MATCHERS.iter() {
        let Some(len) = matcher(rest) else {
            continue;
        };

        // A digit run touching the end of the buffer may continue in the next read
        if *kind == TokenKind::Number && len == rest.len() && !at_eof {
            return Ok(SplitOutcome::NeedMore { advance: start });
        }

        if len > MAX_TOKEN_SIZE {
            return Err(LexerError::TokenTooLong { length: len });
        }

        let end = start + len;
        return Ok(if *kind == TokenKind::Semicolon {
            SplitOutcome::Final {
                advance: end,
                start,
                end,
            }
        } else {
            SplitOutcome::Token {
                advance: end,
                start,
                end,
            }
        });
    }

    if at_eof {
        Err(LexerError::BadToken {
            character: leading_char(rest),
            position: Position::start().advance_bytes(&buffer[..start]),
        })
    } else {
        Ok(SplitOutcome::NeedMore { advance: start })
    }
}

/// Assign a kind to text the split function produced
pub fn classify(text: &str) -> Result<TokenKind, LexerError> {
    let bytes = text.as_bytes();

    MATCHERS
        .iter()
        .find(|(_, matcher)| matcher(bytes) == Some(bytes.len()))
        .map(|(kind, _)| *kind)
        .ok_or_else(|| LexerError::BadToken {
            character: leading_char(bytes),
            position: Position::start(),
        })
}

/// Per-statement tokenization metrics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub bytes_consumed: usize,
    pub whitespace_bytes: usize,
    pub longest_number: usize,
    pub kind_counts: BTreeMap<&'static str, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if token.kind == TokenKind::Number {
            self.longest_number = self.longest_number.max(token.text.len());
        }

        if preferences.collect_detailed_metrics {
            *self.kind_counts.entry(token.kind.as_str()).or_insert(0) += 1;
        }
    }

    pub(crate) fn record_consumed(&mut self, bytes: &[u8]) {
        self.bytes_consumed += bytes.len();
        self.whitespace_bytes += bytes.iter().filter(|b| is_whitespace(**b)).count();
    }

    pub fn count_of(&self, kind: TokenKind) -> usize {
        self.kind_counts.get(kind.as_str()).copied().unwrap_or(0)
    }
}

/// Streaming tokenizer over any reader
///
/// After yielding the `;` token the scanner reports end of stream forever and
/// reads nothing further.
pub struct Scanner<R> {
    reader: R,
    buffer: Vec<u8>,
    start: usize,
    position: Position,
    at_eof: bool,
    finished: bool,
    chunk_size: usize,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self::with_preferences(reader, LexicalPreferences::default())
    }

    pub fn with_preferences(reader: R, preferences: LexicalPreferences) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(READ_CHUNK_SIZE),
            start: 0,
            position: Position::start(),
            at_eof: false,
            finished: false,
            chunk_size: READ_CHUNK_SIZE,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Bytes requested from the reader per read call
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn token_count(&self) -> usize {
        self.metrics.total_tokens
    }

    /// True once the terminator, end of input, or an error was reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Position of the next unconsumed byte
    pub fn position(&self) -> Position {
        self.position
    }

    fn fill(&mut self) -> Result<(), LexerError> {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }

        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.at_eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(LexerError::Io(e)),
            }
        }
    }

    fn consume(&mut self, count: usize) {
        let consumed = &self.buffer[self.start..self.start + count];
        self.position = self.position.advance_bytes(consumed);
        self.metrics.record_consumed(consumed);
        self.start += count;
    }

    fn emit(&mut self, start: usize, end: usize) -> Result<Token, LexerError> {
        if self.metrics.total_tokens >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.metrics.total_tokens + 1,
            });
        }

        let pending = &self.buffer[self.start..];
        let text = String::from_utf8_lossy(&pending[start..end]).into_owned();
        let kind = classify(&text)?;

        let token_start = self.position.advance_bytes(&pending[..start]);
        let token_end = token_start.advance_bytes(&pending[start..end]);
        let token = Token::new(kind, text, Span::new(token_start, token_end));

        self.metrics.record_token(&token, &self.preferences);
        Ok(token)
    }

    fn take(
        &mut self,
        advance: usize,
        start: usize,
        end: usize,
        is_final: bool,
    ) -> Result<Token, LexerError> {
        let token = match self.emit(start, end) {
            Ok(token) => token,
            Err(e) => return Err(self.fail(e)),
        };
        self.consume(advance);

        if is_final {
            self.finished = true;
            log_debug!("Statement terminator reached",
                "tokens" => self.metrics.total_tokens
            );
        }
        Ok(token)
    }

    /// Stop scanning; a bad-token position is rebased from the buffer onto the input
    fn fail(&mut self, error: LexerError) -> LexerError {
        self.finished = true;

        match error {
            LexerError::BadToken {
                character,
                position,
            } => {
                let skipped = &self.buffer[self.start..self.start + position.offset];
                LexerError::BadToken {
                    character,
                    position: self.position.advance_bytes(skipped),
                }
            }
            other => other,
        }
    }
}

impl<R: Read> TokenSource for Scanner<R> {
    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let outcome = next_token(&self.buffer[self.start..], self.at_eof);

            match outcome {
                Ok(SplitOutcome::Token {
                    advance,
                    start,
                    end,
                }) => return self.take(advance, start, end, false).map(Some),
                Ok(SplitOutcome::Final {
                    advance,
                    start,
                    end,
                }) => return self.take(advance, start, end, true).map(Some),
                Ok(SplitOutcome::NeedMore { advance }) => {
                    self.consume(advance);

                    let pending = self.buffer.len() - self.start;
                    if pending > MAX_TOKEN_SIZE {
                        return Err(self.fail(LexerError::TokenTooLong { length: pending }));
                    }

                    if let Err(e) = self.fill() {
                        return Err(self.fail(e));
                    }
                }
                Ok(SplitOutcome::Exhausted) => {
                    let remaining = self.buffer.len() - self.start;
                    self.consume(remaining);
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
    }
}

/// Tokenize a complete statement, stopping after the terminator
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
    let bytes = text.as_bytes();
    let mut offset = 0;
    let mut position = Position::start();
    let mut tokens = Vec::new();

    loop {
        let outcome = next_token(&bytes[offset..], true).map_err(|e| match e {
            LexerError::BadToken {
                character,
                position: relative,
            } => LexerError::BadToken {
                character,
                position: position.advance_bytes(&bytes[offset..offset + relative.offset]),
            },
            other => other,
        })?;

        let (advance, start, end, is_final) = match outcome {
            SplitOutcome::Token {
                advance,
                start,
                end,
            } => (advance, start, end, false),
            SplitOutcome::Final {
                advance,
                start,
                end,
            } => (advance, start, end, true),
            SplitOutcome::Exhausted | SplitOutcome::NeedMore { .. } => return Ok(tokens),
        };

        if tokens.len() >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: tokens.len() + 1,
            });
        }

        let slice = &text[offset + start..offset + end];
        let token_start = position.advance_bytes(&bytes[offset..offset + start]);
        let token_end = token_start.advance_bytes(slice.as_bytes());
        tokens.push(Token::new(
            classify(slice)?,
            slice,
            Span::new(token_start, token_end),
        ));

        position = position.advance_bytes(&bytes[offset..offset + advance]);
        offset += advance;

        if is_final {
            return Ok(tokens);
        }
    }
}

//! Streaming statement splitter for SQL dump text.
//!
//! [`StatementReader`] consumes a [`BufRead`] stream and yields one
//! [`Statement`] at a time. A `;` terminates a statement only when it is not
//! inside a string literal, a backtick-quoted identifier, or a comment.
//! Memory use is bounded by the largest single statement, not the dump size.

use crate::core::Statement;
use crate::error::{ConvertError, Result};
use std::io::BufRead;

/// Lexer state while scanning for statement terminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Normal,
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment,
}

/// Lazy statement iterator over a SQL dump stream.
///
/// Comments and whitespace *between* statements are discarded; comments inside
/// a started statement (including `/*!...*/` version-conditional text, which
/// is real content to MySQL) are kept as part of the statement text.
pub struct StatementReader<R> {
    reader: R,
    buffer: String,
    /// Byte offset of `buffer[0]` within the input stream.
    base_offset: u64,
    /// Position within `buffer` where scanning resumes.
    scan_pos: usize,
    state: LexState,
    /// Stream offset where the open quote/comment construct began.
    open_offset: u64,
    /// Index into `buffer` where the current statement's content begins.
    stmt_start: Option<usize>,
    /// A backslash escape is pending inside a string literal.
    escaped: bool,
    eof: bool,
    done: bool,
}

impl<R: BufRead> StatementReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            base_offset: 0,
            scan_pos: 0,
            state: LexState::Normal,
            open_offset: 0,
            stmt_start: None,
            escaped: false,
            eof: false,
            done: false,
        }
    }

    /// Total bytes consumed from the underlying stream so far.
    pub fn bytes_read(&self) -> u64 {
        self.base_offset + self.buffer.len() as u64
    }

    fn next_statement(&mut self) -> Result<Option<Statement>> {
        loop {
            if let Some(end) = self.scan()? {
                let start = self.stmt_start.take().expect("scan returned end without start");
                let text = self.buffer[start..end].trim_end().to_string();
                let offset = self.base_offset + start as u64;
                self.buffer.drain(..=end);
                self.base_offset += end as u64 + 1;
                self.scan_pos = 0;
                return Ok(Some(Statement::classify(text, offset)));
            }

            // Nothing before the scan point is part of a statement; drop it so
            // comment-heavy preambles don't accumulate.
            if self.stmt_start.is_none() && self.scan_pos > 0 {
                self.buffer.drain(..self.scan_pos);
                self.base_offset += self.scan_pos as u64;
                self.scan_pos = 0;
            }

            if self.eof {
                return self.finish_at_eof();
            }

            let mut line = String::new();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.eof = true;
            } else {
                self.buffer.push_str(&line);
            }
        }
    }

    /// Scan forward for a statement terminator.
    ///
    /// Returns `Ok(Some(idx))` when an unquoted `;` ends a started statement,
    /// `Ok(None)` when more input is needed. `scan_pos` is left at the first
    /// unconsumed byte (a lookahead pause keeps `-`/`/`/`*` unconsumed when a
    /// two-byte token might straddle the buffer edge).
    fn scan(&mut self) -> Result<Option<usize>> {
        let bytes = self.buffer.as_bytes();
        let len = bytes.len();
        let mut i = self.scan_pos;

        while i < len {
            let b = bytes[i];
            match self.state {
                LexState::Normal => match b {
                    b';' => {
                        if self.stmt_start.is_some() {
                            self.scan_pos = i + 1;
                            return Ok(Some(i));
                        }
                        // Stray terminator with no content: skip it.
                    }
                    b'\'' => {
                        if self.stmt_start.is_none() {
                            self.stmt_start = Some(i);
                        }
                        self.state = LexState::SingleQuote;
                        self.open_offset = self.base_offset + i as u64;
                    }
                    b'"' => {
                        if self.stmt_start.is_none() {
                            self.stmt_start = Some(i);
                        }
                        self.state = LexState::DoubleQuote;
                        self.open_offset = self.base_offset + i as u64;
                    }
                    b'`' => {
                        if self.stmt_start.is_none() {
                            self.stmt_start = Some(i);
                        }
                        self.state = LexState::Backtick;
                        self.open_offset = self.base_offset + i as u64;
                    }
                    b'#' => {
                        self.state = LexState::LineComment;
                    }
                    b'-' => {
                        // `--` opens a comment only when followed by
                        // whitespace or end of line (MySQL rule); `1--2`
                        // stays arithmetic.
                        if i + 2 >= len && !self.eof {
                            self.scan_pos = i;
                            return Ok(None);
                        }
                        if bytes.get(i + 1) == Some(&b'-')
                            && bytes
                                .get(i + 2)
                                .map_or(true, |c| c.is_ascii_whitespace())
                        {
                            self.state = LexState::LineComment;
                            i += 1;
                        } else {
                            if self.stmt_start.is_none() {
                                self.stmt_start = Some(i);
                            }
                        }
                    }
                    b'/' => {
                        if i + 2 >= len && !self.eof {
                            self.scan_pos = i;
                            return Ok(None);
                        }
                        if bytes.get(i + 1) == Some(&b'*') {
                            self.state = LexState::BlockComment;
                            self.open_offset = self.base_offset + i as u64;
                            // `/*!` conditional comments are content to MySQL.
                            if bytes.get(i + 2) == Some(&b'!') {
                                if self.stmt_start.is_none() {
                                    self.stmt_start = Some(i);
                                }
                            }
                            i += 1;
                        } else {
                            if self.stmt_start.is_none() {
                                self.stmt_start = Some(i);
                            }
                        }
                    }
                    _ => {
                        if !b.is_ascii_whitespace() {
                            if self.stmt_start.is_none() {
                                self.stmt_start = Some(i);
                            }
                        }
                    }
                },
                LexState::SingleQuote | LexState::DoubleQuote => {
                    if self.escaped {
                        self.escaped = false;
                    } else if b == b'\\' {
                        self.escaped = true;
                    } else if (b == b'\'' && self.state == LexState::SingleQuote)
                        || (b == b'"' && self.state == LexState::DoubleQuote)
                    {
                        // A doubled quote re-enters the string on the next
                        // byte, which is equivalent for terminator purposes.
                        self.state = LexState::Normal;
                    }
                }
                LexState::Backtick => {
                    if b == b'`' {
                        self.state = LexState::Normal;
                    }
                }
                LexState::LineComment => {
                    if b == b'\n' {
                        self.state = LexState::Normal;
                    }
                }
                LexState::BlockComment => {
                    if b == b'*' {
                        if i + 1 >= len && !self.eof {
                            self.scan_pos = i;
                            return Ok(None);
                        }
                        if bytes.get(i + 1) == Some(&b'/') {
                            self.state = LexState::Normal;
                            i += 1;
                        }
                    }
                }
            }
            i += 1;
        }

        self.scan_pos = len;
        Ok(None)
    }

    fn mark_content(&mut self, i: usize) {
        if self.stmt_start.is_none() {
            self.stmt_start = Some(i);
        }
    }

    fn finish_at_eof(&mut self) -> Result<Option<Statement>> {
        self.done = true;
        match self.state {
            LexState::SingleQuote | LexState::DoubleQuote => Err(ConvertError::malformed(
                self.open_offset,
                "unterminated string literal",
            )),
            LexState::Backtick => Err(ConvertError::malformed(
                self.open_offset,
                "unterminated quoted identifier",
            )),
            LexState::BlockComment => Err(ConvertError::malformed(
                self.open_offset,
                "unterminated block comment",
            )),
            LexState::Normal | LexState::LineComment => match self.stmt_start {
                Some(start) => Err(ConvertError::malformed(
                    self.base_offset + start as u64,
                    "input ended mid-statement (missing ';')",
                )),
                None => Ok(None),
            },
        }
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_statement() {
            Ok(Some(stmt)) => Some(Ok(stmt)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

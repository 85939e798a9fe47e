//! Game record in PGN form.
//!
//! Each move carries exactly one comment (the agent's reasoning, or the
//! forced-move placeholder), written as a starting comment in front of the
//! move. Reading a record back attaches every comment to the move after it.

use chrono::NaiveDate;
use llmchess_core::{ChessError, GameBoard, GameResult, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::atomic_file::write_atomic;

const LINE_WIDTH: usize = 80;

const SEVEN_TAG_ROSTER: [(&str, &str); 7] = [
    ("Event", "?"),
    ("Site", "?"),
    ("Date", "????.??.??"),
    ("Round", "?"),
    ("White", "?"),
    ("Black", "?"),
    ("Result", "*"),
];

/// Write-once record of a finished (or abandoned) game.
///
/// Comment whitespace is not preserved: line breaks inside a comment become
/// single spaces when the movetext is wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    headers: Vec<(String, String)>,
    moves: Vec<String>,
    comments: Vec<String>,
    result: GameResult,
}

impl GameRecord {
    /// Creates a record with the seven-tag roster filled with placeholders.
    ///
    /// `moves` are SAN strings; `comments` must be parallel to them.
    pub fn new(moves: Vec<String>, comments: Vec<String>, result: GameResult) -> Result<Self> {
        if moves.len() != comments.len() {
            return Err(ChessError::record(format!(
                "{} moves but {} comments",
                moves.len(),
                comments.len()
            )));
        }
        let headers = SEVEN_TAG_ROSTER
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let mut record = Self {
            headers,
            moves,
            comments,
            result,
        };
        record.set_header("Result", result.as_pgn());
        Ok(record)
    }

    /// Sets a tag, replacing an existing one of the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        self.with_header("Date", format_date(date))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Renders headers, a blank line and the wrapped movetext.
    pub fn to_pgn(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.headers {
            let _ = writeln!(out, "[{} \"{}\"]", name, escape_header(value));
        }
        out.push('\n');

        let mut tokens = Vec::with_capacity(self.moves.len() * 3 + 1);
        let mut force_number = true;
        for (ply, (san, comment)) in self.moves.iter().zip(&self.comments).enumerate() {
            let comment = sanitize_comment(comment);
            if !comment.is_empty() {
                // Word by word, so long reasoning still wraps.
                tokens.push("{".to_string());
                tokens.extend(comment.split_whitespace().map(str::to_string));
                tokens.push("}".to_string());
                force_number = true;
            }
            let number = ply / 2 + 1;
            if ply % 2 == 0 {
                tokens.push(format!("{number}."));
            } else if force_number {
                tokens.push(format!("{number}..."));
            }
            tokens.push(san.clone());
            force_number = false;
        }
        tokens.push(self.result.as_pgn().to_string());

        out.push_str(&wrap_tokens(&tokens, LINE_WIDTH));
        out.push('\n');
        out
    }
}

/// PGN date tag value (`YYYY.MM.DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

fn escape_header(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn sanitize_comment(comment: &str) -> String {
    comment.replace('}', "").trim().to_string()
}

fn wrap_tokens(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        let len = token.chars().count();
        if line_len > 0 && line_len + 1 + len > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += len;
    }
    out
}

/// Parses a single-game PGN produced by [`GameRecord::to_pgn`] (or any
/// mainline-only PGN).
pub fn parse_record(text: &str) -> Result<GameRecord> {
    let mut headers = Vec::new();
    let mut movetext = String::new();
    let mut in_headers = true;

    for line in text.lines() {
        let trimmed = line.trim();
        if in_headers {
            if trimmed.starts_with('[') {
                headers.push(parse_header(trimmed)?);
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            in_headers = false;
        }
        movetext.push_str(line);
        movetext.push('\n');
    }

    let mut moves = Vec::new();
    let mut comments = Vec::new();
    let mut pending: Option<String> = None;
    let mut result = None;
    let mut chars = movetext.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut comment = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => comment.push(ch),
                        None => return Err(ChessError::record("unterminated comment")),
                    }
                }
                let comment = comment.split_whitespace().collect::<Vec<_>>().join(" ");
                pending = Some(match pending.take() {
                    Some(previous) if !previous.is_empty() => format!("{previous} {comment}"),
                    _ => comment.to_string(),
                });
            }
            ';' => {
                for ch in chars.by_ref() {
                    if ch == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {}
            c => {
                let mut token = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || next == '{' || next == ';' {
                        break;
                    }
                    token.push(next);
                    chars.next();
                }
                if let Some(token_result) = GameResult::from_pgn(&token) {
                    result = Some(token_result);
                    continue;
                }
                if token.starts_with('$') {
                    continue;
                }
                let san = strip_move_number(&token);
                if san.is_empty() {
                    continue;
                }
                moves.push(san.to_string());
                comments.push(pending.take().unwrap_or_default());
            }
        }
    }

    let result = result
        .or_else(|| {
            headers
                .iter()
                .find(|(name, _)| name == "Result")
                .and_then(|(_, value)| GameResult::from_pgn(value))
        })
        .unwrap_or(GameResult::Undecided);

    Ok(GameRecord {
        headers,
        moves,
        comments,
        result,
    })
}

fn parse_header(line: &str) -> Result<(String, String)> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ChessError::record(format!("malformed header: {line}")))?;
    let (name, raw_value) = inner
        .split_once(' ')
        .ok_or_else(|| ChessError::record(format!("malformed header: {line}")))?;
    let quoted = raw_value
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ChessError::record(format!("unquoted header value: {line}")))?;

    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                value.push(escaped);
            }
        } else {
            value.push(c);
        }
    }
    Ok((name.to_string(), value))
}

/// "12." -> "", "12...Nf6" -> "Nf6", "e4" -> "e4".
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < token.len() && rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

/// Replays the record's moves on a fresh board.
pub fn replay(record: &GameRecord) -> Result<GameBoard> {
    let mut board = GameBoard::new();
    for (ply, san) in record.moves().iter().enumerate() {
        let mv = board
            .parse_san(san)
            .map_err(|err| ChessError::record(format!("ply {}: {san}: {err}", ply + 1)))?;
        board
            .push(&mv)
            .map_err(|err| ChessError::record(format!("ply {}: {san}: {err}", ply + 1)))?;
    }
    Ok(board)
}

/// Writes the record to `path` atomically.
pub fn write_record(path: &Path, record: &GameRecord) -> Result<()> {
    write_atomic(path, &record.to_pgn())?;
    tracing::info!(path = %path.display(), moves = record.moves().len(), "game record written");
    Ok(())
}

pub fn read_record(path: &Path) -> Result<GameRecord> {
    let content = fs::read_to_string(path)?;
    parse_record(&content)
}

// Domain rules - Range text parsing and frame selection

use crate::domain::errors::*;
use crate::domain::model::*;

/// Parser for the user-facing time-range text.
///
/// One range per line, `START-END` or `START to END`. Each side is
/// `H:MM:SS`, `MM:SS` or a bare number of seconds. Blank lines are skipped.
/// Every bad line is reported; if any line fails no ranges are returned.
pub struct RangeParser;

impl RangeParser {
    /// Parse multi-line text into ranges, preserving line order
    pub fn parse(text: &str) -> Result<Vec<TimeRange>, DomainError> {
        let mut ranges = Vec::new();
        let mut errors = RangeParseErrors::default();

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                Ok(range) => ranges.push(range),
                Err(reason) => errors.push(number + 1, line, reason),
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }
        if ranges.is_empty() {
            return Err(DomainError::BadArgs("No time ranges given".to_string()));
        }
        Ok(ranges)
    }

    /// Parse a single trimmed, non-empty line
    pub fn parse_line(line: &str) -> Result<TimeRange, String> {
        let (start_token, end_token) = Self::split_line(line)?;

        let start = Self::parse_time_token(start_token).map_err(|e| format!("start {}", e))?;
        let end = Self::parse_time_token(end_token).map_err(|e| format!("end {}", e))?;

        TimeRange::new(start, end).map_err(|e| match e {
            DomainError::BadArgs(message) => message,
            other => other.to_string(),
        })
    }

    /// Split a line into start and end tokens.
    ///
    /// A whitespace-delimited `to` wins when present. Otherwise the first
    /// `-` separates, and only when the text before it is non-empty; a leading `-` or a second `-`
    /// means a negative value or an extra separator.
    fn split_line(line: &str) -> Result<(&str, &str), String> {
        if let Some((word_start, word_end)) = find_to_separator(line) {
            let left = line[..word_start].trim();
            let right = line[word_end..].trim();
            if left.is_empty() || right.is_empty() {
                return Err("expected START to END".to_string());
            }
            return Ok((left, right));
        }

        let pos = line
            .find('-')
            .ok_or_else(|| "missing '-' separator, expected START-END".to_string())?;
        let left = line[..pos].trim();
        let right = line[pos + 1..].trim();

        if left.is_empty() {
            return Err("start time is missing or negative".to_string());
        }
        if right.is_empty() {
            return Err("end time is missing".to_string());
        }
        if right.starts_with('-') {
            return Err("end time cannot be negative".to_string());
        }
        if right.contains('-') {
            return Err("more than one '-' separator".to_string());
        }
        Ok((left, right))
    }

    /// Parse one time expression to seconds.
    ///
    /// Colon forms are tried first (`MM:SS`, `HH:MM:SS`). Fields are not
    /// limited to 60, so `0:90` is 90 seconds. Otherwise the token must be
    /// a plain non-negative decimal number.
    pub fn parse_time_token(token: &str) -> Result<f64, String> {
        let token = token.trim();
        if token.is_empty() {
            return Err("time is empty".to_string());
        }
        if token.starts_with('-') {
            return Err(format!("time \"{}\" cannot be negative", token));
        }

        if token.contains(':') {
            return Self::parse_clock(token);
        }

        parse_decimal(token).ok_or_else(|| format!("time \"{}\" is not a number", token))
    }

    fn parse_clock(token: &str) -> Result<f64, String> {
        let fields: Vec<&str> = token.split(':').collect();
        if fields.len() != 2 && fields.len() != 3 {
            return Err(format!(
                "time \"{}\" must have 2 or 3 colon-separated fields",
                token
            ));
        }

        let (seconds_field, higher) = fields
            .split_last()
            .ok_or_else(|| format!("time \"{}\" is empty", token))?;

        let seconds = parse_decimal(seconds_field)
            .ok_or_else(|| format!("seconds \"{}\" in \"{}\" is not a number", seconds_field, token))?;

        let mut whole = 0.0;
        for field in higher {
            let value = parse_integer(field)
                .ok_or_else(|| format!("field \"{}\" in \"{}\" is not a whole number", field, token))?;
            whole = whole * 60.0 + value as f64;
        }
        Ok(whole * 60.0 + seconds)
    }
}

/// Byte span of a `to` separator with whitespace on both sides
fn find_to_separator(line: &str) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    (1..bytes.len().saturating_sub(2)).find_map(|i| {
        let word = &bytes[i..i + 2];
        (word.eq_ignore_ascii_case(b"to")
            && bytes[i - 1].is_ascii_whitespace()
            && bytes[i + 2].is_ascii_whitespace())
        .then_some((i, i + 2))
    })
}

fn parse_integer(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Digits with at most one decimal point; no sign, exponent or `inf`
fn parse_decimal(field: &str) -> Option<f64> {
    let digits = field.bytes().filter(u8::is_ascii_digit).count();
    let dots = field.bytes().filter(|b| *b == b'.').count();
    if digits == 0 || dots > 1 || digits + dots != field.len() {
        return None;
    }
    field.parse().ok()
}

/// Picks which decoded frame fills each output slot of a [`FrameWindow`].
///
/// Frames are pushed in decode order with their index `round(t * fps)`.
/// Every slot `k` in the window gets the latest pushed frame with index
/// `<= k`; slots before the first pushed frame get that first frame, and
/// [`finish`](FrameCursor::finish) pads the tail with the last one. The
/// total emitted is therefore exactly `window.frame_count()` once any
/// frame has been pushed.
#[derive(Debug)]
pub struct FrameCursor<T> {
    next: i64,
    end: i64,
    pending: Option<T>,
}

impl<T> FrameCursor<T> {
    pub fn new(window: FrameWindow) -> Self {
        Self {
            next: window.start_frame,
            end: window.end_frame,
            pending: None,
        }
    }

    /// All slots have been handed out
    pub fn is_done(&self) -> bool {
        self.next >= self.end
    }

    /// Offer a decoded frame. Returns a frame to write and its repeat count
    /// once a later frame proves it covers one or more slots.
    pub fn push(&mut self, index: i64, frame: T) -> Option<(T, u64)> {
        if self.is_done() {
            return None;
        }
        if index <= self.next || self.pending.is_none() {
            self.pending = Some(frame);
            return None;
        }

        let upto = index.min(self.end);
        let repeat = (upto - self.next) as u64;
        self.next = upto;
        let emit = self.pending.replace(frame);
        if self.is_done() {
            self.pending = None;
        }
        emit.map(|f| (f, repeat))
    }

    /// Flush the held frame across the remaining slots
    pub fn finish(self) -> Option<(T, u64)> {
        if self.is_done() {
            return None;
        }
        let repeat = (self.end - self.next) as u64;
        self.pending.map(|f| (f, repeat))
    }
}

#[cfg(test)]
mod tests;

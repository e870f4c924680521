//! `Range: bytes=...` parsing and resolution against a file size.

/// A single byte range as requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=start-end` or `bytes=start-`
    Bounded { start: u64, end: Option<u64> },
    /// `bytes=-length`, the last `length` bytes
    Suffix { length: u64 },
}

/// Inclusive byte span inside a file, always non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub start: u64,
    pub end: u64,
}

impl ByteSpan {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

impl RangeSpec {
    /// Parses a header value. Only one `bytes` range is understood; anything
    /// else (other units, multiple ranges, signs, inner spaces) is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let spec = value.trim().strip_prefix("bytes=")?;
        let (start, end) = spec.split_once('-')?;

        match (start.is_empty(), end.is_empty()) {
            (true, true) => None,
            (true, false) => Some(RangeSpec::Suffix { length: parse_position(end)? }),
            (false, _) => {
                let start = parse_position(start)?;
                let end = if end.is_empty() { None } else { Some(parse_position(end)?) };
                Some(RangeSpec::Bounded { start, end })
            }
        }
    }

    /// Resolves against a file of `size` bytes. An end past the file is
    /// clamped to the last byte; `None` means not satisfiable.
    pub fn resolve(&self, size: u64) -> Option<ByteSpan> {
        let last = size.checked_sub(1)?;

        match *self {
            RangeSpec::Bounded { start, end } => {
                let end = end.unwrap_or(last).min(last);
                (start <= end).then_some(ByteSpan { start, end })
            }
            RangeSpec::Suffix { length } => {
                if length == 0 {
                    return None;
                }
                Some(ByteSpan { start: size.saturating_sub(length), end: last })
            }
        }
    }
}

/// ASCII digits only. Values past `u64::MAX` saturate, so an oversized end
/// still means "to the end of the file".
fn parse_position(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

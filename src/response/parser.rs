//! incremental response parsing
//!
//! every function here consumes from the front of a buffer and returns
//! `Ok(None)` when the buffer ends before a complete element, leaving
//! the bytes in place so the caller can read more and retry
use bytes::{Buf, Bytes, BytesMut};

use crate::bytestr::ByteStr;
use crate::error::ProtocolError;
use crate::headers::Headers;

/// chunk sizes above this are treated as malformed
const MAX_CHUNK_SIZE: u64 = u64::MAX >> 1;

/// parse the status line, yielding the status code
///
/// the reason phrase is free text and is discarded
pub(crate) fn status_line(buf: &mut BytesMut) -> Result<Option<u16>, ProtocolError> {
    use ProtocolError::StatusLine;

    let Some(line) = take_line(buf) else {
        return Ok(None);
    };

    let rest = line
        .strip_prefix(b"HTTP/1.1 ")
        .or_else(|| line.strip_prefix(b"HTTP/1.0 "))
        .ok_or(StatusLine)?;

    let Some((digits, reason)) = rest.split_first_chunk::<3>() else {
        return Err(StatusLine);
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(StatusLine);
    }
    let status = digits.iter().fold(0u16, |n, d| n * 10 + u16::from(d - b'0'));
    if !(100..=599).contains(&status) {
        return Err(StatusLine);
    }
    match reason.first() {
        None | Some(b' ') => Ok(Some(status)),
        Some(_) => Err(StatusLine),
    }
}

/// one line of a header section
pub(crate) enum HeaderLine {
    /// a `name: value` field
    Field(ByteStr, ByteStr),
    /// the empty line closing the section
    End,
}

/// parse one header line
///
/// the name keeps its wire casing, surrounding whitespace is trimmed
/// from name and value, a non-empty line without `:` is an error
pub(crate) fn header_line(buf: &mut BytesMut) -> Result<Option<HeaderLine>, ProtocolError> {
    use ProtocolError::HeaderLine as Invalid;

    let Some(line) = take_line(buf) else {
        return Ok(None);
    };
    if line.is_empty() {
        return Ok(Some(HeaderLine::End));
    }

    let colon = line.iter().position(|&b| b == b':').ok_or(Invalid)?;
    let name = trim(line.slice(..colon));
    if name.is_empty() {
        return Err(Invalid);
    }
    let value = trim(line.slice(colon + 1..));

    let name = ByteStr::from_bytes(name).map_err(|_| Invalid)?;
    let value = ByteStr::from_bytes(value).map_err(|_| Invalid)?;
    Ok(Some(HeaderLine::Field(name, value)))
}

/// how a response body is delimited
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Framing {
    /// exactly this many bytes follow the header section
    Length(usize),
    /// chunked transfer coding
    Chunked,
    /// no framing header, the body runs to end of stream
    Eof,
}

/// decide body framing from the parsed headers
///
/// chunked transfer coding combined with any content length is
/// ambiguous and rejected, as are content lengths that disagree
pub(crate) fn framing(headers: &Headers) -> Result<Framing, ProtocolError> {
    let chunked = headers
        .get_all("transfer-encoding")
        .flat_map(|value| value.split(','))
        .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"));

    let mut length = None;
    for value in headers.get_all("content-length") {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::ContentLength);
        }
        let parsed: usize = value.parse().map_err(|_| ProtocolError::ContentLength)?;
        match length {
            None => length = Some(parsed),
            Some(seen) if seen == parsed => {}
            Some(_) => return Err(ProtocolError::Framing),
        }
    }

    match (chunked, length) {
        (true, Some(_)) => Err(ProtocolError::Framing),
        (true, None) => Ok(Framing::Chunked),
        (false, Some(len)) => Ok(Framing::Length(len)),
        (false, None) => Ok(Framing::Eof),
    }
}

/// parse a chunk size line, hex digits with extensions after `;` ignored
pub(crate) fn chunk_size(buf: &mut BytesMut) -> Result<Option<usize>, ProtocolError> {
    use ProtocolError::ChunkSize;

    let Some(line) = take_line(buf) else {
        return Ok(None);
    };

    let digits_len = line
        .iter()
        .position(|b| !b.is_ascii_hexdigit())
        .unwrap_or(line.len());
    if digits_len == 0 {
        return Err(ChunkSize);
    }
    match line.get(digits_len) {
        None | Some(b';') => {}
        Some(_) => return Err(ChunkSize),
    }

    // SAFETY: `is_ascii_hexdigit` is a subset of ascii
    let digits = unsafe { std::str::from_utf8_unchecked(&line[..digits_len]) };
    let size = u64::from_str_radix(digits, 16).map_err(|_| ChunkSize)?;
    if size > MAX_CHUNK_SIZE {
        return Err(ChunkSize);
    }
    usize::try_from(size).map(Some).map_err(|_| ChunkSize)
}

/// take a crlf terminated line off the buffer, without the crlf
fn take_line(buf: &mut BytesMut) -> Option<Bytes> {
    let at = buf.windows(2).position(|w| w == b"\r\n")?;
    let line = buf.split_to(at).freeze();
    buf.advance(2);
    Some(line)
}

/// strip ascii whitespace from both ends without copying
fn trim(bytes: Bytes) -> Bytes {
    let not_ws = |b: &u8| !b.is_ascii_whitespace();
    match (bytes.iter().position(not_ws), bytes.iter().rposition(not_ws)) {
        (Some(from), Some(to)) => bytes.slice(from..to + 1),
        _ => Bytes::new(),
    }
}

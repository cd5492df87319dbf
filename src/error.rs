//! error types
use std::io;

/// any failure surfaced by this crate
///
/// none of these are recovered internally, each one is reported to the
/// caller of the operation that hit it
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid server name: {0}")]
    ServerName(#[from] tokio_rustls::rustls::pki_types::InvalidDnsNameError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("connection closed before response complete")]
    Incomplete,
    #[error("connection is closed")]
    Closed,
    #[error("connection unusable after earlier failure")]
    Faulted,
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}

/// a violation of the http/1.1 response grammar
///
/// a connection that reported one of these stops accepting requests,
/// its read position can no longer be trusted
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed status line")]
    StatusLine,
    #[error("malformed header line")]
    HeaderLine,
    #[error("invalid content length")]
    ContentLength,
    #[error("malformed chunk size line")]
    ChunkSize,
    #[error("missing chunk delimiter")]
    ChunkDelimiter,
    #[error("conflicting body framing")]
    Framing,
}

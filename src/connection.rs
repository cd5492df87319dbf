//! connection lifecycle and the request cycle
use bytes::{Bytes, BytesMut};
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::bytestr::ByteStr;
use crate::error::{Error, ProtocolError};
use crate::headers::Headers;
use crate::request;
use crate::response::Response;
use crate::response::parser::{self, Framing, HeaderLine};
use crate::stream::Stream;

const BUFFER_CAP: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Open,
    /// an earlier cycle failed or was dropped mid flight, the stream
    /// position is unknown
    Faulted,
    Closed,
}

/// a single http/1.1 connection
///
/// drives one request/response cycle at a time, `request` holds the
/// exclusive borrow until the response is fully framed so overlapping
/// calls do not compile. a connection that failed mid cycle refuses
/// further requests, close it and create a new one instead
pub struct Connection<IO = Stream> {
    io: IO,
    host: ByteStr,
    buffer: BytesMut,
    state: State,
}

impl Connection {
    /// connect to `host`, with tls when `tls` is set
    ///
    /// `port` defaults to 443 with tls and 80 without
    pub async fn create(host: &str, port: Option<u16>, tls: bool) -> Result<Connection, Error> {
        let io = match tls {
            true => Stream::connect_tls(host, port.unwrap_or(443)).await?,
            false => Stream::connect(host, port.unwrap_or(80)).await?,
        };
        Ok(Connection::from_stream(io, ByteStr::from_slice(host)))
    }
}

impl<IO> Connection<IO>
where
    IO: AsyncRead + AsyncWrite + Unpin,
{
    /// wrap an established byte stream
    ///
    /// `host` feeds the synthesized `Host` header
    pub fn from_stream(io: IO, host: impl Into<ByteStr>) -> Connection<IO> {
        Connection {
            io,
            host: host.into(),
            buffer: BytesMut::with_capacity(BUFFER_CAP),
            state: State::Open,
        }
    }

    /// whether another request can be issued
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// perform one request/response cycle
    ///
    /// `headers` go on the wire in the given order, `Host`, `User-Agent`
    /// and `Content-Length` are appended when missing. resolves once the
    /// response body is fully framed, leaving the stream positioned at
    /// the first byte of the next response.
    ///
    /// a response with neither `Content-Length` nor chunked framing is
    /// read until end of stream and closes the connection afterward,
    /// nothing on the wire delimits it.
    ///
    /// a failure or a cancelled call mid cycle leaves the connection
    /// refusing further requests
    pub async fn request(
        &mut self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<Response, Error> {
        match self.state {
            State::Open => {}
            State::Faulted => return Err(Error::Faulted),
            State::Closed => return Err(Error::Closed),
        }

        let mut head = BytesMut::with_capacity(256);
        request::write(method, path, &self.host, headers, body, &mut head)?;

        // the wire position is unreliable from here until a full
        // response is framed, a dropped future included
        self.state = State::Faulted;

        self.io.write_all(&head).await?;
        trace!("{method} {path} sent, {} bytes", head.len());

        let response = self.read_response(method.eq_ignore_ascii_case("HEAD")).await?;

        if self.state == State::Faulted {
            self.state = State::Open;
        }
        Ok(response)
    }

    async fn read_response(&mut self, head: bool) -> Result<Response, Error> {
        let status = loop {
            match parser::status_line(&mut self.buffer)? {
                Some(status) => break status,
                None => self.fill().await?,
            }
        };

        let mut headers = Headers::with_capacity(8);
        loop {
            match parser::header_line(&mut self.buffer)? {
                Some(HeaderLine::Field(name, value)) => headers.push(name, value),
                Some(HeaderLine::End) => break,
                None => self.fill().await?,
            }
        }

        let framing = parser::framing(&headers)?;
        trace!("response {status}, {framing:?}");

        let body = match framing {
            // a head response advertises a body that is never sent
            _ if head => Bytes::new(),
            Framing::Length(len) => self.read_sized_body(len).await?,
            Framing::Chunked => self.read_chunked_body().await?,
            Framing::Eof => {
                let body = self.read_eof_body().await?;
                debug!("response without framing header, closing");
                self.close().await;
                body
            }
        };

        Ok(Response::new(status, headers, body))
    }

    async fn read_sized_body(&mut self, len: usize) -> Result<Bytes, Error> {
        while self.buffer.len() < len {
            self.fill().await?;
        }
        Ok(self.buffer.split_to(len).freeze())
    }

    async fn read_chunked_body(&mut self) -> Result<Bytes, Error> {
        let mut body = BytesMut::new();
        loop {
            let size = loop {
                match parser::chunk_size(&mut self.buffer)? {
                    Some(size) => break size,
                    None => self.fill().await?,
                }
            };

            if size == 0 {
                // trailer section, consumed and dropped
                loop {
                    match parser::header_line(&mut self.buffer)? {
                        Some(HeaderLine::End) => return Ok(body.freeze()),
                        Some(HeaderLine::Field(..)) => {}
                        None => self.fill().await?,
                    }
                }
            }

            while self.buffer.len() < size + 2 {
                self.fill().await?;
            }
            let mut chunk = self.buffer.split_to(size + 2);
            let delim = chunk.split_off(size);
            if &delim[..] != b"\r\n" {
                return Err(ProtocolError::ChunkDelimiter.into());
            }
            body.extend_from_slice(&chunk);
        }
    }

    /// body without framing, everything up to end of stream
    async fn read_eof_body(&mut self) -> Result<Bytes, Error> {
        while self.io.read_buf(&mut self.buffer).await? != 0 {}
        Ok(self.buffer.split().freeze())
    }

    /// read more bytes, end of stream mid response is an error
    async fn fill(&mut self) -> Result<(), Error> {
        match self.io.read_buf(&mut self.buffer).await? {
            0 => Err(Error::Incomplete),
            _ => Ok(()),
        }
    }

    /// close the connection, further requests fail
    ///
    /// idempotent, safe on every exit path
    pub async fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }
        self.state = State::Closed;
        self.buffer.clear();
        if let Err(err) = self.io.shutdown().await {
            debug!("shutdown: {err}");
        }
        trace!("connection closed");
    }
}

impl<IO> std::fmt::Debug for Connection<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

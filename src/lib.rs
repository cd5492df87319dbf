//! # husk
//!
//! minimal http/1.1 client: one connection, one request/response cycle
//! at a time, bodies framed by `Content-Length` or chunked transfer
//! coding, plain tcp or tls
//!
//! ```no_run
//! # async fn run() -> Result<(), husk::Error> {
//! let res = husk::get("example.com", "/", &[], None, None, true).await?;
//! println!("{} with {} body bytes", res.status(), res.body().len());
//! # Ok(())
//! # }
//! ```
//!
//! [`Connection`] keeps the socket alive across requests:
//!
//! ```no_run
//! # async fn run() -> Result<(), husk::Error> {
//! let mut conn = husk::Connection::create("example.com", None, true).await?;
//! let first = conn.request("GET", "/", &[], None).await?;
//! let second = conn.request("GET", "/about", &[], None).await?;
//! println!("{} then {}", first.status(), second.status());
//! conn.close().await;
//! # Ok(())
//! # }
//! ```
pub mod bytestr;
pub mod client;
pub mod connection;
pub mod error;
pub mod headers;
pub mod response;
pub mod stream;

mod request;

pub use bytestr::ByteStr;
pub use client::{delete, get, head, post, put, request};
pub use connection::Connection;
pub use error::{Error, ProtocolError};
pub use headers::Headers;
pub use response::Response;
pub use stream::Stream;

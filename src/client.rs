//! one shot request helpers
//!
//! each call opens its own connection, drives a single request/response
//! cycle and closes the connection on every exit path. calls share no
//! state, any number may run concurrently
use crate::connection::Connection;
use crate::error::Error;
use crate::response::Response;

/// perform a single request on a fresh connection
///
/// `port` defaults from `tls` (443 or 80)
pub async fn request(
    method: &str,
    host: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&[u8]>,
    port: Option<u16>,
    tls: bool,
) -> Result<Response, Error> {
    let mut conn = Connection::create(host, port, tls).await?;
    let result = conn.request(method, path, headers, body).await;
    conn.close().await;
    result
}

macro_rules! shortcut {
    ($($(#[$doc:meta])* $name:ident => $method:literal,)*) => {$(
        $(#[$doc])*
        pub async fn $name(
            host: &str,
            path: &str,
            headers: &[(&str, &str)],
            body: Option<&[u8]>,
            port: Option<u16>,
            tls: bool,
        ) -> Result<Response, Error> {
            request($method, host, path, headers, body, port, tls).await
        }
    )*};
}

shortcut! {
    /// `GET` on a fresh connection
    get => "GET",
    /// `HEAD` on a fresh connection, the response never carries a body
    head => "HEAD",
    /// `POST` on a fresh connection
    post => "POST",
    /// `PUT` on a fresh connection
    put => "PUT",
    /// `DELETE` on a fresh connection
    delete => "DELETE",
}

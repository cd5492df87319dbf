//! request serialization
use bytes::BytesMut;

use crate::error::Error;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// serialize one request into `buf`
///
/// writes the request line, the caller headers in their given order,
/// then `Host`, `User-Agent` and `Content-Length` when the caller did
/// not set them, the blank line, and the body bytes. a body of
/// `Some(b"")` still gets `Content-Length: 0`, `None` writes nothing
pub(crate) fn write(
    method: &str,
    path: &str,
    host: &str,
    headers: &[(&str, &str)],
    body: Option<&[u8]>,
    buf: &mut BytesMut,
) -> Result<(), Error> {
    check(method, path, headers)?;

    buf.extend_from_slice(method.as_bytes());
    buf.extend_from_slice(b" ");
    buf.extend_from_slice(path.as_bytes());
    buf.extend_from_slice(b" HTTP/1.1\r\n");

    let mut has_host = false;
    let mut has_agent = false;
    let mut has_len = false;
    for (name, value) in headers {
        has_host |= name.eq_ignore_ascii_case("host");
        has_agent |= name.eq_ignore_ascii_case("user-agent");
        has_len |= name.eq_ignore_ascii_case("content-length");
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    if !has_host {
        buf.extend_from_slice(b"Host: ");
        buf.extend_from_slice(host.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    if !has_agent {
        buf.extend_from_slice(b"User-Agent: ");
        buf.extend_from_slice(USER_AGENT.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    if let Some(body) = body
        && !has_len
    {
        buf.extend_from_slice(b"Content-Length: ");
        buf.extend_from_slice(itoa::Buffer::new().format(body.len()).as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");

    if let Some(body) = body {
        buf.extend_from_slice(body);
    }

    Ok(())
}

/// reject input that would corrupt the wire, before any byte is written
fn check(method: &str, path: &str, headers: &[(&str, &str)]) -> Result<(), Error> {
    use Error::InvalidRequest;

    if method.is_empty() || !method.bytes().all(is_token) {
        return Err(InvalidRequest("method is not an http token"));
    }
    if !(path.starts_with('/') || path.contains("://")) {
        return Err(InvalidRequest("path must start with '/' or be absolute-form"));
    }
    if path.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0' | b' ')) {
        return Err(InvalidRequest("path contains illegal bytes"));
    }
    for (name, value) in headers {
        if name.is_empty() || name.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0' | b':')) {
            return Err(InvalidRequest("header name contains illegal bytes"));
        }
        if value.bytes().any(|b| matches!(b, b'\r' | b'\n' | b'\0')) {
            return Err(InvalidRequest("header value contains illegal bytes"));
        }
    }
    Ok(())
}

/// tchar from rfc 9110
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

#[cfg(test)]
mod test {
    use super::write;
    use crate::error::Error;
    use bytes::BytesMut;

    fn serialize(
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = BytesMut::new();
        write(method, path, "example.com", headers, body, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn get_with_synthesized_headers() {
        let wire = serialize("GET", "/index.html", &[], None).unwrap();
        let expected = format!(
            "GET /index.html HTTP/1.1\r\nHost: example.com\r\nUser-Agent: husk/{}\r\n\r\n",
            env!("CARGO_PKG_VERSION"),
        );
        assert_eq!(wire, expected.as_bytes());
    }

    #[test]
    fn post_with_body_length() {
        let wire = serialize("POST", "/submit", &[("Accept", "*/*")], Some(b"hello")).unwrap();
        let wire = String::from_utf8(wire).unwrap();
        assert!(wire.starts_with("POST /submit HTTP/1.1\r\nAccept: */*\r\n"));
        assert!(wire.contains("\r\nContent-Length: 5\r\n"));
        assert!(wire.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn empty_body_still_has_length() {
        let wire = serialize("POST", "/submit", &[], Some(b"")).unwrap();
        let wire = String::from_utf8(wire).unwrap();
        assert!(wire.contains("\r\nContent-Length: 0\r\n"));
        assert!(wire.ends_with("\r\n\r\n"));
    }

    #[test]
    fn caller_headers_win_over_synthesis() {
        let wire = serialize(
            "PUT",
            "/up",
            &[("host", "other.test"), ("content-length", "3"), ("User-Agent", "probe")],
            Some(b"abc"),
        )
        .unwrap();
        let wire = String::from_utf8(wire).unwrap();
        assert!(wire.contains("host: other.test\r\n"));
        assert!(!wire.contains("Host: example.com"));
        assert!(!wire.contains("husk/"));
        // exactly the caller's length header
        assert_eq!(wire.matches("ontent-").count(), 1);
    }

    #[test]
    fn absolute_form_path_accepted() {
        assert!(serialize("GET", "http://example.com/x", &[], None).is_ok());
    }

    #[test]
    fn bad_input_rejected() {
        assert!(matches!(
            serialize("GET", "no-slash", &[], None),
            Err(Error::InvalidRequest(_)),
        ));
        assert!(matches!(
            serialize("GE T", "/", &[], None),
            Err(Error::InvalidRequest(_)),
        ));
        assert!(matches!(
            serialize("GET", "/", &[("X-Bad", "a\r\nX-Smuggled: b")], None),
            Err(Error::InvalidRequest(_)),
        ));
        assert!(matches!(
            serialize("GET", "/", &[("X:Bad", "v")], None),
            Err(Error::InvalidRequest(_)),
        ));
    }
}

#![forbid(unsafe_code)]

use crate::request::Request;

use std::str::FromStr;

use http::header::HOST;
use http::uri::Authority;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";

impl Request<()> {
    /// Builds a request context from an `http` request.
    ///
    /// Server-side requests usually carry an origin-form URI, so the URL is
    /// completed with the `Host` header (or `localhost`). A header that is
    /// not a bare authority is ignored; it never changes the routed path.
    pub fn from_http<B>(req: &http::Request<B>) -> Self {
        Self::from_http_with_data(req, ())
    }
}

impl<S> Request<S> {
    pub fn from_http_with_data<B>(req: &http::Request<B>, data: S) -> Self {
        Self::with_data(absolute_url(req), data).method(req.method().as_str())
    }
}

fn absolute_url<B>(req: &http::Request<B>) -> String {
    let uri = req.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let scheme = uri.scheme_str().unwrap_or(DEFAULT_SCHEME);
    let host = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| req.headers().get(HOST).and_then(host_authority))
        .unwrap_or(DEFAULT_HOST);
    let path_and_query = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    format!("{}://{}{}", scheme, host, path_and_query)
}

fn host_authority(value: &http::HeaderValue) -> Option<&str> {
    let host = value.to_str().ok()?;
    match Authority::from_str(host) {
        Ok(a) if a.as_str() == host && !host.contains('@') => Some(host),
        _ => None,
    }
}

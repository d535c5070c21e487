use crate::params::{Params, Query};

/// The request context handed to every handler of a chain.
///
/// `params` and `query` are filled in by the router each time a route
/// matches. Handlers may change any field; later handlers see the change.
#[derive(Debug, Clone, Default)]
pub struct Request<S = ()> {
    pub method: Option<String>,
    pub url: String,
    pub params: Params,
    pub query: Query,
    pub data: S,
}

impl Request<()> {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_data(url, ())
    }
}

impl<S> Request<S> {
    pub fn with_data(url: impl Into<String>, data: S) -> Self {
        Self {
            method: None,
            url: url.into(),
            params: Params::new(),
            query: Query::new(),
            data,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

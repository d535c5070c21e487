use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("method name {0:?} is reserved for dispatch")]
    ReservedMethod(String),

    #[error("method name can not be empty")]
    EmptyMethod,

    #[error("a route needs at least one handler")]
    EmptyChain,

    #[error("duplicate capture name {0:?}")]
    DuplicateParam(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid request url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),
}

//! A tiny request router: ordered routes per method, each with a chain of
//! handlers that runs until one of them returns a result.
//!
//! ```
//! use nuclear_dispatch::{handler, Outcome, Request, Router};
//!
//! let mut router: Router<String> = Router::with_base("/api");
//! router.get(
//!     "/todos/:id?",
//!     vec![handler::sync(|req| {
//!         let id = req.params.get("id").unwrap_or("all");
//!         Ok(Outcome::Done(format!("todos: {}", id)))
//!     })],
//! );
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let mut req = Request::new("https://example.com/api/todos/13");
//! let ret = rt.block_on(router.handle(&mut req)).unwrap();
//! assert_eq!(ret.as_deref(), Some("todos: 13"));
//! ```

#![deny(unsafe_code)]

mod error;
mod params;
mod pattern;
mod request;
mod router;

pub mod handler;

#[cfg(feature = "http")]
mod http_request;

pub use self::error::{BoxError, DispatchError, RouterError};
pub use self::handler::{BoxFuture, BoxHandler, Handler, HandlerResult, Outcome};
pub use self::params::{Params, Query};
pub use self::pattern::PathPattern;
pub use self::request::Request;
pub use self::router::{Router, RouterOptions};

/// Builds a [`Router`] from a route table.
///
/// ```
/// use nuclear_dispatch::{handler, router, Outcome, Router};
///
/// let router: Router<u32> = router! {
///     base = "/v1";
///     GET "/info" => [handler::sync(|_| Ok(Outcome::Done(1)))],
///     POST "/info" => [
///         handler::sync(|_| Ok(Outcome::Continue)),
///         handler::sync(|_| Ok(Outcome::Done(2))),
///     ],
/// };
/// assert_eq!(router.len(), 2);
/// ```
#[macro_export]
macro_rules! router {
    {base = $base:expr; $($method:ident $pattern:expr => [$($handler:expr),+ $(,)?]),+ $(,)?} => {{
        let mut __router = $crate::Router::with_base($base);
        $(__router.on(stringify!($method), $pattern, vec![$($handler),+]);)+
        __router
    }};

    {$($method:ident $pattern:expr => [$($handler:expr),+ $(,)?]),+ $(,)?} => {{
        let mut __router = $crate::Router::new();
        $(__router.on(stringify!($method), $pattern, vec![$($handler),+]);)+
        __router
    }};
}

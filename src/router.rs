use crate::error::{BoxError, DispatchError, RouterError};
use crate::handler::{BoxFuture, BoxHandler, Handler, HandlerResult, Outcome};
use crate::params::Query;
use crate::pattern::PathPattern;
use crate::request::Request;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

const DEFAULT_METHOD: &str = "get";
const RESERVED_METHODS: &[&str] = &["handle"];

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Prepended to every template at registration.
    pub base: String,
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

/// An ordered route table with a handler chain per route.
///
/// Routes are tried in registration order, per method. Registration takes
/// `&mut self`; once every route is in place, share the router with
/// [`Router::into_shared`] and dispatch from as many tasks as needed.
pub struct Router<T, S = ()> {
    base: Box<str>,
    method_map: HashMap<Box<str>, Vec<Route<T, S>>>,
}

struct Route<T, S> {
    pattern: PathPattern,
    handlers: Box<[BoxHandler<T, S>]>,
}

impl<T, S> Router<T, S> {
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self::with_options(RouterOptions::new().base(base))
    }

    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            base: options.base.into(),
            method_map: HashMap::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.method_map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patterns registered for `method`, in match order.
    pub fn routes<'a>(&'a self, method: &str) -> impl Iterator<Item = &'a PathPattern> + 'a {
        let key = method.to_ascii_lowercase();
        self.method_map
            .get(key.as_str())
            .into_iter()
            .flatten()
            .map(|route| &route.pattern)
    }

    /// Registers a route.
    ///
    /// # Panics
    /// Panics if the method name is reserved or empty, if `handlers` is
    /// empty, or if the template can not be compiled. See [`Router::try_on`].
    pub fn on(
        &mut self,
        method: impl AsRef<str>,
        template: &str,
        handlers: Vec<BoxHandler<T, S>>,
    ) -> &mut Self {
        if let Err(e) = self.insert_route(method.as_ref(), template, handlers) {
            panic!("{}: pattern = {:?}", e, template);
        }
        self
    }

    pub fn try_on(
        &mut self,
        method: impl AsRef<str>,
        template: &str,
        handlers: Vec<BoxHandler<T, S>>,
    ) -> Result<&mut Self, RouterError> {
        self.insert_route(method.as_ref(), template, handlers)?;
        Ok(self)
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Matches `req` against the routes of its method and runs their
    /// chains until a handler returns [`Outcome::Done`].
    ///
    /// `Ok(None)` means nothing produced a result; building a "not found"
    /// response is up to the caller.
    pub async fn handle(&self, req: &mut Request<S>) -> Result<Option<T>, DispatchError> {
        let method = match req.method.as_deref() {
            Some(m) => m.to_ascii_lowercase(),
            None => DEFAULT_METHOD.to_owned(),
        };

        let url = match Url::parse(&req.url) {
            Ok(u) => u,
            Err(source) => {
                return Err(DispatchError::InvalidUrl {
                    url: req.url.clone(),
                    source,
                })
            }
        };

        let routes = match self.method_map.get(method.as_str()) {
            Some(r) => r,
            None => {
                debug!(method = %method, url = %req.url, "no routes for method");
                return Ok(None);
            }
        };

        let path = url.path();
        let query = Query::from_url(&url);

        for route in routes.iter() {
            let params = match route.pattern.captures(path) {
                Some(p) => p,
                None => continue,
            };

            trace!(method = %method, path, pattern = %route.pattern, "route matched");

            req.params = params;
            req.query = query.clone();

            for (i, handler) in route.handlers.iter().enumerate() {
                let outcome = handler.call(req).await.map_err(DispatchError::Handler)?;
                if let Outcome::Done(value) = outcome {
                    trace!(pattern = %route.pattern, handler = i, "chain finished with a result");
                    return Ok(Some(value));
                }
            }
        }

        debug!(method = %method, path, "no handler produced a result");
        Ok(None)
    }
}

impl<T, S> Router<T, S>
where
    T: Send + 'static,
    S: Send + 'static,
{
    /// Turns the router into a handler, for mounting under a wildcard
    /// route of another router.
    pub fn into_handler(self) -> BoxHandler<T, S> {
        Arc::new(self)
    }
}

impl<T, S> Router<T, S> {
    fn access_routes(&mut self, method: String) -> &mut Vec<Route<T, S>> {
        self.method_map.entry(method.into()).or_insert_with(Vec::new)
    }

    fn insert_route(
        &mut self,
        method: &str,
        template: &str,
        handlers: Vec<BoxHandler<T, S>>,
    ) -> Result<(), RouterError> {
        let method = method.to_ascii_lowercase();
        if method.is_empty() {
            return Err(RouterError::EmptyMethod);
        }
        if RESERVED_METHODS.contains(&method.as_str()) {
            return Err(RouterError::ReservedMethod(method));
        }
        if handlers.is_empty() {
            return Err(RouterError::EmptyChain);
        }

        let pattern = if self.base.is_empty() {
            PathPattern::compile(template)?
        } else {
            PathPattern::compile(&format!("{}{}", self.base, template))?
        };

        debug!(method = %method, pattern = %pattern, handlers = handlers.len(), "route registered");

        self.access_routes(method).push(Route {
            pattern,
            handlers: handlers.into_boxed_slice(),
        });
        Ok(())
    }
}

macro_rules! define_method {
    ($name:ident, $method:expr) => {
        pub fn $name(&mut self, template: &str, handlers: Vec<BoxHandler<T, S>>) -> &mut Self {
            self.on($method, template, handlers)
        }
    };
}

impl<T, S> Router<T, S> {
    define_method!(get, "get");
    define_method!(post, "post");
    define_method!(put, "put");
    define_method!(delete, "delete");
    define_method!(head, "head");
    define_method!(options, "options");
    define_method!(connect, "connect");
    define_method!(patch, "patch");
    define_method!(trace, "trace");
}

impl<T, S> Handler<T, S> for Router<T, S>
where
    T: Send + 'static,
    S: Send + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>> {
        Box::pin(async move {
            match self.handle(req).await {
                Ok(ret) => Ok(Outcome::from(ret)),
                Err(e) => Err(Box::new(e) as BoxError),
            }
        })
    }
}

impl<T, S> Default for Router<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> fmt::Debug for Router<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (method, routes) in &self.method_map {
            let templates: Vec<&str> = routes.iter().map(|r| r.pattern.template()).collect();
            map.entry(method, &templates);
        }
        map.finish()
    }
}

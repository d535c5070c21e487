use crate::error::BoxError;
use crate::request::Request;

use std::future::{self, Future};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type HandlerResult<T> = Result<Outcome<T>, BoxError>;

pub type BoxHandler<T, S = ()> = Arc<dyn Handler<T, S>>;

/// What a handler produced.
///
/// `Done` ends the chain and the whole dispatch. `Continue` hands the
/// request to the next handler, or to the next matching route once the
/// chain is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Continue,
    Done(T),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Continue => None,
            Self::Done(t) => Some(t),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(x: Option<T>) -> Self {
        match x {
            Some(t) => Self::Done(t),
            None => Self::Continue,
        }
    }
}

pub trait Handler<T, S = ()>: Send + Sync {
    fn call<'a>(&'a self, req: &'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>>;
}

pub struct SyncFn<F, S> {
    f: F,
    _marker: PhantomData<fn(S)>,
}

impl<T, S, F> Handler<T, S> for SyncFn<F, S>
where
    F: Fn(&mut Request<S>) -> HandlerResult<T> + Send + Sync,
    T: Send + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>> {
        Box::pin(future::ready((self.f)(req)))
    }
}

pub struct AsyncFn<F, S> {
    f: F,
    _marker: PhantomData<fn(S)>,
}

impl<T, S, F> Handler<T, S> for AsyncFn<F, S>
where
    F: for<'a> Fn(&'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>> + Send + Sync,
{
    fn call<'a>(&'a self, req: &'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>> {
        (self.f)(req)
    }
}

/// Wraps a synchronous function as a handler.
pub fn sync<T, S, F>(f: F) -> BoxHandler<T, S>
where
    F: Fn(&mut Request<S>) -> HandlerResult<T> + Send + Sync + 'static,
    T: Send + 'static,
    S: 'static,
{
    Arc::new(SyncFn {
        f,
        _marker: PhantomData,
    })
}

/// Wraps a function returning a boxed future as a handler.
///
/// ```
/// use nuclear_dispatch::{handler, BoxFuture, HandlerResult, Outcome, Request};
///
/// fn load<'a>(req: &'a mut Request) -> BoxFuture<'a, HandlerResult<String>> {
///     Box::pin(async move {
///         let id = req.params.get("id").unwrap_or("none");
///         Ok(Outcome::Done(format!("todo {}", id)))
///     })
/// }
///
/// let h = handler::from_async(load);
/// # drop(h);
/// ```
pub fn from_async<T, S, F>(f: F) -> BoxHandler<T, S>
where
    F: for<'a> Fn(&'a mut Request<S>) -> BoxFuture<'a, HandlerResult<T>> + Send + Sync + 'static,
    T: 'static,
    S: 'static,
{
    Arc::new(AsyncFn {
        f,
        _marker: PhantomData,
    })
}

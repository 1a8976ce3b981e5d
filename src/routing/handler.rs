//! Business handlers.
//!
//! # Design Decisions
//! - One canonical shape: an async function from [`MatchedRequest`] to [`Reply`]
//! - Synchronous and `Result`-returning handlers are adapted at construction,
//!   the dispatcher only ever sees the canonical shape

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::route::{Reply, Route};

use super::matcher::MatchedRequest;

type HandlerFn = dyn Fn(MatchedRequest) -> BoxFuture<'static, Reply> + Send + Sync;

/// Shared, type-erased handler.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(MatchedRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Reply> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |request| f(request).boxed()),
        }
    }

    /// Wrap an async handler whose failure branch is also a reply.
    pub fn from_result<F, Fut>(f: F) -> Self
    where
        F: Fn(MatchedRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, Reply>> + Send + 'static,
    {
        Self::new(move |request| f(request).map(flatten))
    }

    /// Wrap a synchronous handler.
    pub fn pure<F>(f: F) -> Self
    where
        F: Fn(MatchedRequest) -> Reply + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |request| future::ready(f(request)).boxed()),
        }
    }

    /// Wrap a synchronous handler returning either branch.
    pub fn pure_result<F>(f: F) -> Self
    where
        F: Fn(MatchedRequest) -> Result<Reply, Reply> + Send + Sync + 'static,
    {
        Self::pure(move |request| flatten(f(request)))
    }

    pub fn call(&self, request: MatchedRequest) -> BoxFuture<'static, Reply> {
        (self.inner)(request)
    }
}

fn flatten(result: Result<Reply, Reply>) -> Reply {
    result.unwrap_or_else(|reply| reply)
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// A route paired with the handler that serves it.
#[derive(Debug, Clone)]
pub struct RouteWithHandler {
    pub route: Route,
    pub handler: Handler,
}

impl RouteWithHandler {
    pub fn new(route: Route, handler: Handler) -> Self {
        Self { route, handler }
    }
}

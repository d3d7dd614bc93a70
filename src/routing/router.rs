//! Route registration and lookup.
//!
//! # Responsibilities
//! - Collect global middleware and routes at startup (builder)
//! - Store routes in registration order
//! - Look up the first route matching method and path
//!
//! # Design Decisions
//! - Append-only; routes are never removed or reordered
//! - First registered match wins, no specificity ranking
//! - Frozen by ownership: `Server::new` consumes the builder
//! - O(n) scan (acceptable for typical route counts)

use std::collections::HashMap;
use std::fmt;

use crate::handler::{BoxFuture, Handler, HandlerResult};
use crate::http::{RequestContext, ResponseContext};
use crate::middleware::Middleware;
use crate::routing::matcher::PathPattern;

/// Methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered route.
pub struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    middlewares: Vec<Middleware>,
    handler: Handler,
}

impl Route {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// Ordered route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// First route whose method equals `method` and whose pattern matches `path`.
    pub fn lookup(&self, method: &str, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        self.routes
            .iter()
            .filter(|route| route.method.as_str() == method)
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }
}

/// Builder for the route table and global middleware.
///
/// ```ignore
/// let app = Router::new()
///     .use_middleware(request_logger())
///     .get("/api/testingroutify", testing)
///     .get_with("/api/users/:id", [auth()], get_user)
///     .post("/api/users", create_user);
/// ```
#[derive(Default)]
pub struct Router {
    table: RouteTable,
    global: Vec<Middleware>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table)
            .field("global_middlewares", &self.global.len())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a global middleware. Runs for every request, before route lookup.
    pub fn use_middleware(mut self, middleware: Middleware) -> Self {
        self.global.push(middleware);
        self
    }

    /// Register a route with its own middleware, executed in the order given.
    pub fn route(
        mut self,
        method: HttpMethod,
        path: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        handler: Handler,
    ) -> Self {
        let route = Route {
            method,
            pattern: PathPattern::new(path),
            middlewares: middlewares.into_iter().collect(),
            handler,
        };
        tracing::debug!(
            method = %route.method,
            path = %route.pattern,
            middlewares = route.middlewares.len(),
            "Route registered"
        );
        self.table.push(route);
        self
    }

    pub fn get<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Get, path, Vec::new(), crate::handler::handler(handler))
    }

    pub fn get_with<F>(
        self,
        path: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        handler: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Get, path, middlewares, crate::handler::handler(handler))
    }

    pub fn post<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Post, path, Vec::new(), crate::handler::handler(handler))
    }

    pub fn post_with<F>(
        self,
        path: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        handler: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Post, path, middlewares, crate::handler::handler(handler))
    }

    pub fn put<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Put, path, Vec::new(), crate::handler::handler(handler))
    }

    pub fn put_with<F>(
        self,
        path: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        handler: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Put, path, middlewares, crate::handler::handler(handler))
    }

    pub fn delete<F>(self, path: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Delete, path, Vec::new(), crate::handler::handler(handler))
    }

    pub fn delete_with<F>(
        self,
        path: &str,
        middlewares: impl IntoIterator<Item = Middleware>,
        handler: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.route(HttpMethod::Delete, path, middlewares, crate::handler::handler(handler))
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Split into the frozen route table and global chain.
    pub(crate) fn into_parts(self) -> (RouteTable, Vec<Middleware>) {
        (self.table, self.global)
    }
}

//! Route table module
//!
//! Exact-match dispatch from (method, path) to a named handler target.

use hyper::Method;

/// Handler operations a route can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// GET: render the empty greeting form
    GreetingForm,
    /// POST: accept a submitted greeting
    GreetingSubmit,
}

/// A single route binding
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub target: RouteTarget,
}

/// Route table, matched in registration order
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table with the application's route bindings
    pub fn with_defaults() -> Self {
        let mut table = Self { routes: Vec::new() };
        table.register(Method::GET, "/greeting2", RouteTarget::GreetingForm);
        table.register(Method::POST, "/greeting2", RouteTarget::GreetingSubmit);
        table
    }

    fn register(&mut self, method: Method, path: &'static str, target: RouteTarget) {
        self.routes.push(Route {
            method,
            path,
            target,
        });
    }

    /// Find the target bound to this method and path (exact match)
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteTarget> {
        self.routes
            .iter()
            .find(|route| route.method == *method && route.path == path)
            .map(|route| route.target)
    }

    /// Methods registered for a path, in registration order
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.routes
            .iter()
            .filter(|route| route.path == path)
            .map(|route| route.method.clone())
            .collect()
    }

    /// Value for the `Allow` response header, e.g. "GET, POST"
    pub fn allow_header(&self, path: &str) -> String {
        self.allowed_methods(path)
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

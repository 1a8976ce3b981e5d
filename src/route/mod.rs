//! Route description subsystem.
//!
//! # Responsibilities
//! - Describe one endpoint as immutable data: method, path items, four input
//!   validators, a response contract and documentation text
//! - Merge single-fragment routes into complete routes
//!
//! # Data Flow
//! ```text
//! fragments.rs (get(), lit("user"), param("id", ..), response(200, ..))
//!     → Route::combine (left fold)
//!     → Route (read by routing::matcher and openapi::document)
//! ```
//!
//! # Design Decisions
//! - `combine` is associative with `Route::empty()` as identity
//! - Method is right-biased, paths and text concatenate, validators AND,
//!   response contracts OR
//! - Routes are never executed; they are shared read-only after startup

pub mod fragments;
pub mod item;
pub mod method;
pub mod response;
pub mod validator;

use std::iter::Sum;
use std::ops::Add;

pub use fragments::*;
pub use item::{openapi_path, show_route_items, RouteItem};
pub use method::{Method, UnknownMethod};
pub use response::{respond, Reply, ResponseBranch, ResponseContract, ResponseMetadata};
pub use validator::Validator;

/// An endpoint description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    method: Option<Method>,
    parts: Vec<RouteItem>,
    params: Validator,
    query: Validator,
    data: Validator,
    headers: Validator,
    response: ResponseContract,
    description: Vec<String>,
    summary: Vec<String>,
}

impl Route {
    /// The identity route: matches `/` with any method and declares nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge two routes; `other` is applied after `self`.
    pub fn combine(self, other: Route) -> Route {
        let mut parts = self.parts;
        parts.extend(other.parts);
        let mut description = self.description;
        description.extend(other.description);
        let mut summary = self.summary;
        summary.extend(other.summary);

        Route {
            method: other.method.or(self.method),
            parts,
            params: self.params.and(other.params),
            query: self.query.and(other.query),
            data: self.data.and(other.data),
            headers: self.headers.and(other.headers),
            response: self.response.or(other.response),
            description,
            summary,
        }
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn parts(&self) -> &[RouteItem] {
        &self.parts
    }

    pub fn params(&self) -> &Validator {
        &self.params
    }

    pub fn query(&self) -> &Validator {
        &self.query
    }

    pub fn data(&self) -> &Validator {
        &self.data
    }

    pub fn headers(&self) -> &Validator {
        &self.headers
    }

    pub fn response(&self) -> &ResponseContract {
        &self.response
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn summary(&self) -> &[String] {
        &self.summary
    }

    /// `/user/:id`
    pub fn show_path(&self) -> String {
        show_route_items(&self.parts)
    }

    pub(crate) fn with_method(method: Method) -> Self {
        Route {
            method: Some(method),
            ..Self::default()
        }
    }

    pub(crate) fn with_parts(parts: Vec<RouteItem>) -> Self {
        Route {
            parts,
            ..Self::default()
        }
    }

    pub(crate) fn with_params(params: Validator) -> Self {
        Route {
            params,
            ..Self::default()
        }
    }

    pub(crate) fn with_query(query: Validator) -> Self {
        Route {
            query,
            ..Self::default()
        }
    }

    pub(crate) fn with_data(data: Validator) -> Self {
        Route {
            data,
            ..Self::default()
        }
    }

    pub(crate) fn with_headers(headers: Validator) -> Self {
        Route {
            headers,
            ..Self::default()
        }
    }

    pub(crate) fn with_response(response: ResponseContract) -> Self {
        Route {
            response,
            ..Self::default()
        }
    }

    pub(crate) fn with_description(text: String) -> Self {
        Route {
            description: vec![text],
            ..Self::default()
        }
    }

    pub(crate) fn with_summary(text: String) -> Self {
        Route {
            summary: vec![text],
            ..Self::default()
        }
    }
}

impl Add for Route {
    type Output = Route;

    fn add(self, rhs: Route) -> Route {
        self.combine(rhs)
    }
}

impl Sum for Route {
    fn sum<I: Iterator<Item = Route>>(iter: I) -> Route {
        iter.fold(Route::empty(), Route::combine)
    }
}

/// Fold fragments left to right into one route.
pub fn make_route(fragments: impl IntoIterator<Item = Route>) -> Route {
    fragments.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    fn sample_fragments() -> Vec<Route> {
        vec![
            get(),
            lit("user"),
            param("id", codec::number_from_string()),
            query("tag", codec::string()),
            header("X-Session", codec::string()),
            post(),
            data(codec::record([("name", codec::string())])),
            response(200, codec::string()),
            response(404, codec::literal("missing")),
            description("Fetch a user"),
            summary("user"),
        ]
    }

    #[test]
    fn test_identity() {
        for fragment in sample_fragments() {
            assert_eq!(Route::empty().combine(fragment.clone()), fragment);
            assert_eq!(fragment.clone().combine(Route::empty()), fragment);
        }
    }

    #[test]
    fn test_associativity() {
        let fragments = sample_fragments();
        for a in &fragments {
            for b in &fragments {
                for c in &fragments {
                    let left = a.clone().combine(b.clone()).combine(c.clone());
                    let right = a.clone().combine(b.clone().combine(c.clone()));
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn test_method_last_defined_wins() {
        assert_eq!((get() + post()).method(), Some(Method::Post));
        assert_eq!((post() + lit("x")).method(), Some(Method::Post));
        assert_eq!(lit("x").method(), None);
    }

    #[test]
    fn test_parts_and_text_concatenate() {
        let route = make_route([
            lit("api"),
            description("first"),
            param("id", codec::string()),
            description("second"),
            summary("s"),
        ]);
        assert_eq!(route.show_path(), "/api/:id");
        assert_eq!(route.description(), ["first", "second"]);
        assert_eq!(route.summary(), ["s"]);
    }

    #[test]
    fn test_make_route_matches_operator_chain() {
        let folded = make_route(sample_fragments());
        let chained = sample_fragments().into_iter().reduce(|a, b| a + b).unwrap();
        assert_eq!(folded, chained);
        assert!(folded.response().is_present());
        assert_eq!(folded.response().branches().len(), 2);
    }
}

//! Path segment descriptors.

use std::fmt;

/// One segment of a route path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteItem {
    /// Fixed text, compared case-insensitively.
    Literal(String),
    /// Captures the segment under the given name.
    Param(String),
}

impl RouteItem {
    pub fn literal(text: impl Into<String>) -> Self {
        RouteItem::Literal(text.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        RouteItem::Param(name.into())
    }

    /// Segment as written in an OpenAPI path template.
    pub fn to_openapi(&self) -> String {
        match self {
            RouteItem::Literal(text) => text.clone(),
            RouteItem::Param(name) => format!("{{{name}}}"),
        }
    }
}

impl fmt::Display for RouteItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteItem::Literal(text) => write!(f, "{text}"),
            RouteItem::Param(name) => write!(f, ":{name}"),
        }
    }
}

/// Render items as `/users/:id`.
pub fn show_route_items(items: &[RouteItem]) -> String {
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("/{}", parts.join("/"))
}

/// Render items as `/users/{id}`.
pub fn openapi_path(items: &[RouteItem]) -> String {
    let parts: Vec<String> = items.iter().map(RouteItem::to_openapi).collect();
    format!("/{}", parts.join("/"))
}

//! Single-fragment route constructors.
//!
//! Each function returns a [`Route`] with exactly one field populated, ready
//! to be merged with [`Route::combine`], `+` or [`make_route`](super::make_route).

use crate::codec::{self, SharedCodec};

use super::{Method, ResponseContract, ResponseMetadata, Route, RouteItem, Validator};

pub fn get() -> Route {
    Route::with_method(Method::Get)
}

pub fn post() -> Route {
    Route::with_method(Method::Post)
}

pub fn put() -> Route {
    Route::with_method(Method::Put)
}

pub fn patch() -> Route {
    Route::with_method(Method::Patch)
}

pub fn delete() -> Route {
    Route::with_method(Method::Delete)
}

pub fn head() -> Route {
    Route::with_method(Method::Head)
}

/// One literal path segment.
pub fn lit(text: impl Into<String>) -> Route {
    Route::with_parts(vec![RouteItem::literal(text)])
}

/// One captured path segment, decoded by `decoder` under `name`.
pub fn param(name: impl Into<String>, decoder: SharedCodec) -> Route {
    let name = name.into();
    Route::with_parts(vec![RouteItem::param(name.clone())])
        .combine(Route::with_params(Validator::new(codec::record([(name, decoder)]))))
}

/// Parse a template such as `/users/:id/info`. Captures decode as strings.
pub fn path(template: &str) -> Route {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => param(name, codec::string()),
            None => lit(segment),
        })
        .sum()
}

/// A multi-valued query key; every value is decoded by `item`.
pub fn query(name: impl Into<String>, item: SharedCodec) -> Route {
    Route::with_query(Validator::new(codec::record([(name.into(), codec::array(item))])))
}

/// A request header. Names are matched lowercased.
pub fn header(name: impl Into<String>, decoder: SharedCodec) -> Route {
    let name: String = name.into();
    Route::with_headers(Validator::new(codec::record([(name.to_lowercase(), decoder)])))
}

/// Request body validator.
pub fn data(codec: SharedCodec) -> Route {
    Route::with_data(Validator::new(codec))
}

/// Validator over the whole path-parameter map.
pub fn validate_params(codec: SharedCodec) -> Route {
    Route::with_params(Validator::new(codec))
}

/// Validator over the whole query map (`key -> [values]`).
pub fn validate_query(codec: SharedCodec) -> Route {
    Route::with_query(Validator::new(codec))
}

/// Validator over the whole lowercased header map.
pub fn validate_headers(codec: SharedCodec) -> Route {
    Route::with_headers(Validator::new(codec))
}

pub fn response(code: u16, codec: SharedCodec) -> Route {
    Route::with_response(ResponseContract::new(code, codec))
}

pub fn response_with(code: u16, codec: SharedCodec, metadata: ResponseMetadata) -> Route {
    Route::with_response(ResponseContract::with_metadata(code, codec, metadata))
}

pub fn description(text: impl Into<String>) -> Route {
    Route::with_description(text.into())
}

pub fn summary(text: impl Into<String>) -> Route {
    Route::with_summary(text.into())
}

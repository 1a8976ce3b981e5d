//! Document assembly.
//!
//! # Data Flow
//! ```text
//! RouteTable
//!     → for each route (registration order):
//!         path template + method key → Operation
//!         params / query / header validators → parameters
//!         body validator → requestBody
//!         response contract → responses (walker.rs)
//!     → shared SchemaRegistry → components.schemas
//!     → OpenApiDocument → JSON
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codec::Shape;
use crate::route::{openapi_path, Method, Route, RouteItem, Validator};
use crate::routing::RouteTable;

use super::types::{
    Components, Info, MediaType, OpenApiDocument, Operation, Parameter, ParameterLocation,
    RequestBody, OPENAPI_VERSION,
};
use super::walker::{describe, describe_responses, SchemaError, SchemaRegistry};

/// Build the OpenAPI document for a route table.
pub fn document(table: &RouteTable) -> Result<Value, SchemaError> {
    let document = build_document(table)?;
    serde_json::to_value(document).map_err(|e| SchemaError(format!("failed to serialize document: {e}")))
}

pub fn build_document(table: &RouteTable) -> Result<OpenApiDocument, SchemaError> {
    let mut registry = SchemaRegistry::new();
    let mut paths: BTreeMap<String, BTreeMap<String, Operation>> = BTreeMap::new();

    for entry in table.routes() {
        let route = &entry.route;
        let path = openapi_path(route.parts());
        let method = route.method().unwrap_or(Method::Get).as_str().to_lowercase();

        let operations = paths.entry(path).or_default();
        if operations.contains_key(&method) {
            continue;
        }
        let operation = operation_for_route(route, &mut registry)?;
        operations.insert(method, operation);
    }

    let metadata = table.metadata();
    Ok(OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            version: metadata.version.clone(),
        },
        paths,
        components: Components {
            schemas: registry.into_schemas(),
        },
    })
}

fn operation_for_route(route: &Route, registry: &mut SchemaRegistry) -> Result<Operation, SchemaError> {
    let summary = if route.summary().is_empty() {
        route.show_path()
    } else {
        route.summary().join(" ")
    };
    let description = (!route.description().is_empty()).then(|| route.description().join("\n"));

    let mut parameters = parameters_for(route.params(), ParameterLocation::Path, registry)?;
    parameters.extend(parameters_for(route.query(), ParameterLocation::Query, registry)?);
    parameters.extend(parameters_for(route.headers(), ParameterLocation::Header, registry)?);

    let request_body = match route.data().shape() {
        Some(shape) => Some(RequestBody {
            content: MediaType::json(describe(&shape, registry)?, None),
        }),
        None => None,
    };

    let responses = describe_responses(route.response(), &fallback_schema_prefix(route), registry)?;

    Ok(Operation {
        description,
        summary,
        parameters,
        request_body,
        responses,
    })
}

fn parameters_for(
    validator: &Validator,
    location: ParameterLocation,
    registry: &mut SchemaRegistry,
) -> Result<Vec<Parameter>, SchemaError> {
    let Some(shape) = validator.shape() else {
        return Ok(Vec::new());
    };
    shape
        .declared_fields()
        .into_iter()
        .map(|field| {
            Ok(Parameter {
                name: field.name.to_string(),
                location,
                required: match location {
                    ParameterLocation::Path => true,
                    // Missing query keys are defaulted to an empty list.
                    ParameterLocation::Query => field.required && !matches!(field.shape, Shape::Array(_)),
                    ParameterLocation::Header => field.required,
                },
                schema: describe(field.shape, registry)?,
            })
        })
        .collect()
}

fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `GET /user/:id` → `GetUserId`
pub fn fallback_schema_prefix(route: &Route) -> String {
    let verb = route.method().unwrap_or(Method::Get).as_str().to_lowercase();
    let mut prefix = pascal_case(&verb);
    for item in route.parts() {
        let (RouteItem::Literal(text) | RouteItem::Param(text)) = item;
        prefix.push_str(&pascal_case(text));
    }
    prefix
}

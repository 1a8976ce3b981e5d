//! Fragment router demo server.
//!
//! Serves a small user API described entirely with route fragments, along
//! with its generated OpenAPI document.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ RouteTable::dispatch ──┬──▶ /swagger.json
//!                     (request id,      (first structural      │
//!                      trace, timeout,   match wins)           └──▶ handler ──▶ response contract
//!                      body limit)
//!     Client Response
//!     ◀────────────── http::response ◀──────────── RouteResponse
//! ```
//!
//! # Usage
//!
//! ```text
//! fragment-router                       # defaults, listens on 0.0.0.0:8080
//! fragment-router --config router.toml  # load settings from a TOML file
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use fragment_router::codec;
use fragment_router::config::{load_config, ServerConfig};
use fragment_router::http::HttpServer;
use fragment_router::lifecycle::Shutdown;
use fragment_router::observability::{logging, metrics};
use fragment_router::route::{self, make_route, respond, ResponseMetadata};
use fragment_router::routing::{Handler, RouteTable};

#[derive(Parser)]
#[command(name = "fragment-router", about = "Declarative HTTP routes with generated OpenAPI docs")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: f64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserParams {
    id: f64,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    tag: Vec<String>,
}

fn user_codec() -> codec::SharedCodec {
    codec::named_record("User", [("id", codec::number()), ("name", codec::string())])
}

fn demo_routes() -> RouteTable {
    RouteTable::default()
        .route(
            make_route([
                route::get(),
                route::lit("healthz"),
                route::response_with(
                    200,
                    codec::literal("OK"),
                    ResponseMetadata::new().schema_name("HealthzResponse"),
                ),
                route::description("Returns a 200 to indicate the service is running"),
            ]),
            Handler::pure(|_| respond(200, "OK")),
        )
        .route(
            make_route([
                route::get(),
                route::lit("user"),
                route::param("id", codec::number_from_string()),
                route::header("x-session", codec::optional(codec::string())),
                route::response(200, user_codec()),
                route::response(404, codec::string()),
                route::summary("Fetch one user"),
            ]),
            Handler::pure_result(|request| {
                let params: UserParams = request
                    .params_as()
                    .map_err(|e| respond(404, e.to_string()))?;
                if params.id < 0.0 {
                    return Err(respond(404, format!("no user with id {}", params.id)));
                }
                let user = User {
                    id: params.id,
                    name: format!("user-{}", params.id),
                };
                serde_json::to_value(user)
                    .map(|data| respond(200, data))
                    .map_err(|e| respond(404, e.to_string()))
            }),
        )
        .route(
            make_route([
                route::post(),
                route::lit("user"),
                route::data(user_codec()),
                route::response(201, user_codec()),
                route::description("Saves a user"),
            ]),
            Handler::new(|request| async move {
                tracing::info!(user = %request.data, "Saving user");
                respond(201, request.data)
            }),
        )
        .route(
            make_route([
                route::get(),
                route::lit("search"),
                route::query("tag", codec::string()),
                route::response(200, codec::array(codec::string())),
            ]),
            Handler::pure(|request| match request.query_as::<SearchQuery>() {
                Ok(query) => respond(200, query.tag),
                Err(_) => respond(200, Vec::<String>::new()),
            }),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("fragment-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        docs_path = %config.docs.path,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let table = demo_routes()
        .with_metadata(
            config.docs.title.clone(),
            config.docs.description.clone(),
            config.docs.version.clone(),
        )
        .with_docs_path(&config.docs.path);

    tracing::info!(
        routes = table.routes().len(),
        docs = %table.docs_path(),
        "Route table built"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

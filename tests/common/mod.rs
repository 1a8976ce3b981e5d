//! Shared utilities for integration testing.

use fragment_router::codec;
use fragment_router::config::ServerConfig;
use fragment_router::http::HttpServer;
use fragment_router::lifecycle::Shutdown;
use fragment_router::route::{self, make_route, respond, ResponseMetadata};
use fragment_router::routing::{Handler, RouteTable};
use tokio::net::TcpListener;

/// A running server and the handle that stops it.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `table` on an ephemeral port.
pub async fn start_server(config: ServerConfig, table: RouteTable) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        base_url: format!("http://{addr}"),
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn user_codec() -> codec::SharedCodec {
    codec::named_record("User", [("id", codec::number()), ("name", codec::string())])
}

/// Health check, user lookup, user creation and tag search.
pub fn user_table() -> RouteTable {
    RouteTable::default()
        .with_metadata("Users", Some("Test users API".to_string()), "0.1.0")
        .route(
            make_route([
                route::get(),
                route::lit("healthz"),
                route::response_with(
                    200,
                    codec::literal("OK"),
                    ResponseMetadata::new().schema_name("HealthzResponse"),
                ),
            ]),
            Handler::pure(|_| respond(200, "OK")),
        )
        .route(
            make_route([
                route::get(),
                route::lit("user"),
                route::param("id", codec::number_from_string()),
                route::response(200, user_codec()),
            ]),
            Handler::pure(|request| {
                let id = request.params["id"].clone();
                respond(200, serde_json::json!({"id": id, "name": "Ada"}))
            }),
        )
        .route(
            make_route([
                route::post(),
                route::lit("user"),
                route::data(user_codec()),
                route::response(201, user_codec()),
            ]),
            Handler::new(|request| async move { respond(201, request.data) }),
        )
        .route(
            make_route([
                route::get(),
                route::lit("search"),
                route::query("tag", codec::string()),
                route::response(200, codec::array(codec::string())),
            ]),
            Handler::pure(|request| respond(200, request.query["tag"].clone())),
        )
}

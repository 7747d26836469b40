use std::net::SocketAddr;

use axum::{Json, Router, routing::get};
use rusqlite::Connection;
use tokio::net::TcpListener;

use crate::{AppState, build_router};

async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let addr = listener
        .local_addr()
        .expect("Could not get test listener address");

    (listener, addr)
}

fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server stopped unexpectedly");
    });
}

/// Serve `router` on a random local port and return the address it is bound to.
pub(crate) async fn spawn_server(router: Router) -> SocketAddr {
    let (listener, addr) = bind_local().await;
    serve(listener, router);

    addr
}

/// Serve `body` as JSON on a random local port and return its URL.
pub(crate) async fn serve_json(body: serde_json::Value) -> String {
    let router = Router::new().route("/data.json", get(move || async move { Json(body) }));
    let addr = spawn_server(router).await;

    format!("http://{addr}/data.json")
}

/// Serve the whole app on a random local port so that it can make requests to itself.
///
/// The returned state shares its database connection with the running app.
pub(crate) async fn spawn_app(connection: Connection) -> AppState {
    let (listener, addr) = bind_local().await;
    let state = AppState::new(
        connection,
        "http://127.0.0.1:9/data.json",
        &format!("http://{addr}"),
    )
    .expect("Could not create app state");
    serve(listener, build_router(state.clone()));

    state
}

mod config;
mod error;
mod routes;
mod services;
mod sources;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let state = state::AppState::from_config(&config).expect("data source init failed");

    // Graph fetch runs in the background; routes report 503 until it lands.
    let _graph_load = services::mindmap::spawn_graph_load(state.clone());

    let app = routes::app(state);
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "toolbench listening");
    axum::serve(listener, app).await.expect("server failed");
}

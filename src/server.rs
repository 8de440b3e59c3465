use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::Config, types::Token};

/// Routes of the local callback server.
pub fn router(config: Arc<Config>, state: Arc<Mutex<Option<Token>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

/// Binds the configured address and serves the callback routes until the
/// process ends.
pub async fn start_api_server(
    config: Arc<Config>,
    state: Arc<Mutex<Option<Token>>>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.server_addr).await?;
    log::debug!("callback server listening on {}", config.server_addr);
    axum::serve(listener, router(config, state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_serves_health() {
        let config = Arc::new(
            Config::new("id", "secret", "http://127.0.0.1:8080/callback").unwrap(),
        );
        let state = Arc::new(Mutex::new(None));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(config, state)).await });

        let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }
}

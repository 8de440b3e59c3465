use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config::Config, error, info, server::start_api_server, soundcloud, success, types::Token,
    warning,
};

/// Prints the URL where the user grants access to the application.
pub fn sign_in(config: &Config) {
    println!("{}", soundcloud::auth::sign_in_url(config));
}

/// Runs the authorization flow and prints the resulting access token.
///
/// With `code`, the code is exchanged directly. Without it, a local callback
/// server is started, the sign-in URL is opened in the browser and the command
/// waits up to 60 seconds for SoundCloud to redirect back.
///
/// The token is not stored anywhere; export it as `SOUNDCLOUD_ACCESS_TOKEN` to
/// use the other commands.
pub async fn auth(config: Config, code: Option<String>) {
    let token = match code {
        Some(code) => match soundcloud::auth::auth(&config, &code).await {
            Ok(client) => client.token().cloned(),
            Err(e) => error!("Authentication failed. Err: {}", e),
        },
        None => browser_flow(config).await,
    };

    match token {
        Some(t) => {
            success!("Authentication successful!");
            if let Some(expires_in) = t.expires_in {
                info!("Token expires in {} seconds.", expires_in);
            }
            info!("Export the token to use the other commands:");
            println!("export SOUNDCLOUD_ACCESS_TOKEN={}", t.access_token);
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

async fn browser_flow(config: Config) -> Option<Token> {
    let shared_state: Arc<Mutex<Option<Token>>> = Arc::new(Mutex::new(None));
    let config = Arc::new(config);

    let server_config = Arc::clone(&config);
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_config, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = soundcloud::auth::sign_in_url(&config);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state).await
}

/// Polls the shared state once per second for up to 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<Token>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Some(token) = shared_state.lock().await.as_ref() {
            return Some(token.clone());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

use mock_server::{MockState, DEFAULT_SECRET, DEFAULT_STORE};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_server=info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let store = std::env::var("ZONOS_ACCOUNT_NUMBER").unwrap_or_else(|_| DEFAULT_STORE.to_string());
    let secret = std::env::var("ZONOS_API_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let state = if store == DEFAULT_STORE && secret == DEFAULT_SECRET {
        MockState::seeded()
    } else {
        MockState::new(&store, &secret)
    };
    mock_server::run_with_state(listener, state).await
}

use tokio::net::TcpListener;

/// Standalone entry point for poking at the stub with curl; tests embed
/// [`mock_server::run`] directly instead.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("MOCK_PORT").unwrap_or_else(|_| "8082".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock CI/CD stub listening on {addr}");
    mock_server::run(listener).await
}

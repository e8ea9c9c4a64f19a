#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reelist=debug,sqlx=warn".to_string()),
        )
        .init();

    reelist::app::run_server().await
}

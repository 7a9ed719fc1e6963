use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let db_path = std::env::var("STOCKBOOK_DB").unwrap_or_else(|_| "stockbook.db".to_string());
    let addr = std::env::var("STOCKBOOK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let store = stockbook_store::Store::open(&db_path)
        .await
        .with_context(|| format!("failed to open database at {db_path}"))?;
    tracing::info!(db = %db_path, "database ready");

    let app = stockbook_api::app::build_app(store);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    asconnect::cli::run_cli().await
}

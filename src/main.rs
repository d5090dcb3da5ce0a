use anyhow::Result;
use tracing::error;
use waterlog::cli::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    run_cli().await.inspect_err(|e| {
        error!("Error running waterlog cli {e:?}");
    })?;
    Ok(())
}

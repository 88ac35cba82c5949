#[tokio::main]
async fn main() -> anyhow::Result<()> {
    github_raw_proxy::run().await?;
    Ok(())
}

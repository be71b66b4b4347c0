#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_rs::cli::run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    body_probe::run().await
}

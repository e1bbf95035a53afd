#[tokio::main]
async fn main() -> anyhow::Result<()> {
    prompt_studio_lib::run().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tableau_backend::run().await
}

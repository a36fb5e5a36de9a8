#[tokio::main]
async fn main() -> std::io::Result<()> {
    patient_server::run_with_config().await
}

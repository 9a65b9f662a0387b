use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(error) = plan_limits::run().await {
        error!("plan-limits exited with error: {:?}", error);
        std::process::exit(1);
    }
}

use collector_rs::run_simulated_service;
use log::{error, info};

const DEFAULT_FRAMES: i64 = 100;

#[tokio::main]
async fn main() {
    env_logger::init();

    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<i64>().ok())
        .unwrap_or(DEFAULT_FRAMES);
    let output_dir = std::env::temp_dir();

    let (handle, _collector) =
        run_simulated_service(&output_dir, frames).expect("Error creating simulated source");

    match handle.await.expect("Collection task panicked") {
        Ok(path) => info!("Captured {} frames into '{}'", frames, path.display()),
        Err(e) => error!("Capture failed: {}", e),
    }
}

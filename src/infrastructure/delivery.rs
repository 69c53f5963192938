//! Delivery transport - the boundary to whatever carries operator messages
//!
//! Sends are fire-and-forget: a failed delivery is the transport's
//! concern and is never retried or escalated by the core.

use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

/// Outbound message channel to an operator destination
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, destination: &str, text: &str);

    async fn send_image(&self, destination: &str, image: &[u8], caption: &str);
}

/// Transport for local operation: text goes to stdout, images are written
/// next to the process and their path is announced.
pub struct ConsoleTransport;

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_text(&self, destination: &str, text: &str) {
        println!("[{}] {}", destination, text);
    }

    async fn send_image(&self, destination: &str, image: &[u8], caption: &str) {
        let name = format!("chart-{}.svg", rand::thread_rng().gen_range(1_000_000..10_000_000));
        let path = std::env::temp_dir().join(name);
        match tokio::fs::write(&path, image).await {
            Ok(()) => println!("[{}] {} ({})", destination, caption, path.display()),
            Err(e) => warn!("Failed to write chart image: {}", e),
        }
    }
}

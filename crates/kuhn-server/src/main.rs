//! Match-coordination server binary.
#[tokio::main]
async fn main() {
    kuhn_core::log();
    kuhn_core::kys();
    kuhn_server::run().await.unwrap();
}

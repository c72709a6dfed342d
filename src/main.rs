#[tokio::main]
async fn main() {
    repair_booking_backend::run().await;
}

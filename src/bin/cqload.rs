use cqload::cli::start;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(err) = start().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

use clap::Parser;
use codexray::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli::dispatch(cli).await {
        eprintln!("error: {e}");
        for hint in e.recovery_suggestions() {
            eprintln!("  - {hint}");
        }
        std::process::exit(1);
    }
}

use anyhow::Result;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Stream a pre-embedded dataset into per-document JSON files", long_about = None)]
struct Cli {
    #[command(flatten)]
    args: commands::ingest::IngestArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::ingest::execute(cli.args)
}

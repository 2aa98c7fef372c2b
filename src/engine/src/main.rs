#![deny(warnings)]
#![deny(rust_2018_idioms)]

use clap::Parser;
use engine::{
    Result,
    settings::Settings,
    startup::{App, Command},
};

/// Synthetic maritime traffic generation and validation.
#[derive(Debug, Parser)]
#[command(name = "maritime-engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level.level())
        .with_writer(std::io::stderr)
        .init();

    let app = App::build(settings);
    let output = app.run(cli.command).await?;
    println!("{output}");

    Ok(())
}

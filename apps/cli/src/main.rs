//! StandardForge CLI: provisions org-wide coding standards on the
//! code-quality platform.
//!
//! Creates a coding standard with every supported language and analysis
//! tool enabled and info/minor findings suppressed, then promotes it to the
//! organization default.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    standardforge_shared::load_dotenv();
    let cli = Cli::parse();
    commands::init_tracing(&cli)?;
    commands::run(cli).await
}

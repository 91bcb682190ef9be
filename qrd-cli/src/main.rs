//! QRD CLI - Command line tool for the quantum resource dashboard's data layer.

use std::path::PathBuf;

use clap::Parser;
use qrd_core::ProjectRoot;

#[derive(Parser)]
#[command(
    name = "qrd-cli",
    version,
    about = "Quantum resource dashboard data toolkit"
)]
struct Cli {
    /// Project directory holding DashboardInput.yaml
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: qrd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let root = ProjectRoot::new(cli.root);
    log::debug!("[QRD] cli: project root {}", root.dir().display());
    qrd_cmd::run(cli.command, root)
}

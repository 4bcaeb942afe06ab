use route_attributes::cli::run_cli;
use route_attributes::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    run_cli()
}

use anyhow::Result;
use clap::Parser;
use simt_report::cli::{Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber on stderr
///
/// `--debug` forces debug output; otherwise `RUST_LOG` decides, defaulting to
/// warnings only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args.report_config()?;
    let summary = simt_report::run(&config)?;

    match args.format {
        OutputFormat::Text => print!("{}", summary),
        OutputFormat::Json => println!("{}", summary.to_json()?),
    }

    Ok(())
}

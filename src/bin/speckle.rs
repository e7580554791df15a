use clap::Parser;
use speckle::{config::SpeckleConfig, formatter::FormatterKind, system::System, SpeckleResult};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spec files to load, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to config file
    #[arg(short, long, default_value = "speckle.json")]
    config: PathBuf,

    /// Output format (terminal, json), overrides the config file
    #[arg(short, long)]
    format: Option<String>,

    /// Run only the suite with this description
    #[arg(short, long)]
    suite: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Returns whether every spec that ran passed.
fn run(cli: &Cli, mut config: SpeckleConfig) -> SpeckleResult<bool> {
    if let Some(name) = &cli.format {
        config.formatter = FormatterKind::from_name(name)?;
    }
    debug!("config: {:?}", config);

    let mut system = System::new(&config)?;
    for file in &cli.files {
        system.exec(file)?;
    }
    info!(suites = system.suites().len(), "spec files loaded");

    match &cli.suite {
        Some(description) => system.run_suite(description)?,
        None => system.run()?,
    }

    println!("{}", system.render()?);
    Ok(system.stats().failures == 0)
}

fn main() {
    let cli = Cli::parse();

    let config = match SpeckleConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", speckle::Error::from(e));
            std::process::exit(1);
        }
    };

    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_filter.clone()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

//! webcompat-run - run intervention regression checks against a WebDriver endpoint

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use webcompat_interventions::{sites, InterventionMode, Platform, RunConfig, Runner};

#[derive(Parser, Debug)]
#[command(name = "webcompat-run")]
#[command(about = "Run per-site webcompat intervention checks")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WebDriver endpoint (e.g. a running geckodriver)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Intervention states to run under
    #[arg(short, long, value_enum)]
    interventions: Option<InterventionMode>,

    /// Platform of the browser under test
    #[arg(short, long, value_enum)]
    platform: Option<Platform>,

    /// Only run tests for this bug number
    #[arg(short, long)]
    bug: Option<u32>,

    /// Only run tests whose name contains this string
    #[arg(short, long)]
    filter: Option<String>,

    /// Run the browser headless
    #[arg(long, overrides_with = "no_headless")]
    headless: bool,

    /// Show the browser window
    #[arg(long, overrides_with = "headless")]
    no_headless: bool,

    /// Firefox binary to launch
    #[arg(long)]
    binary: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List tests and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(url) = self.webdriver_url {
            config.webdriver_url = url;
        }
        if let Some(mode) = self.interventions {
            config.interventions = mode;
        }
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(bug) = self.bug {
            config.filter.bug = Some(bug);
        }
        if let Some(name) = self.filter {
            config.filter.name = Some(name);
        }
        if self.headless {
            config.headless = true;
        } else if self.no_headless {
            config.headless = false;
        }
        if let Some(binary) = self.binary {
            config.binary = Some(binary);
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let list = args.list;
    let config = args.into_config()?;
    let runner = Runner::new(config);
    let tests = sites::all();

    if list {
        for test in runner.select(&tests) {
            println!("{}\t{}\t{}", test.id(), test.site, test.markers);
        }
        return Ok(());
    }

    info!("webcompat-run v{}", env!("CARGO_PKG_VERSION"));
    let results = runner.run(&tests).await;
    runner.write_results(&results)?;

    if !results.success() {
        std::process::exit(1);
    }
    Ok(())
}

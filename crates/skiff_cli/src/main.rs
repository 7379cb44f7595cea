//! Skiff CLI
//!
//! Inspect platform detection and resolved config for a given environment.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skiff_config::{setup_config, Config};
use skiff_platform::{default_registry, setup_platform, Platform, StaticEnvironment};

mod report;

use report::{registry_entries, DetectReport};

#[derive(Parser)]
#[command(name = "skiff")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Skiff platform detection CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the platform chain for an environment
    Detect {
        #[command(flatten)]
        env: EnvArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a config value for an environment
    Config {
        /// Config key (e.g. mode, keyboardHeight)
        key: String,

        #[command(flatten)]
        env: EnvArgs,

        /// User config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the stock platform registry
    Registry {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Environment signals fed to detection
#[derive(Args)]
struct EnvArgs {
    /// User agent string
    #[arg(short, long, default_value = "")]
    user_agent: String,

    /// Page URL, including any query overrides
    #[arg(long, default_value = "http://localhost/")]
    url: String,

    /// Navigator platform (e.g. iPhone, MacIntel)
    #[arg(short, long, default_value = "")]
    navigator_platform: String,

    /// Viewport width
    #[arg(long, default_value = "0")]
    width: f64,

    /// Viewport height
    #[arg(long, default_value = "0")]
    height: f64,

    /// Globals present in the host (e.g. cordova, webkit)
    #[arg(short, long = "global")]
    globals: Vec<String>,
}

impl EnvArgs {
    fn environment(&self) -> StaticEnvironment {
        let mut env = StaticEnvironment::new(self.user_agent.as_str())
            .with_navigator_platform(self.navigator_platform.as_str())
            .with_url(self.url.as_str())
            .with_size(self.width, self.height);
        for global in &self.globals {
            env = env.with_global(global.as_str());
        }
        // A CLI environment has nothing left to load
        env.document_complete = true;
        env
    }

    fn platform(&self) -> Result<Platform> {
        setup_platform(Box::new(self.environment()), default_registry())
            .context("Failed to resolve platform")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Detect { env, json } => cmd_detect(&env, json),
        Commands::Config { key, env, config } => cmd_config(&key, &env, config.as_deref()),
        Commands::Registry { json } => cmd_registry(json),
    }
}

fn cmd_detect(env: &EnvArgs, json: bool) -> Result<()> {
    let plt = env.platform()?;
    let report = DetectReport::from_platform(&plt);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_config(key: &str, env: &EnvArgs, path: Option<&std::path::Path>) -> Result<()> {
    let plt = env.platform()?;

    let user = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .settings()
                .clone()
        }
        None => Default::default(),
    };
    let config = setup_config(serde_json::Value::Object(user), &plt);

    match config.get(key) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!("'{}' is not set for platforms {:?}", key, plt.platforms()),
    }
    Ok(())
}

fn cmd_registry(json: bool) -> Result<()> {
    let entries = registry_entries(&default_registry());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let mut line = entry.name.clone();
        if entry.engine {
            line.push_str(" [engine]");
        }
        if let Some(superset) = &entry.superset {
            line.push_str(&format!(" superset={}", superset));
        }
        if !entry.subsets.is_empty() {
            line.push_str(&format!(" subsets={}", entry.subsets.join(",")));
        }
        if !entry.parents.is_empty() {
            line.push_str(&format!(" parents={}", entry.parents.join(",")));
        }
        println!("{}", line);
    }
    Ok(())
}

// src/main.rs
mod app;
mod config;
mod controller;
mod errors;
mod form;
mod input;
mod models;
mod network;
mod options;
mod theme;
mod ui;
mod utils;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, builder::PossibleValuesParser};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use crate::config::{Settings, ensure_config_file, get_user_config_path, save_endpoint};
use crate::controller::Controller;
use crate::form::FormState;
use crate::models::Phase;
use crate::network::PredictionClient;
use crate::options::{
    COMPANIES, CPU_BRANDS, GPU_BRANDS, OPERATING_SYSTEMS, RAM_SIZES, TYPE_NAMES, catalog,
};
use crate::utils::{expand_path, format_price};

#[derive(Parser, Debug)]
#[command(
    name = "lpp",
    version,
    about = "Estimate a laptop's price from its specifications",
    long_about = None
)]
struct Cli {
    /// Config file to use instead of the user and working-directory files
    #[arg(long, global = true)]
    config: Option<String>,

    /// Prediction service URL (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log file for the interactive form
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one specification and print the predicted price
    Predict(LaptopArgs),
    /// List the accepted values of every select field
    Options,
    /// Store the prediction service URL in the config file
    SetEndpoint { url: String },
}

#[derive(Args, Debug)]
struct LaptopArgs {
    #[arg(long, value_parser = PossibleValuesParser::new(COMPANIES.iter().copied()))]
    company: String,
    #[arg(long, value_parser = PossibleValuesParser::new(TYPE_NAMES.iter().copied()))]
    typename: String,
    #[arg(long, value_parser = PossibleValuesParser::new(CPU_BRANDS.iter().copied()))]
    cpu_brand: String,
    #[arg(long, value_parser = PossibleValuesParser::new(GPU_BRANDS.iter().copied()))]
    gpu_brand: String,
    /// Screen size, 10 to 20 in steps of 0.1
    #[arg(long)]
    inches: String,
    /// Weight in kg, 0.5 to 10 in steps of 0.1
    #[arg(long)]
    weight: String,
    #[arg(long)]
    touchscreen: bool,
    #[arg(long)]
    ips: bool,
    #[arg(long)]
    fullhd: bool,
    #[arg(long, value_parser = PossibleValuesParser::new(OPERATING_SYSTEMS.iter().copied()))]
    os: String,
    #[arg(long, value_parser = PossibleValuesParser::new(RAM_SIZES.iter().copied()))]
    ram: String,
}

impl From<LaptopArgs> for FormState {
    fn from(args: LaptopArgs) -> Self {
        FormState {
            company: args.company,
            typename: args.typename,
            cpu_brand: args.cpu_brand,
            gpu_brand: args.gpu_brand,
            inches: args.inches,
            weight: args.weight,
            touchscreen: args.touchscreen,
            ips: args.ips,
            fullhd: args.fullhd,
            os: args.os,
            ram: args.ram,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let Cli {
        config,
        endpoint,
        log_file,
        command,
    } = Cli::parse();
    let config_path = config.as_deref().map(expand_path);
    let overrides = Overrides { endpoint, log_file };

    match command {
        Some(Command::Options) => {
            for (label, values) in catalog() {
                println!("{label}: {}", values.join(", "));
            }
            Ok(())
        }
        Some(Command::SetEndpoint { url }) => {
            let path = target_config_path(config_path)?;
            save_endpoint(&path, &url)?;
            println!("endpoint saved to {}", path.display());
            Ok(())
        }
        Some(Command::Predict(args)) => {
            let settings = load_settings(config_path.as_deref(), &overrides)?;
            init_stderr_logging(&settings);
            predict_once(&settings, args.into())
        }
        None => {
            if config_path.is_none() {
                if let Some(user) = get_user_config_path() {
                    // best effort
                    if let Err(err) = ensure_config_file(&user) {
                        eprintln!("warning: {err:#}");
                    }
                }
            }
            let settings = load_settings(config_path.as_deref(), &overrides)?;
            init_file_logging(&settings)?;
            let rt = Runtime::new()?;
            let client = PredictionClient::new(settings.endpoint.clone(), settings.timeout())?;
            tracing::info!(endpoint = %client.endpoint(), "starting form");
            app::run(&settings, client, rt.handle())
        }
    }
}

fn target_config_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => get_user_config_path().context("could not determine home directory"),
    }
}

/// Command-line values that win over every config layer.
struct Overrides {
    endpoint: Option<String>,
    log_file: Option<String>,
}

fn load_settings(config_path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Settings> {
    let mut settings = Settings::new(config_path).context("could not load configuration")?;
    if let Some(endpoint) = &overrides.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(log_file) = &overrides.log_file {
        settings.log_file = Some(log_file.clone());
    }
    settings.validate()?;
    Ok(settings)
}

fn env_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level))
}

fn init_stderr_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_writer(std::io::stderr)
        .init();
}

/// The form owns the terminal, so logs go to a file instead.
fn init_file_logging(settings: &Settings) -> anyhow::Result<()> {
    let path = settings.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn predict_once(settings: &Settings, form: FormState) -> anyhow::Result<()> {
    let mut controller = Controller::with_form(form, settings.conversion_rate);
    let submission = match controller.begin_submit() {
        Ok(submission) => submission,
        Err(rejected) => {
            for issue in controller.issues() {
                eprintln!("  {issue}");
            }
            bail!(rejected);
        }
    };

    let client = PredictionClient::new(settings.endpoint.clone(), settings.timeout())?;
    let rt = Runtime::new()?;
    let outcome = rt.block_on(client.predict(&submission.payload));
    controller.settle(submission.seq, outcome);

    println!("{}", settled_price(&controller, &settings.currency)?);
    Ok(())
}

/// The line `predict` prints for a settled controller, or why there is none.
fn settled_price(controller: &Controller, currency: &str) -> anyhow::Result<String> {
    match (controller.phase(), controller.result()) {
        (Phase::Failed { reason }, _) => bail!("prediction failed: {reason}"),
        (_, Some(prediction)) if prediction.is_displayable() => {
            Ok(format_price(prediction.local_price, currency))
        }
        (_, Some(_)) => bail!("prediction service returned a zero price"),
        (phase, None) => bail!("no prediction available ({phase:?})"),
    }
}

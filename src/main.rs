// ABOUTME: Entry point for the releasectl CLI application.
// ABOUTME: Parses arguments, wires the real collaborators, and maps outcomes to exit codes.

mod cli;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, ReleaseArgs};
use releasectl::config::{self, Config, Overrides};
use releasectl::error::Result;
use releasectl::output::{Output, OutputMode};
use releasectl::platform::{DockerCli, EcrRegistry, EcsCli, HttpProbe};
use releasectl::release::{Collaborators, Controller, ExitOutcome, ReleaseFlags, StopSignal};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    let code = match run(cli, &output).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            output.error(&e);
            e.outcome().exit_code()
        }
    };
    std::process::exit(code);
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run(cli: Cli, output: &Output) -> Result<ExitOutcome> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)?;
            output.progress(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(ExitOutcome::Success)
        }
        Commands::Release(args) => release(cli.config, args, output).await,
    }
}

async fn release(
    config_path: Option<PathBuf>,
    args: ReleaseArgs,
    output: &Output,
) -> Result<ExitOutcome> {
    let config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::discover(&env::current_dir()?)?,
    };

    let overrides = Overrides {
        flags: ReleaseFlags {
            build_only: args.build_only,
            skip_build: args.skip_build,
            skip_health_check: args.skip_health_check,
        },
        tag: args.tag,
    };
    let ctx = config.into_context(&overrides, Utc::now())?;

    let collaborators = Collaborators {
        builder: DockerCli::new(config.build_options()?),
        registry: EcrRegistry::new(ctx.region.as_str()),
        platform: EcsCli::new(ctx.region.as_str()),
        probe: HttpProbe::new(config.probe_timeout()),
    };

    let stop = StopSignal::new();
    stop.install_ctrl_c_handler();
    let controller = Controller::new(collaborators).with_stop_signal(stop);

    output.progress(&format!(
        "Releasing {} to {}/{}",
        ctx.tag, ctx.cluster, ctx.service
    ));

    let report = controller.run(&ctx).await?;
    output.report(&report);
    Ok(report.outcome)
}

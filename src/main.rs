use anyhow::{Context, Result};
use bumper::config::{self, Config};
use bumper::domain::Trigger;
use bumper::orchestration::Bumper;
use bumper::source::FileSource;
use bumper::ui;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(clap::Parser)]
#[command(
    name = "bumper",
    version,
    about = "Bump version numbers in files according to a version scheme and rules"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        default_value = "commit",
        help = "Event that triggered the bump: commit, manual, pull-request or comment"
    )]
    trigger: Trigger,

    #[arg(
        short,
        long,
        required_unless_present = "current",
        help = "Branch the trigger happened on"
    )]
    branch: Option<String>,

    #[arg(long, help = "Print the current version and exit")]
    current: bool,

    #[arg(long, help = "Preview the new version without writing files")]
    dry_run: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "bumper=debug" } else { "bumper=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config_file = config::find_config_file(args.config.as_deref());
    let config = match &config_file {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Error loading config '{}'", path.display()))?,
        None => Config::default(),
    };

    // Version files are relative to the configuration file
    let source = match config_file.as_deref().and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => FileSource::with_root(dir),
        _ => FileSource::new(),
    };
    let bumper = Bumper::new(config, source)?;

    if args.current {
        println!("{}", bumper.current_version()?);
        return Ok(());
    }

    let branch = args
        .branch
        .context("--branch is required unless --current is given")?;
    let plan = bumper.plan(args.trigger, &branch)?;
    ui::display_version_change(&plan, args.dry_run);

    if args.dry_run {
        ui::display_status("Dry run: no files were written");
        return Ok(());
    }

    if plan.is_noop() {
        ui::display_status(&format!("Version {} unchanged", plan.next));
        return Ok(());
    }

    for path in bumper.apply(&plan)? {
        ui::display_success(&format!("Updated {}", path.display()));
    }
    ui::display_success(&format!("Bumped version to {}", plan.next));
    Ok(())
}

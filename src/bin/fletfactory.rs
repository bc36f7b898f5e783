// src/bin/fletfactory.rs
//
// Headless driver: loads a project's pyproject.toml into the form state and
// previews, saves or runs the resulting `flet build` command.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use fletfactory::core::loader::PyprojectDoc;
use fletfactory::core::settings::SettingsStore;
use fletfactory::core::{command, paths, populator, writer};
use fletfactory::models::{FieldValue, Platform};
use fletfactory::state::FormState;
use fletfactory::system::executor;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(
    name = "fletfactory",
    version,
    about = "Assemble, preview and run flet build commands from pyproject.toml."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the build command for a project without running it.
    Preview(ProjectArgs),
    /// Write the loaded configuration back to the project's pyproject.toml.
    Save(ProjectArgs),
    /// Run the build, streaming its output.
    Build(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Project directory containing pyproject.toml.
    #[arg(default_value = ".")]
    path: String,

    /// Target platform: windows, macos, linux, apk, aab, ipa or web.
    #[arg(short, long)]
    platform: Option<String>,

    /// Override the configured build verbosity (0, 1 or 2).
    #[arg(long)]
    verbosity: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => preview(&args),
        Commands::Save(args) => save(&args),
        Commands::Build(args) => build(&args).await,
    }
}

/// Builds the form state for a project directory: configured defaults, then
/// the pyproject contents, then command-line overrides.
fn load_state(args: &ProjectArgs) -> Result<FormState> {
    let mut state = FormState::new();
    state.update("python_app_path", FieldValue::Text(args.path.clone()));

    let doc = PyprojectDoc::load(&args.path)
        .with_context(|| format!("Could not read project metadata under '{}'", args.path))?;
    if let Some(doc) = doc {
        populator::populate(&doc, &mut state);
    }

    if let Some(token) = &args.platform {
        let platform = Platform::from_token(token)
            .with_context(|| format!("Unknown platform '{}'", token))?;
        state.update("selected_platform", FieldValue::Platform(Some(platform)));
    }

    let level = match args.verbosity {
        Some(level) => level.min(2),
        None => match SettingsStore::open_default() {
            Ok(store) => store.verbose_build(),
            Err(e) => {
                log::warn!("Could not open settings ({}), using default verbosity.", e);
                1
            }
        },
    };
    state.update("verbose_build_level", FieldValue::Level(level));

    Ok(state)
}

fn preview(args: &ProjectArgs) -> Result<()> {
    let state = load_state(args)?;
    if state.selected_platform.is_none() {
        println!(
            "{}",
            "No target platform selected; the command below is incomplete.".yellow()
        );
    }
    println!("{}", command::build_command(&state).join(" ").cyan());
    Ok(())
}

fn save(args: &ProjectArgs) -> Result<()> {
    let state = load_state(args)?;
    if !writer::save_to_path(&args.path, &state) {
        bail!("Failed to save pyproject.toml under '{}'.", args.path);
    }
    println!("{}", "Saved pyproject.toml.".green());
    Ok(())
}

async fn build(args: &ProjectArgs) -> Result<()> {
    let state = load_state(args)?;
    if state.selected_platform.is_none() {
        bail!("No target platform selected. Pass one with --platform.");
    }

    let tokens = command::build_command(&state);
    println!("{} {}", "Running:".bold(), tokens.join(" ").cyan());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            println!("{}", line);
        }
    });

    let cwd = paths::expand_user(&args.path);
    let result = executor::run_build(&tokens, Some(&cwd), tx).await;
    let _ = printer.await;

    result.context("Build failed")?;
    println!("{}", "Build finished successfully.".green().bold());
    Ok(())
}

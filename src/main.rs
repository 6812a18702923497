mod commands;
mod core;
mod eslint;
mod generator;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::error::{GenError, print_error};
use crate::generator::GenerateOptions;

/// Generate and migrate ESLint configuration for multi-project workspaces
#[derive(Parser)]
#[command(name = "lintgen")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Workspace root (defaults to the current directory)
  #[arg(long, global = true)]
  root: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate lint configuration for a project, migrating the workspace to
  /// a shared-base layout first when needed
  Generate {
    /// Name of the target project
    project: String,

    /// Lint file patterns ({projectRoot} expands to the project root)
    #[arg(long = "pattern", value_name = "GLOB")]
    patterns: Vec<String>,

    /// Enable type-aware parsing (populates parserOptions.project)
    #[arg(long)]
    set_parser_options_project: bool,

    /// The target is the workspace-root project
    #[arg(long)]
    root_project: bool,

    /// Skip the follow-up formatting task
    #[arg(long)]
    skip_format: bool,

    /// Do not touch package.json dev dependencies
    #[arg(long)]
    skip_package_json: bool,

    /// Preserve pre-existing dependency version pins
    #[arg(long)]
    keep_existing_versions: bool,

    /// Force lint target inference on or off (default: lintgen.toml setting)
    #[arg(long)]
    infer_targets: Option<bool>,

    /// Actually write files (default: dry-run mode showing the plan)
    #[arg(long)]
    apply: bool,
  },

  /// Show lint configuration status for all projects
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn main() {
  let cli = Cli::parse();

  let workspace_root = match &cli.root {
    Some(root) => root.clone(),
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => {
        eprintln!("Error: Failed to get current directory: {}", e);
        std::process::exit(1);
      }
    },
  };

  let result = match cli.command {
    Commands::Generate {
      project,
      patterns,
      set_parser_options_project,
      root_project,
      skip_format,
      skip_package_json,
      keep_existing_versions,
      infer_targets,
      apply,
    } => {
      let opts = GenerateOptions {
        project,
        patterns: if patterns.is_empty() { None } else { Some(patterns) },
        set_parser_options_project,
        root_project,
        skip_format,
        skip_package_json,
        keep_existing_versions,
        infer_targets,
      };
      commands::run_generate(&workspace_root, opts, !apply)
    }
    Commands::Status { json } => commands::run_status(&workspace_root, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: GenError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
}

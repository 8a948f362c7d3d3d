use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-actions")]
#[command(author, version, about = "OpenAPI to named action catalog compiler")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document and its mask
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate action catalogs from an OpenAPI document
  #[command(alias = "gen")]
  Generate {
    #[command(subcommand)]
    generate_command: GenerateCommands,
  },
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommands {
  /// Generate named_actions.yaml from an OpenAPI document and a mask
  #[command(alias = "na")]
  NamedActions(SourceArgs),
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every operation and whether the mask exposes it
  Actions(SourceArgs),
  /// List the parameters of one action and how the mask treats each
  #[command(alias = "params")]
  Parameters(ParameterArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParameterArgs {
  /// Operation id, or the alias the mask gives it
  #[arg(short, long, value_name = "NAME")]
  pub action: String,

  #[command(flatten)]
  pub source: SourceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
  /// Directory holding the inputs; named_actions.yaml is written here
  #[arg(short, long, value_name = "DIR")]
  pub path: PathBuf,

  /// Mask file, relative to --path (defaults to mask.yaml, optional when absent)
  #[arg(short, long, value_name = "FILE")]
  pub mask: Option<String>,

  /// OpenAPI document, relative to --path, or an http(s) URL
  #[arg(short, long, value_name = "FILE|URL", default_value = "openapi.yaml")]
  pub openapi: String,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

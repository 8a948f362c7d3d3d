#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, GenerateCommands, ListCommands, colors};

mod generator;
mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Actions(args) => ui::commands::list_actions(args, &colors).await?,
      ListCommands::Parameters(args) => ui::commands::list_parameters(args, &colors).await?,
    },
    Commands::Generate { generate_command } => match generate_command {
      GenerateCommands::NamedActions(args) => {
        let config = ui::commands::GenerateConfig::from_args(args)?;
        ui::commands::generate_named_actions(config, &colors).await?;
      }
    },
  }

  Ok(())
}

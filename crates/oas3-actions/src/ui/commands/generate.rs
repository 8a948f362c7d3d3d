use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    constants::{DEFAULT_MASK_FILE, NAMED_ACTIONS_FILE},
    mask::Mask,
    metrics::GenerationStats,
    orchestrator::Orchestrator,
  },
  ui::{Colors, cli::SourceArgs},
  utils::spec::{SpecLoader, SpecSource},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Resolved command-line inputs shared by `generate` and `list`.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub directory: PathBuf,
  pub source: SpecSource,
  pub mask: PathBuf,
  /// An explicitly named mask must exist; the default `mask.yaml` may be absent.
  pub mask_required: bool,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_args(args: SourceArgs) -> anyhow::Result<Self> {
    let SourceArgs {
      path,
      mask,
      openapi,
      verbose,
      quiet,
    } = args;

    let directory = if path.is_absolute() {
      path
    } else {
      std::env::current_dir()
        .context("failed to resolve the current directory")?
        .join(path)
    };

    let mask_required = mask.is_some();
    let mask = directory.join(mask.as_deref().unwrap_or(DEFAULT_MASK_FILE));
    let source = SpecSource::resolve(&directory, &openapi);

    Ok(Self {
      directory,
      source,
      mask,
      mask_required,
      verbose,
      quiet,
    })
  }

  pub async fn load_orchestrator(&self) -> anyhow::Result<Orchestrator> {
    let loader = SpecLoader::open(&self.source).await?;
    let spec = loader
      .parse()
      .with_context(|| format!("failed to parse OpenAPI document {}", self.source))?;
    let declared_security = loader
      .declared_security()
      .with_context(|| format!("failed to read operation security of {}", self.source))?;
    let mask = Mask::load(&self.mask, self.mask_required).await?;
    Ok(Orchestrator::new(spec, mask).with_declared_security(declared_security))
  }

  #[must_use]
  pub fn output_path(&self) -> PathBuf {
    self.directory.join(NAMED_ACTIONS_FILE)
  }

  async fn write_output(&self, yaml: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&self.directory).await?;
    let output = self.output_path();
    tokio::fs::write(&output, yaml)
      .await
      .with_context(|| format!("failed to write {}", output.display()))
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.source)
        .with(self.colors.primary())
        .to_string(),
    );
    if self.config.verbose {
      self.info(
        &format!("Using mask: {}", self.config.mask.display())
          .with(self.colors.muted())
          .to_string(),
      );
    }
  }

  fn log_generating(&self) {
    self.info(&"Generating named actions...".with(self.colors.primary()).to_string());
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output_path().display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Operations extracted:", stats.operations_extracted.to_string());
    self.stat("Actions discovered:", stats.actions_discovered.to_string());
    self.stat("Actions generated:", stats.actions_generated.to_string());
    if stats.actions_filtered > 0 {
      self.stat("", format!("{} excluded by mask", stats.actions_filtered));
    }
    self.stat("Parameters generated:", stats.parameters_generated.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_skipped == 0 {
      return;
    }

    self.stat("Recursive refs skipped:", stats.cycles_skipped.to_string());

    if self.config.verbose {
      for (i, chain) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          chain.join(" -> ").with(self.colors.muted())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let shown: Vec<_> = stats
      .warnings
      .iter()
      .filter(|warning| warning.is_mask_mismatch() || self.config.verbose)
      .collect();
    if shown.is_empty() {
      return;
    }

    println!();
    for warning in shown {
      let label = if warning.is_mask_mismatch() { "Mask:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated named actions".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_named_actions(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let orchestrator = config.load_orchestrator().await?;

  logger.log_generating();
  let output = orchestrator.generate()?;
  logger.print_statistics(&output.stats);

  logger.log_writing();
  config.write_output(&output.yaml).await?;

  logger.log_success();
  Ok(())
}

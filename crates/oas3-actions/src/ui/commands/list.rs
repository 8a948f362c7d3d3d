use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;

use super::GenerateConfig;
use crate::{
  generator::{mask::Mask, operations::SecurityDefinition},
  ui::{
    Colors,
    cli::{ParameterArgs, SourceArgs},
    colors::IntoComfyColor,
    term_width,
  },
};

fn alias_status(alias: Option<&String>) -> String {
  match alias.filter(|alias| !alias.is_empty()) {
    Some(alias) => format!("as {alias}"),
    None => "exposed".to_string(),
  }
}

/// How the mask treats a discovered operation. Only the original id selects a mask entry.
fn mask_status(mask: &Mask, operation_id: &str) -> String {
  if mask.is_empty() {
    return "all".to_string();
  }
  match mask.actions.get(operation_id) {
    Some(action) => alias_status(action.alias.as_ref()),
    None => "excluded".to_string(),
  }
}

/// How the mask treats one parameter of `action_name`, which may be an action alias.
fn parameter_status(mask: &Mask, action_name: &str, param_name: &str) -> String {
  if mask.is_empty() {
    return "all".to_string();
  }
  match mask.parameter(action_name, param_name) {
    Some(param) => alias_status(param.alias.as_ref()),
    None if mask.action(action_name).is_some() => "excluded".to_string(),
    None => "action excluded".to_string(),
  }
}

fn new_table(colors: &Colors, titles: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in titles {
    header.add_cell(Cell::new(title).fg(colors.label().into_comfy()));
  }
  table.set_header(header);
  table
}

fn auth_providers(security: &[SecurityDefinition]) -> String {
  if security.is_empty() {
    return "-".to_string();
  }
  security
    .iter()
    .map(|requirement| {
      if requirement.scopes.is_empty() {
        requirement.provider_name.clone()
      } else {
        format!("{}[{}]", requirement.provider_name, requirement.scopes.join(" "))
      }
    })
    .join(", ")
}

pub async fn list_actions(args: SourceArgs, colors: &Colors) -> anyhow::Result<()> {
  let config = GenerateConfig::from_args(args)?;
  let orchestrator = config.load_orchestrator().await?;
  let discovered = orchestrator.discover()?;

  let mut table = new_table(colors, &["OPERATION ID", "METHOD", "PATH", "PARAMS", "AUTH", "MASK"]);

  for action in &discovered.actions {
    let Some(operation) = discovered.operations.get(&action.name) else {
      continue;
    };

    let mut row = Row::new();
    row.add_cell(
      Cell::new(&action.name)
        .fg(colors.value().into_comfy())
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(operation.method.as_str())
        .fg(colors.accent().into_comfy())
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&action.entry_point).fg(colors.primary().into_comfy()));
    row.add_cell(
      Cell::new(action.parameters.len())
        .fg(colors.muted().into_comfy())
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(auth_providers(&operation.security)).fg(colors.muted().into_comfy()));
    row.add_cell(Cell::new(mask_status(orchestrator.mask(), &action.name)).fg(colors.success().into_comfy()));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

pub async fn list_parameters(args: ParameterArgs, colors: &Colors) -> anyhow::Result<()> {
  let ParameterArgs { action: name, source } = args;
  let config = GenerateConfig::from_args(source)?;
  let orchestrator = config.load_orchestrator().await?;
  let mask = orchestrator.mask();
  let operation_id = mask.original_action_name(&name);

  let discovered = orchestrator.discover()?;
  let Some(action) = discovered.actions.iter().find(|action| action.name == operation_id) else {
    anyhow::bail!("no operation named '{name}' in {}", config.source);
  };

  let mut table = new_table(colors, &["PARAMETER", "TYPE", "REQUIRED", "INDEX", "MASK"]);
  for (param_name, param) in &action.parameters {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(param_name)
        .fg(colors.value().into_comfy())
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(param.category.as_ref().map_or("-", |category| category.as_str())).fg(colors.accent().into_comfy()),
    );
    row.add_cell(Cell::new(if param.required { "yes" } else { "no" }).fg(colors.primary().into_comfy()));
    row.add_cell(
      Cell::new(param.index)
        .fg(colors.muted().into_comfy())
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(parameter_status(mask, &name, param_name)).fg(colors.success().into_comfy()));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

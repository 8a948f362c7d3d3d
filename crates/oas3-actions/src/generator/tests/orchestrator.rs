use serde_json::json;

use super::support::{GRAFANA_MASK, grafana_spec, parse_mask, spec_with};
use crate::generator::{
  mask::Mask, metrics::GenerationWarning, named_actions::NamedActionsGroup, orchestrator::Orchestrator,
};

#[test]
fn grafana_catalog_is_generated_end_to_end() -> anyhow::Result<()> {
  let output = Orchestrator::new(grafana_spec(), parse_mask(GRAFANA_MASK)).generate()?;

  assert_eq!(output.stats.operations_extracted, 1);
  assert_eq!(output.stats.actions_discovered, 1);
  assert_eq!(output.stats.actions_generated, 1);
  assert_eq!(output.stats.parameters_generated, 9);
  assert_eq!(output.stats.cycles_skipped, 0);
  assert!(output.stats.warnings.is_empty());

  let reparsed: NamedActionsGroup = serde_yaml::from_str(&output.yaml)?;
  assert_eq!(reparsed, output.group);
  Ok(())
}

#[test]
fn extraction_and_cycle_findings_reach_the_stats() -> anyhow::Result<()> {
  let spec: oas3::Spec = serde_json::from_value(json!({
    "openapi": "3.0.3",
    "info": { "title": "Folders", "version": "1" },
    "paths": {
      "/api/v1/folders": { "post": {
        "operationId": "CreateFolder",
        "requestBody": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Folder" }
        } } }
      } },
      "/api/v2/folders": { "post": {
        "operationId": "CreateFolder",
        "requestBody": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Folder" }
        } } }
      } }
    },
    "components": { "schemas": {
      "Folder": {
        "type": "object",
        "properties": {
          "title": { "type": "string" },
          "parent": { "$ref": "#/components/schemas/Folder" }
        }
      }
    } }
  }))?;

  let output = Orchestrator::new(spec, Mask::default()).generate()?;

  assert_eq!(output.stats.operations_extracted, 1);
  assert_eq!(output.stats.actions_generated, 1);
  // The surviving operation contributes one cycle; the replaced one is never discovered.
  assert_eq!(output.stats.cycles_skipped, 1);
  assert_eq!(output.stats.cycle_details, vec![vec!["Folder".to_string(), "Folder".to_string()]]);

  assert!(matches!(
    output.stats.warnings.as_slice(),
    [
      GenerationWarning::DuplicateOperationId { .. },
      GenerationWarning::MissingServer,
    ]
  ));
  assert_eq!(
    output.group.actions[0].action_to_run_param_values["url"],
    "{{'' + '/api/v2/folders'}}"
  );

  let keys: Vec<&str> = output.group.actions[0].parameters.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["parent__title", "title"]);
  Ok(())
}

#[test]
fn structural_errors_abort_generation() {
  let spec = spec_with(
    json!({ "/api/teams/{teamId}": { "get": { "operationId": "GetTeam" } } }),
    json!({}),
  );

  let result = Orchestrator::new(spec, Mask::default()).generate();
  assert!(result.is_err());
}

#[test]
fn discovery_ignores_the_mask() -> anyhow::Result<()> {
  let orchestrator = Orchestrator::new(grafana_spec(), parse_mask("actions:\n  Unrelated:\n"));
  let discovered = orchestrator.discover()?;

  assert_eq!(discovered.actions.len(), 1);
  assert_eq!(discovered.actions[0].parameters.len(), 12);

  let output = orchestrator.generate()?;
  assert!(output.group.actions.is_empty());
  assert_eq!(output.stats.actions_filtered, 1);
  Ok(())
}

use std::collections::BTreeMap;

use oas3::{Spec, spec::ObjectSchema};

use super::{
  body::BodyExpander,
  errors::CompileError,
  operations::{DeclaredSecurity, OperationDefinition, OperationRegistry},
  parameters::{ActionParameter, map_schema},
};

/// An operation seen as a callable action, before any mask is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
  pub name: String,
  pub description: String,
  pub enabled: bool,
  /// Path template of the operation.
  pub entry_point: String,
  /// Keyed by parameter name; body leaves use delimited paths.
  pub parameters: BTreeMap<String, ActionParameter>,
}

/// Everything extracted from one document.
#[derive(Debug)]
pub struct DiscoveredApi {
  pub operations: OperationRegistry,
  /// Sorted by name.
  pub actions: Vec<Action>,
  /// Reference chains the body cycle guard cut short.
  pub skipped_cycles: Vec<Vec<String>>,
}

pub fn discover(spec: &Spec, declared: &DeclaredSecurity) -> Result<DiscoveredApi, CompileError> {
  let operations = OperationRegistry::extract(spec, declared)?;
  let mut actions = Vec::with_capacity(operations.len());
  let mut skipped_cycles = vec![];

  for operation in operations.operations() {
    let (action, cycles) = discover_action(spec, operation)?;
    actions.push(action);
    skipped_cycles.extend(cycles);
  }
  actions.sort_by(|a, b| a.name.cmp(&b.name));

  Ok(DiscoveredApi {
    operations,
    actions,
    skipped_cycles,
  })
}

fn discover_action(spec: &Spec, operation: &OperationDefinition) -> Result<(Action, Vec<Vec<String>>), CompileError> {
  let untyped = ObjectSchema::default();
  let mut parameters: BTreeMap<String, ActionParameter> = operation
    .all_params()
    .map(|param| {
      let schema = param.schema.as_ref().unwrap_or(&untyped);
      (param.name.clone(), map_schema(schema, param.required, param.description()))
    })
    .collect();

  let cycles = if let Some(body) = operation.default_body()
    && let Some(schema) = &body.schema
  {
    BodyExpander::new(spec, &mut parameters).expand_root(schema, body.required)?
  } else {
    vec![]
  };

  let action = Action {
    name: operation.operation_id.clone(),
    description: operation.summary.clone(),
    enabled: true,
    entry_point: operation.path.clone(),
    parameters,
  };
  Ok((action, cycles))
}

use std::collections::BTreeMap;

use bon::Builder;
use oas3::Spec;
use serde::{Deserialize, Serialize};

use super::{
  constants::{BODY_VALUE_KEY, CONTENT_TYPE_VALUE_KEY, HTTP_ACTION_NAMESPACE, URL_VALUE_KEY},
  discovery::Action,
  errors::CompileError,
  mask::{Mask, MaskedAction, MaskedActionParameter},
  metrics::{GenerationStats, GenerationWarning},
  naming::display_name,
  operations::{OperationDefinition, OperationRegistry},
  parameters::{ActionParameter, ParamCategory},
  templates::{body_template, default_host, host_expression, path_expression, url_template},
};

/// One catalog entry: a callable action bound to the runtime's HTTP action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct NamedAction {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub display_name: String,
  #[builder(default, into)]
  pub description: String,
  #[builder(default = true)]
  pub enabled: bool,
  #[builder(default)]
  pub parameters: BTreeMap<String, ActionParameter>,
  #[builder(into)]
  pub action_to_run: String,
  #[builder(default)]
  pub action_to_run_param_values: BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_connection_optional: Option<bool>,
}

/// Root of `named_actions.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedActionsGroup {
  pub name: String,
  pub connection_types: BTreeMap<String, serde_yaml::Value>,
  pub icon_uri: String,
  pub is_connection_optional: bool,
  pub actions: Vec<NamedAction>,
}

impl NamedActionsGroup {
  pub fn to_yaml(&self) -> Result<String, CompileError> {
    serde_yaml::to_string(self).map_err(CompileError::CatalogSerialize)
  }
}

/// Combines discovered actions with the mask into catalog entries.
pub(crate) struct NamedActionGenerator<'a> {
  spec: &'a Spec,
  mask: &'a Mask,
  operations: &'a OperationRegistry,
}

impl<'a> NamedActionGenerator<'a> {
  pub(crate) fn new(spec: &'a Spec, mask: &'a Mask, operations: &'a OperationRegistry) -> Self {
    Self { spec, mask, operations }
  }

  /// `actions` must be sorted by name; the catalog keeps that order.
  pub(crate) fn generate(&self, actions: &[Action], stats: &mut GenerationStats) -> Result<NamedActionsGroup, CompileError> {
    stats.record_warnings(self.mask_mismatches(actions));

    let mut named_actions = Vec::with_capacity(actions.len());
    for action in actions {
      // Discovered names are original operation ids; aliases only name runtime calls.
      let masked = self.mask.actions.get(&action.name);
      if !self.mask.is_empty() && masked.is_none() {
        stats.record_filtered();
        continue;
      }

      let operation = self
        .operations
        .get(&action.name)
        .ok_or_else(|| CompileError::MissingOperation(action.name.clone()))?;

      let named_action = self.named_action(action, masked, operation)?;
      stats.record_generated(named_action.parameters.len());
      named_actions.push(named_action);
    }

    Ok(NamedActionsGroup {
      name: self.mask.name.clone(),
      connection_types: self.mask.connection_types.clone(),
      icon_uri: self.mask.icon_uri.clone(),
      is_connection_optional: self.mask.is_connection_optional,
      actions: named_actions,
    })
  }

  fn named_action(
    &self,
    action: &Action,
    masked: Option<&MaskedAction>,
    operation: &OperationDefinition,
  ) -> Result<NamedAction, CompileError> {
    let label = masked
      .and_then(|m| m.display_name.as_ref().or(m.alias.as_ref()))
      .filter(|label| !label.is_empty())
      .cloned()
      .unwrap_or_else(|| display_name(&action.name));

    let description = masked
      .and_then(|m| m.description.clone())
      .unwrap_or_else(|| action.description.clone());

    Ok(
      NamedAction::builder()
        .name(action.name.clone())
        .display_name(label)
        .description(description)
        .enabled(action.enabled)
        .parameters(action_parameters(action, masked))
        .action_to_run(format!(
          "{HTTP_ACTION_NAMESPACE}.{}",
          operation.method.as_str().to_lowercase()
        ))
        .action_to_run_param_values(self.param_values(action, operation)?)
        .maybe_is_connection_optional(masked.and_then(|m| m.is_connection_optional))
        .build(),
    )
  }

  fn param_values(&self, action: &Action, operation: &OperationDefinition) -> Result<BTreeMap<String, String>, CompileError> {
    let mut values = BTreeMap::new();

    let host = host_expression(self.mask, &default_host(&operation.servers).unwrap_or_default());
    let path = path_expression(&operation.path, &operation.path_params);
    values.insert(
      URL_VALUE_KEY.to_string(),
      url_template(&host, &path, &operation.query_params),
    );

    if let Some(body) = operation.default_body() {
      let template = match &body.schema {
        Some(schema) => body_template(action.parameters.keys().map(String::as_str), schema, self.spec).map_err(
          |source| CompileError::BodyTemplate {
            action: action.name.clone(),
            source,
          },
        )?,
        None => "{}".to_string(),
      };
      values.insert(BODY_VALUE_KEY.to_string(), template);
      values.insert(CONTENT_TYPE_VALUE_KEY.to_string(), body.content_type.clone());
    }

    Ok(values)
  }

  fn mask_mismatches(&self, actions: &[Action]) -> Vec<GenerationWarning> {
    let mut warnings = vec![];

    for (action_name, masked) in &self.mask.actions {
      let Some(action) = actions.iter().find(|action| &action.name == action_name) else {
        warnings.push(GenerationWarning::MaskActionNotFound {
          action: action_name.clone(),
        });
        continue;
      };

      for parameter in masked.parameters.keys() {
        if !action.parameters.contains_key(parameter) {
          warnings.push(GenerationWarning::MaskParameterNotFound {
            action: action_name.clone(),
            parameter: parameter.clone(),
          });
        }
      }
    }

    warnings
  }
}

/// With a mask entry only the parameters it lists are kept, each with its overrides.
/// Without one every parameter passes through. Uncategorized parameters become JSON.
fn action_parameters(action: &Action, masked: Option<&MaskedAction>) -> BTreeMap<String, ActionParameter> {
  action
    .parameters
    .iter()
    .filter_map(|(name, param)| {
      let mut param = param.clone();
      match masked {
        Some(masked_action) => apply_override(&mut param, name, masked_action.parameters.get(name)?),
        None => param.display_name = display_name(name),
      }
      if param.category.is_none() {
        param.category = Some(ParamCategory::Json);
      }
      Some((name.clone(), param))
    })
    .collect()
}

fn apply_override(param: &mut ActionParameter, name: &str, over: &MaskedActionParameter) {
  param.display_name = over
    .alias
    .clone()
    .filter(|alias| !alias.is_empty())
    .unwrap_or_else(|| display_name(name));

  if over.index != 0 {
    param.index = over.index;
  }
  if let Some(required) = over.required {
    param.required = required;
  }
  if let Some(param_type) = over.param_type.as_deref().filter(|t| !t.is_empty()) {
    param.category = Some(ParamCategory::parse(param_type));
  }
  if let Some(default) = &over.default {
    param.default.clone_from(default);
  }
  if let Some(description) = &over.description {
    param.description.clone_from(description);
  }
  param.is_multi |= over.is_multi;
}

use std::{
  collections::{BTreeMap, HashMap},
  path::Path,
};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::CompileError;

/// Per-parameter override inside a [`MaskedAction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskedActionParameter {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub required: Option<bool>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub param_type: Option<String>,
  /// Zero keeps the inferred index.
  pub index: i64,
  pub is_multi: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskedAction {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_connection_optional: Option<bool>,
  #[serde(deserialize_with = "nullable_entries")]
  pub parameters: BTreeMap<String, MaskedActionParameter>,
}

/// Override document selecting, renaming and re-describing the actions of a catalog.
///
/// A mask with no actions exposes every operation unchanged. Once any action is
/// listed, the listed actions and their listed parameters are the only ones emitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mask {
  /// Connection whose `REQUEST_URL` replaces the server URL when the connection sets it.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_url_conn_type: Option<String>,
  /// Connection whose `REQUEST_URL` always replaces the server URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_url: Option<String>,
  #[serde(deserialize_with = "nullable_entries")]
  pub actions: BTreeMap<String, MaskedAction>,
  pub name: String,
  pub connection_types: BTreeMap<String, serde_yaml::Value>,
  pub icon_uri: String,
  pub is_connection_optional: bool,

  #[serde(skip)]
  reverse_action_aliases: HashMap<String, String>,
  #[serde(skip)]
  reverse_parameter_aliases: HashMap<String, HashMap<String, String>>,
}

/// YAML `key:` with no value reads as an empty override.
fn nullable_entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  let entries = Option::<BTreeMap<String, Option<T>>>::deserialize(deserializer)?;
  Ok(
    entries
      .unwrap_or_default()
      .into_iter()
      .map(|(name, value)| (name, value.unwrap_or_default()))
      .collect(),
  )
}

/// Mask files in the wild escape characters that YAML would otherwise reject, so every
/// backslash is removed before parsing. Literal backslashes cannot be expressed.
#[must_use]
pub fn strip_escapes(raw: &str) -> String {
  raw.replace('\\', "")
}

impl Mask {
  /// Parses mask YAML and builds the alias lookups. Empty text is the empty mask.
  pub fn parse(raw: &str) -> Result<Self, CompileError> {
    let cleaned = strip_escapes(raw);
    let mut mask = if cleaned.trim().is_empty() {
      Self::default()
    } else {
      serde_yaml::from_str::<Self>(&cleaned).map_err(CompileError::MaskParse)?
    };

    mask.build_alias_maps()?;
    Ok(mask)
  }

  /// Reads a mask file. A missing file is the empty mask unless `required` is set.
  pub async fn load(path: &Path, required: bool) -> anyhow::Result<Self> {
    let raw = match tokio::fs::read_to_string(path).await {
      Ok(raw) => raw,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => return Ok(Self::default()),
      Err(err) => return Err(err).with_context(|| format!("failed to read mask {}", path.display())),
    };

    Self::parse(&raw).with_context(|| format!("invalid mask {}", path.display()))
  }

  fn build_alias_maps(&mut self) -> Result<(), CompileError> {
    let mut actions = HashMap::new();
    let mut parameters = HashMap::new();

    for (action_name, action) in &self.actions {
      if let Some(alias) = action.alias.as_ref().filter(|alias| !alias.is_empty()) {
        if alias != action_name && self.actions.contains_key(alias) {
          return Err(CompileError::ShadowingActionAlias {
            alias: alias.clone(),
            action: action_name.clone(),
          });
        }
        if let Some(first) = actions.insert(alias.clone(), action_name.clone()) {
          return Err(CompileError::DuplicateActionAlias {
            alias: alias.clone(),
            first,
            second: action_name.clone(),
          });
        }
      }

      let aliases: HashMap<String, String> = action
        .parameters
        .iter()
        .filter_map(|(param_name, param)| {
          param
            .alias
            .as_ref()
            .filter(|alias| !alias.is_empty())
            .map(|alias| (alias.clone(), param_name.clone()))
        })
        .collect();
      if !aliases.is_empty() {
        parameters.insert(action_name.clone(), aliases);
      }
    }

    self.reverse_action_aliases = actions;
    self.reverse_parameter_aliases = parameters;
    Ok(())
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }

  /// Original action name for an alias, or `name` itself when it is not an alias.
  #[must_use]
  pub fn original_action_name<'a>(&'a self, name: &'a str) -> &'a str {
    self.reverse_action_aliases.get(name).map_or(name, String::as_str)
  }

  /// Looks an action up by original name or alias.
  #[must_use]
  pub fn action(&self, name: &str) -> Option<&MaskedAction> {
    self.actions.get(self.original_action_name(name))
  }

  /// Original parameter name for an alias within `action_name`, or `param_name` itself.
  #[must_use]
  pub fn original_parameter_name<'a>(&'a self, action_name: &str, param_name: &'a str) -> &'a str {
    self
      .reverse_parameter_aliases
      .get(self.original_action_name(action_name))
      .and_then(|aliases| aliases.get(param_name))
      .map_or(param_name, String::as_str)
  }

  /// Looks a parameter override up; both the action and the parameter may be aliases.
  #[must_use]
  pub fn parameter(&self, action_name: &str, param_name: &str) -> Option<&MaskedActionParameter> {
    self
      .action(action_name)?
      .parameters
      .get(self.original_parameter_name(action_name, param_name))
  }

  #[cfg(test)]
  pub fn reverse_action_aliases(&self) -> &HashMap<String, String> {
    &self.reverse_action_aliases
  }

  #[cfg(test)]
  pub fn reverse_parameter_aliases(&self) -> &HashMap<String, HashMap<String, String>> {
    &self.reverse_parameter_aliases
  }
}

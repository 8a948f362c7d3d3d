use std::fmt;

use bon::Builder;
use itertools::Itertools;
use oas3::spec::{ObjectSchema, SchemaType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::constants::{ARRAY_DEFAULT_DELIMITER, DEFAULT_PARAM_INDEX, PLACEHOLDER_PREFIX};
use crate::utils::SchemaExt;

/// Input widget category the runtime renders for a parameter.
///
/// Masks may name categories this compiler never infers (`password`, `date_time`);
/// those survive as [`ParamCategory::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamCategory {
  String,
  Integer,
  Number,
  Bool,
  Array,
  Json,
  Dropdown,
  Custom(String),
}

impl ParamCategory {
  #[must_use]
  pub fn as_str(&self) -> &str {
    match self {
      Self::String => "string",
      Self::Integer => "integer",
      Self::Number => "number",
      Self::Bool => "bool",
      Self::Array => "array",
      Self::Json => "code:json",
      Self::Dropdown => "dropdown",
      Self::Custom(name) => name,
    }
  }

  #[must_use]
  pub fn parse(value: &str) -> Self {
    match value {
      "string" => Self::String,
      "integer" => Self::Integer,
      "number" => Self::Number,
      "bool" | "boolean" => Self::Bool,
      "array" => Self::Array,
      "code:json" | "object" => Self::Json,
      "dropdown" => Self::Dropdown,
      other => Self::Custom(other.to_string()),
    }
  }

  /// `object` becomes the json editor and `boolean` becomes `bool`; `null` has no widget.
  #[must_use]
  pub const fn from_schema_type(schema_type: SchemaType) -> Option<Self> {
    match schema_type {
      SchemaType::String => Some(Self::String),
      SchemaType::Integer => Some(Self::Integer),
      SchemaType::Number => Some(Self::Number),
      SchemaType::Boolean => Some(Self::Bool),
      SchemaType::Array => Some(Self::Array),
      SchemaType::Object => Some(Self::Json),
      SchemaType::Null => None,
    }
  }
}

impl fmt::Display for ParamCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ParamCategory {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ParamCategory {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Self::parse(&raw))
  }
}

/// User-facing metadata for one action parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct ActionParameter {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub category: Option<ParamCategory>,
  #[builder(default, into)]
  #[serde(default)]
  pub description: String,
  #[builder(default, into)]
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub placeholder: String,
  #[builder(default)]
  #[serde(default)]
  pub required: bool,
  #[builder(default, into)]
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub default: String,
  #[builder(default)]
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<String>,
  #[builder(default = DEFAULT_PARAM_INDEX)]
  #[serde(default = "default_index")]
  pub index: i64,
  #[builder(default, into)]
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub format: String,
  #[builder(default)]
  #[serde(default)]
  pub is_multi: bool,
  #[builder(default, into)]
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub display_name: String,
}

const fn default_index() -> i64 {
  DEFAULT_PARAM_INDEX
}

/// Maps one schema node onto parameter metadata.
#[must_use]
pub(crate) fn map_schema(schema: &ObjectSchema, required: bool, description: impl Into<String>) -> ActionParameter {
  let schema_type = schema.single_type_or_nullable();
  let options = schema.string_enum_values();

  let category = if options.is_empty() {
    schema_type.and_then(ParamCategory::from_schema_type)
  } else {
    Some(ParamCategory::Dropdown)
  };

  let placeholder = schema
    .example_value()
    .and_then(Value::as_str)
    .filter(|example| !example.is_empty())
    .map(|example| {
      if schema_type == Some(SchemaType::Object) {
        example.to_string()
      } else {
        format!("{PLACEHOLDER_PREFIX}{example}")
      }
    })
    .unwrap_or_default();

  ActionParameter::builder()
    .maybe_category(category)
    .description(description)
    .placeholder(placeholder)
    .required(required)
    .default(default_value(schema.default.as_ref(), schema_type))
    .options(options)
    .format(schema.format.clone().unwrap_or_default())
    .build()
}

fn default_value(default: Option<&Value>, schema_type: Option<SchemaType>) -> String {
  match (default, schema_type) {
    (None, _) => String::new(),
    (Some(value), Some(SchemaType::Array)) => value
      .as_array()
      .map(|items| items.iter().map(stringify).join(ARRAY_DEFAULT_DELIMITER))
      .unwrap_or_default(),
    (Some(value), _) => stringify(value),
  }
}

pub(crate) fn stringify(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(text) => text.clone(),
    other => other.to_string(),
  }
}

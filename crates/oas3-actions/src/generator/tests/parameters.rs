use oas3::spec::ObjectSchema;
use serde_json::json;

use crate::generator::parameters::{ActionParameter, ParamCategory, map_schema};

fn schema(value: serde_json::Value) -> ObjectSchema {
  serde_json::from_value(value).expect("valid schema")
}

#[test]
fn string_enum_becomes_dropdown() {
  let param = map_schema(
    &schema(json!({ "type": "string", "enum": ["Viewer", "Editor", "Admin"] })),
    true,
    "role",
  );
  assert_eq!(param.category, Some(ParamCategory::Dropdown));
  assert_eq!(param.options, vec!["Viewer", "Editor", "Admin"]);
  assert!(param.required);
  assert_eq!(param.description, "role");
}

#[test]
fn string_example_becomes_prefixed_placeholder() {
  let param = map_schema(&schema(json!({ "type": "string", "example": "browser" })), false, "");
  assert_eq!(param.category, Some(ParamCategory::String));
  assert_eq!(param.placeholder, "Example: browser");
}

#[test]
fn object_example_is_not_prefixed() {
  let param = map_schema(
    &schema(json!({ "type": "object", "example": "{\"panels\": []}" })),
    false,
    "",
  );
  assert_eq!(param.category, Some(ParamCategory::Json));
  assert_eq!(param.placeholder, "{\"panels\": []}");
}

#[test]
fn non_string_examples_leave_placeholder_empty() {
  let param = map_schema(&schema(json!({ "type": "integer", "example": 42 })), false, "");
  assert_eq!(param.category, Some(ParamCategory::Integer));
  assert!(param.placeholder.is_empty());
}

#[test]
fn array_default_is_comma_joined() {
  let param = map_schema(
    &schema(json!({ "type": "array", "items": { "type": "string" }, "default": ["a", "b", 3] })),
    false,
    "",
  );
  assert_eq!(param.category, Some(ParamCategory::Array));
  assert_eq!(param.default, "a,b,3");
}

#[test]
fn scalar_defaults_are_stringified() {
  let number = map_schema(&schema(json!({ "type": "number", "default": 1.5 })), false, "");
  assert_eq!(number.category, Some(ParamCategory::Number));
  assert_eq!(number.default, "1.5");

  let boolean = map_schema(&schema(json!({ "type": "boolean", "default": true })), false, "");
  assert_eq!(boolean.category, Some(ParamCategory::Bool));
  assert_eq!(boolean.default, "true");
}

#[test]
fn nullable_type_keeps_its_category() {
  let param = map_schema(&schema(json!({ "type": ["string", "null"] })), false, "");
  assert_eq!(param.category, Some(ParamCategory::String));
}

#[test]
fn untyped_schema_has_no_category() {
  let param = map_schema(&ObjectSchema::default(), false, "free-form");
  assert_eq!(param.category, None);
  assert_eq!(param.index, 999);
  assert!(!param.is_multi);
}

#[test]
fn format_is_copied() {
  let param = map_schema(&schema(json!({ "type": "string", "format": "uuid" })), false, "");
  assert_eq!(param.format, "uuid");
}

#[test]
fn categories_parse_mask_spellings() {
  assert_eq!(ParamCategory::parse("boolean"), ParamCategory::Bool);
  assert_eq!(ParamCategory::parse("object"), ParamCategory::Json);
  assert_eq!(
    ParamCategory::parse("password"),
    ParamCategory::Custom("password".to_string())
  );
  assert_eq!(ParamCategory::Json.to_string(), "code:json");
}

#[test]
fn empty_fields_are_omitted_from_yaml() -> anyhow::Result<()> {
  let param = ActionParameter::builder()
    .category(ParamCategory::String)
    .description("Team ID")
    .required(true)
    .build();

  let yaml = serde_yaml::to_string(&param)?;
  assert!(yaml.contains("type: string"));
  assert!(yaml.contains("index: 999"));
  assert!(!yaml.contains("placeholder"));
  assert!(!yaml.contains("options"));

  let back: ActionParameter = serde_yaml::from_str(&yaml)?;
  assert_eq!(back, param);
  Ok(())
}

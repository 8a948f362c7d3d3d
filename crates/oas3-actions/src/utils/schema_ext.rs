use oas3::spec::{ObjectOrReference, ObjectSchema, SchemaType, SchemaTypeSet};
use serde_json::Value;

/// Extension methods for `ObjectSchema` used while flattening schemas into parameters.
pub(crate) trait SchemaExt {
  /// Returns the single `SchemaType` if exactly one is defined, or the non-null type
  /// from a two-type nullable set (e.g., `[string, null]` -> `string`).
  fn single_type_or_nullable(&self) -> Option<SchemaType>;

  /// Returns true if the schema declares at least one property.
  fn has_properties(&self) -> bool;

  /// Iterates `allOf`, then `anyOf`, then `oneOf` branches.
  fn composition_branches(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>>;

  /// String members of the schema's `enum`, in declaration order.
  ///
  /// # Example
  /// ```text
  /// { "enum": ["active", "pending", 123] } => ["active", "pending"]
  /// ```
  fn string_enum_values(&self) -> Vec<String>;

  /// The schema's `example` keyword.
  fn example_value(&self) -> Option<&Value>;

  fn is_required(&self, property: &str) -> bool;
}

impl SchemaExt for ObjectSchema {
  fn single_type_or_nullable(&self) -> Option<SchemaType> {
    match self.schema_type.as_ref()? {
      SchemaTypeSet::Single(schema_type) => Some(*schema_type),
      SchemaTypeSet::Multiple(types) => {
        let mut non_null = types.iter().filter(|t| **t != SchemaType::Null);
        match (non_null.next(), non_null.next()) {
          (Some(schema_type), None) if types.len() == 2 => Some(*schema_type),
          _ => None,
        }
      }
    }
  }

  fn has_properties(&self) -> bool {
    !self.properties.is_empty()
  }

  fn composition_branches(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>> {
    self.all_of.iter().chain(&self.any_of).chain(&self.one_of)
  }

  fn string_enum_values(&self) -> Vec<String> {
    self
      .enum_values
      .iter()
      .filter_map(|value| value.as_str().map(str::to_string))
      .collect()
  }

  fn example_value(&self) -> Option<&Value> {
    self.example.as_ref()
  }

  fn is_required(&self, property: &str) -> bool {
    self.required.iter().any(|name| name == property)
  }
}

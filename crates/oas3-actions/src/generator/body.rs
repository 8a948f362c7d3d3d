use std::collections::BTreeMap;

use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema},
};

use super::{
  constants::BODY_PARAM_DELIMITER,
  errors::CompileError,
  parameters::{ActionParameter, map_schema},
};
use crate::utils::{ResolveExt, SchemaExt, extract_schema_ref_name, reference_description};

/// Joins a parent path and a property name with the body delimiter.
#[must_use]
pub fn join_path(parent: &str, name: &str) -> String {
  if parent.is_empty() {
    name.to_string()
  } else {
    format!("{parent}{BODY_PARAM_DELIMITER}{name}")
  }
}

/// Flattens a request body schema into delimited leaf parameters.
///
/// Named references are tracked on a stack for the current branch; a property whose
/// reference is already on the stack is skipped, which bounds recursive schemas.
pub(crate) struct BodyExpander<'a> {
  spec: &'a Spec,
  parameters: &'a mut BTreeMap<String, ActionParameter>,
  ref_stack: Vec<String>,
  skipped: Vec<Vec<String>>,
}

impl<'a> BodyExpander<'a> {
  pub(crate) fn new(spec: &'a Spec, parameters: &'a mut BTreeMap<String, ActionParameter>) -> Self {
    Self {
      spec,
      parameters,
      ref_stack: vec![],
      skipped: vec![],
    }
  }

  /// Expands `schema` at the root and returns the reference chains cut by the cycle guard.
  pub(crate) fn expand_root(mut self, schema: &ObjectSchema, required: bool) -> Result<Vec<Vec<String>>, CompileError> {
    self.expand(schema, "", required)?;
    Ok(self.skipped)
  }

  fn expand(&mut self, schema: &ObjectSchema, parent: &str, parents_required: bool) -> Result<(), CompileError> {
    self.expand_composition(schema, parent, parents_required)?;

    for (name, property_ref) in &schema.properties {
      let path = join_path(parent, name);
      let Some((property, pushed)) = self.enter(property_ref, &path)? else {
        continue;
      };

      let required = parents_required && schema.is_required(name);
      let result = if property.has_properties() {
        self.expand(&property, &path, required)
      } else {
        self.expand_leaf(&property, property_ref, &path, required)
      };

      self.leave(pushed);
      result?;
    }

    Ok(())
  }

  fn expand_leaf(
    &mut self,
    property: &ObjectSchema,
    property_ref: &ObjectOrReference<ObjectSchema>,
    path: &str,
    required: bool,
  ) -> Result<(), CompileError> {
    self.expand_composition(property, path, required)?;

    let description = property
      .description
      .as_deref()
      .filter(|text| !text.is_empty())
      .or_else(|| reference_description(property_ref))
      .unwrap_or_default();

    self
      .parameters
      .insert(path.to_string(), map_schema(property, required, description));
    Ok(())
  }

  /// `allOf`/`anyOf`/`oneOf` branches contribute properties at the same path.
  fn expand_composition(&mut self, schema: &ObjectSchema, path: &str, required: bool) -> Result<(), CompileError> {
    for branch_ref in schema.composition_branches() {
      let Some((branch, pushed)) = self.enter(branch_ref, path)? else {
        continue;
      };
      let result = self.expand(&branch, path, required);
      self.leave(pushed);
      result?;
    }
    Ok(())
  }

  /// Resolves a node unless its reference is already active. The flag says whether a
  /// reference name was pushed and must be popped by [`Self::leave`].
  fn enter(
    &mut self,
    node: &ObjectOrReference<ObjectSchema>,
    path: &str,
  ) -> Result<Option<(ObjectSchema, bool)>, CompileError> {
    let ref_name = extract_schema_ref_name(node);

    if let Some(name) = &ref_name
      && self.ref_stack.contains(name)
    {
      let mut chain = self.ref_stack.clone();
      chain.push(name.clone());
      self.skipped.push(chain);
      return Ok(None);
    }

    let context = if path.is_empty() {
      "request body".to_string()
    } else {
      format!("body property '{path}'")
    };
    let schema = node.resolve_in(self.spec, &context)?;

    let pushed = match ref_name {
      Some(name) => {
        self.ref_stack.push(name);
        true
      }
      None => false,
    };
    Ok(Some((schema, pushed)))
  }

  fn leave(&mut self, pushed: bool) {
    if pushed {
      self.ref_stack.pop();
    }
  }
}

use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Parameter, Ref, RequestBody},
};

use crate::generator::errors::CompileError;

/// Parses a `$ref` path and returns the referenced component's short name.
///
/// Only internal references (`#/components/...`) have a name. External
/// documents and malformed pointers return `None`.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  if !ref_path.starts_with("#/components") {
    return None;
  }

  ref_path.parse::<Ref>().ok().map(|component| component.name)
}

/// Short name of the component an [`ObjectOrReference`] points at, `None` for inline schemas.
pub fn extract_schema_ref_name(obj_ref: &ObjectOrReference<ObjectSchema>) -> Option<String> {
  match obj_ref {
    ObjectOrReference::Ref { ref_path, .. } => parse_schema_ref_path(ref_path),
    ObjectOrReference::Object(_) => None,
  }
}

/// Description carried on the reference wrapper itself (`$ref` siblings), if any.
pub fn reference_description(obj_ref: &ObjectOrReference<ObjectSchema>) -> Option<&str> {
  match obj_ref {
    ObjectOrReference::Ref { description, .. } => description.as_deref(),
    ObjectOrReference::Object(_) => None,
  }
}

/// Resolves an inline-or-reference node into an owned value, turning resolver failures
/// into [`CompileError::UnresolvedReference`].
pub(crate) trait ResolveExt<T> {
  fn resolve_in(&self, spec: &Spec, context: &str) -> Result<T, CompileError>;
}

macro_rules! impl_resolve_ext {
  ($($target:ty),+ $(,)?) => {
    $(
      impl ResolveExt<$target> for ObjectOrReference<$target> {
        fn resolve_in(&self, spec: &Spec, context: &str) -> Result<$target, CompileError> {
          self.resolve(spec).map_err(|err| CompileError::UnresolvedReference {
            reference: reference_path(self).to_string(),
            context: context.to_string(),
            reason: err.to_string(),
          })
        }
      }
    )+
  };
}

impl_resolve_ext!(ObjectSchema, Parameter, RequestBody);

fn reference_path<T>(obj_ref: &ObjectOrReference<T>) -> &str {
  match obj_ref {
    ObjectOrReference::Ref { ref_path, .. } => ref_path,
    ObjectOrReference::Object(_) => "<inline>",
  }
}

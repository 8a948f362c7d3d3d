use std::collections::{BTreeMap, HashSet};

use http::Method;
use indexmap::IndexMap;
use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem, RequestBody, Server},
};
use serde::{Deserialize, de::IgnoredAny};
use strum::Display;

use super::{
  constants::PREFERRED_CONTENT_TYPE, errors::CompileError, metrics::GenerationWarning, parsed_path::sort_params_by_path,
};
use crate::utils::ResolveExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
}

impl From<ParameterIn> for ParameterLocation {
  fn from(location: ParameterIn) -> Self {
    match location {
      ParameterIn::Path => Self::Path,
      ParameterIn::Query => Self::Query,
      ParameterIn::Header => Self::Header,
      ParameterIn::Cookie => Self::Cookie,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ParameterDefinition {
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub raw: Parameter,
  /// `raw.schema` with any `$ref` resolved.
  pub schema: Option<ObjectSchema>,
}

impl ParameterDefinition {
  /// Schema description first, then the parameter's own description.
  #[must_use]
  pub fn description(&self) -> String {
    self
      .schema
      .as_ref()
      .and_then(|schema| schema.description.clone())
      .filter(|text| !text.is_empty())
      .or_else(|| self.raw.description.clone())
      .unwrap_or_default()
  }
}

#[derive(Debug, Clone)]
pub struct RequestBodyDefinition {
  pub content_type: String,
  pub required: bool,
  pub schema: Option<ObjectSchema>,
  pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityDefinition {
  pub provider_name: String,
  pub scopes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OperationDefinition {
  pub operation_id: String,
  pub method: Method,
  pub path: String,
  pub summary: String,
  /// Ordered by position in the path template.
  pub path_params: Vec<ParameterDefinition>,
  pub query_params: Vec<ParameterDefinition>,
  pub header_params: Vec<ParameterDefinition>,
  pub cookie_params: Vec<ParameterDefinition>,
  pub bodies: Vec<RequestBodyDefinition>,
  pub body_required: bool,
  pub security: Vec<SecurityDefinition>,
  /// Operation servers, else path item servers, else document servers.
  pub servers: Vec<Server>,
}

impl OperationDefinition {
  pub fn all_params(&self) -> impl Iterator<Item = &ParameterDefinition> {
    self
      .query_params
      .iter()
      .chain(&self.header_params)
      .chain(&self.cookie_params)
      .chain(&self.path_params)
  }

  #[must_use]
  pub fn default_body(&self) -> Option<&RequestBodyDefinition> {
    self.bodies.iter().find(|body| body.is_default)
  }

  #[must_use]
  pub fn default_body_type(&self) -> Option<&str> {
    self.default_body().map(|body| body.content_type.as_str())
  }

  fn build(
    spec: &Spec,
    path: &str,
    path_item: &PathItem,
    method: Method,
    operation: &Operation,
    globals: &[ParameterDefinition],
    declared: &DeclaredSecurity,
  ) -> Result<Self, CompileError> {
    let context = format!("{method} {path}");

    let mut params = resolve_parameters(&operation.parameters, spec, &context)?;
    for global in globals {
      if !params.iter().any(|local| local.name == global.name) {
        params.push(global.clone());
      }
    }

    let mut path_params = vec![];
    let mut query_params = vec![];
    let mut header_params = vec![];
    let mut cookie_params = vec![];
    for param in params {
      match param.location {
        ParameterLocation::Path => path_params.push(param),
        ParameterLocation::Query => query_params.push(param),
        ParameterLocation::Header => header_params.push(param),
        ParameterLocation::Cookie => cookie_params.push(param),
      }
    }
    let path_params = sort_params_by_path(path, path_params)?;

    let (bodies, body_required) = match &operation.request_body {
      Some(body_ref) => {
        let body: RequestBody = body_ref.resolve_in(spec, &format!("request body of {context}"))?;
        (describe_bodies(&body, spec, &context)?, body.required.unwrap_or(false))
      }
      None => (vec![], false),
    };

    let requirements = if operation.security.is_empty() && !declared.declares(path, &method) {
      &spec.security
    } else {
      &operation.security
    };
    let mut security: Vec<SecurityDefinition> = requirements
      .iter()
      .flat_map(|requirement| {
        requirement.0.iter().map(|(provider, scopes)| SecurityDefinition {
          provider_name: provider.clone(),
          scopes: scopes.clone(),
        })
      })
      .collect();
    security.sort_by(|a, b| a.provider_name.cmp(&b.provider_name));

    let servers = [&operation.servers, &path_item.servers, &spec.servers]
      .into_iter()
      .find(|servers| !servers.is_empty())
      .cloned()
      .unwrap_or_default();

    let summary = operation
      .summary
      .clone()
      .filter(|text| !text.is_empty())
      .or_else(|| operation.description.clone())
      .unwrap_or_default();

    Ok(Self {
      operation_id: operation
        .operation_id
        .clone()
        .unwrap_or_else(|| derive_operation_id(method.as_str(), path)),
      method,
      path: path.to_string(),
      summary,
      path_params,
      query_params,
      header_params,
      cookie_params,
      bodies,
      body_required,
      security,
      servers,
    })
  }
}

/// Operations whose document entry spells out a `security` list, empty ones included.
///
/// `oas3` reads an absent list and `security: []` alike; only the latter opts out of the
/// document-level requirements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDocument")]
pub struct DeclaredSecurity {
  operations: HashSet<(String, String)>,
}

impl DeclaredSecurity {
  #[must_use]
  pub fn declares(&self, path: &str, method: &Method) -> bool {
    self
      .operations
      .contains(&(path.to_string(), method.as_str().to_ascii_lowercase()))
  }
}

#[derive(Deserialize)]
struct RawDocument {
  #[serde(default)]
  paths: BTreeMap<String, BTreeMap<String, RawPathEntry>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPathEntry {
  Operation { security: Option<IgnoredAny> },
  Other(IgnoredAny),
}

impl From<RawDocument> for DeclaredSecurity {
  fn from(document: RawDocument) -> Self {
    let operations = document
      .paths
      .into_iter()
      .flat_map(|(path, entries)| {
        entries.into_iter().filter_map(move |(key, entry)| match entry {
          RawPathEntry::Operation { security: Some(_) } => Some((path.clone(), key.to_ascii_lowercase())),
          _ => None,
        })
      })
      .collect();
    Self { operations }
  }
}

/// Stand-in id for operations without `operationId`: `get_api_teams_by_teamId`.
#[must_use]
pub fn derive_operation_id(method: &str, path: &str) -> String {
  let segments = path
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(name) => format!("by_{name}"),
      None => segment.to_string(),
    });

  std::iter::once(method.to_lowercase())
    .chain(segments)
    .collect::<Vec<_>>()
    .join("_")
}

/// Paths in lexicographic order, independent of how the document map iterates.
#[must_use]
pub fn sorted_paths(spec: &Spec) -> Vec<(&String, &PathItem)> {
  let mut paths: Vec<_> = spec.paths.iter().flatten().collect();
  paths.sort_by(|(a, _), (b, _)| a.cmp(b));
  paths
}

fn resolve_parameters(
  refs: &[ObjectOrReference<Parameter>],
  spec: &Spec,
  context: &str,
) -> Result<Vec<ParameterDefinition>, CompileError> {
  refs
    .iter()
    .map(|param_ref| {
      let raw: Parameter = param_ref.resolve_in(spec, &format!("parameters of {context}"))?;
      let schema = raw
        .schema
        .as_ref()
        .map(|schema_ref| schema_ref.resolve_in(spec, &format!("parameter '{}' of {context}", raw.name)))
        .transpose()?;
      let location = ParameterLocation::from(raw.location);

      Ok(ParameterDefinition {
        name: raw.name.clone(),
        location,
        required: raw.required.unwrap_or(false) || location == ParameterLocation::Path,
        raw,
        schema,
      })
    })
    .collect()
}

/// One definition per declared content type; `application/json` is the default when
/// present, otherwise the first declared type.
fn describe_bodies(
  body: &RequestBody,
  spec: &Spec,
  context: &str,
) -> Result<Vec<RequestBodyDefinition>, CompileError> {
  let default_type = if body.content.contains_key(PREFERRED_CONTENT_TYPE) {
    Some(PREFERRED_CONTENT_TYPE)
  } else {
    body.content.keys().next().map(String::as_str)
  };
  let required = body.required.unwrap_or(false);

  body
    .content
    .iter()
    .map(|(content_type, media_type)| {
      let schema = media_type
        .schema
        .as_ref()
        .map(|schema_ref| schema_ref.resolve_in(spec, &format!("{content_type} body of {context}")))
        .transpose()?;

      Ok(RequestBodyDefinition {
        content_type: content_type.clone(),
        required,
        schema,
        is_default: default_type == Some(content_type.as_str()),
      })
    })
    .collect()
}

/// Every operation of a document keyed by operation id.
#[derive(Debug, Default)]
pub struct OperationRegistry {
  operations: IndexMap<String, OperationDefinition>,
  warnings: Vec<GenerationWarning>,
}

impl OperationRegistry {
  pub fn from_spec(spec: &Spec) -> Result<Self, CompileError> {
    Self::extract(spec, &DeclaredSecurity::default())
  }

  /// Extracts all operations, aborting on the first structural error.
  ///
  /// A later operation reusing an id replaces the earlier one and leaves a warning.
  pub fn extract(spec: &Spec, declared: &DeclaredSecurity) -> Result<Self, CompileError> {
    let mut registry = Self::default();

    for (path, path_item) in sorted_paths(spec) {
      let globals = resolve_parameters(&path_item.parameters, spec, path)?;

      let mut methods: Vec<_> = path_item.methods().into_iter().collect();
      methods.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

      for (method, operation) in methods {
        let definition = OperationDefinition::build(spec, path, path_item, method, operation, &globals, declared)?;
        registry.insert(definition);
      }
    }

    Ok(registry)
  }

  fn insert(&mut self, definition: OperationDefinition) {
    let operation_id = definition.operation_id.clone();
    let replacement = format!("{} {}", definition.method, definition.path);
    if let Some(previous) = self.operations.insert(operation_id.clone(), definition) {
      self.warnings.push(GenerationWarning::DuplicateOperationId {
        operation_id,
        replaced: format!("{} {}", previous.method, previous.path),
        replacement,
      });
    }
  }

  #[must_use]
  pub fn get(&self, operation_id: &str) -> Option<&OperationDefinition> {
    self.operations.get(operation_id)
  }

  pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
    self.operations.values()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.operations.len()
  }

  #[must_use]
  pub fn warnings(&self) -> &[GenerationWarning] {
    &self.warnings
  }
}

use thiserror::Error;

/// Failures that stop a catalog from being produced.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("path '{path}' has {found} positional parameters, but spec has {declared} declared")]
  PathParameterCount {
    path: String,
    found: usize,
    declared: usize,
  },

  #[error("path '{path}' refers to parameter '{name}', which doesn't exist in specification")]
  UnknownPathParameter { path: String, name: String },

  #[error("cannot resolve '{reference}' in {context}: {reason}")]
  UnresolvedReference {
    reference: String,
    context: String,
    reason: String,
  },

  #[error("mask alias '{alias}' is declared by both '{first}' and '{second}'")]
  DuplicateActionAlias {
    alias: String,
    first: String,
    second: String,
  },

  #[error("mask alias '{alias}' of '{action}' shadows the declared action '{alias}'")]
  ShadowingActionAlias { alias: String, action: String },

  #[error("failed to parse mask: {0}")]
  MaskParse(#[source] serde_yaml::Error),

  #[error("failed to build body template for action '{action}'")]
  BodyTemplate {
    action: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("action '{0}' has no operation definition")]
  MissingOperation(String),

  #[error("failed to serialize named actions catalog")]
  CatalogSerialize(#[source] serde_yaml::Error),
}

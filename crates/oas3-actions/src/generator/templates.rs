//! Builders for the runtime's `{{ ... }}` expression templates.
//!
//! Expressions are string concatenations (`'literal' + params.name`) with `exists()`,
//! `cond ? a : b` and the casts `int()`, `bool()`, `arr()`, `obj()`.

use std::collections::BTreeMap;

use oas3::{
  Spec,
  spec::{ObjectSchema, SchemaType, Server},
};
use serde_json::{Map, Value};

use super::{
  constants::{BODY_PARAM_DELIMITER, REQUEST_URL_KEY},
  mask::Mask,
  operations::ParameterDefinition,
  parsed_path::template_spans,
};
use crate::utils::{SchemaExt, extract_schema_ref_name};

/// Single-quoted literal with embedded quotes escaped.
#[must_use]
pub fn quote_literal(text: &str) -> String {
  format!("'{}'", text.replace('\'', "\\'"))
}

/// URL of the first server with each `{variable}` replaced by its declared default.
#[must_use]
pub fn default_host(servers: &[Server]) -> Option<String> {
  let server = servers.first()?;
  let mut url = server.url.clone();
  for (name, variable) in &server.variables {
    url = url.replace(&format!("{{{name}}}"), &variable.default);
  }
  Some(url)
}

/// Host part of the URL template, bound to a connection when the mask names one.
#[must_use]
pub fn host_expression(mask: &Mask, default_host: &str) -> String {
  let literal = quote_literal(default_host);
  let conditional = mask.request_url_conn_type.as_deref().filter(|name| !name.is_empty());
  let bare = mask.request_url.as_deref().filter(|name| !name.is_empty());

  match (conditional, bare) {
    (Some(connection), _) => format!(
      "(exists(connection.{connection}.{REQUEST_URL_KEY}) ? connection.{connection}.{REQUEST_URL_KEY} : {literal})"
    ),
    (None, Some(connection)) => format!("connection.{connection}.{REQUEST_URL_KEY}"),
    (None, None) => literal,
  }
}

/// The path template as a concatenation, each declared `{name}` token (operator and
/// explode forms included) replaced by `params.name`.
#[must_use]
pub fn path_expression(path: &str, path_params: &[ParameterDefinition]) -> String {
  let mut terms = vec![];
  let mut literal_start = 0;

  for (span, name) in template_spans(path) {
    if !path_params.iter().any(|param| param.name == name) {
      continue;
    }
    if span.start > literal_start {
      terms.push(quote_literal(&path[literal_start..span.start]));
    }
    terms.push(format!("params.{name}"));
    literal_start = span.end;
  }
  if literal_start < path.len() || terms.is_empty() {
    terms.push(quote_literal(&path[literal_start..]));
  }

  terms.join(" + ")
}

/// `{{'?a=' + params.a + '&b=' + params.b}}`, or nothing without query parameters.
#[must_use]
pub fn query_expression(query_params: &[ParameterDefinition]) -> Option<String> {
  if query_params.is_empty() {
    return None;
  }

  let terms = query_params
    .iter()
    .enumerate()
    .map(|(position, param)| {
      let separator = if position == 0 { '?' } else { '&' };
      format!("'{separator}{}=' + params.{}", param.name, param.name)
    })
    .collect::<Vec<_>>()
    .join(" + ");

  Some(format!("{{{{{terms}}}}}"))
}

#[must_use]
pub fn url_template(host: &str, path: &str, query_params: &[ParameterDefinition]) -> String {
  let query = query_expression(query_params).unwrap_or_default();
  format!("{{{{{host} + {path}}}}}{query}")
}

enum BodyNode {
  Leaf(Value),
  Object(BTreeMap<String, BodyNode>),
}

impl BodyNode {
  fn into_value(self) -> Value {
    match self {
      Self::Leaf(value) => value,
      Self::Object(children) => Value::Object(
        children
          .into_iter()
          .map(|(key, child)| (key, child.into_value()))
          .collect::<Map<_, _>>(),
      ),
    }
  }
}

/// Builds the JSON body template for the flattened parameter names that map onto
/// `schema`. Names that match no property are ignored; nested objects win over a leaf
/// at the same key. Keys are emitted in sorted order.
pub fn body_template<'a>(
  param_names: impl IntoIterator<Item = &'a str>,
  schema: &ObjectSchema,
  spec: &Spec,
) -> Result<String, serde_json::Error> {
  let mut root = BTreeMap::new();

  for param_name in param_names {
    let segments: Vec<&str> = param_name.split(BODY_PARAM_DELIMITER).collect();
    let Some(leaf) = walk_schema(&segments, schema, spec) else {
      continue;
    };
    place_leaf(&mut root, &segments, typed_placeholder(&leaf, param_name));
  }

  serde_json::to_string(&BodyNode::Object(root).into_value())
}

fn walk_schema(segments: &[&str], schema: &ObjectSchema, spec: &Spec) -> Option<ObjectSchema> {
  let (head, rest) = segments.split_first()?;
  let property = property_by_name(head, schema, spec, &mut vec![])?;
  if rest.is_empty() {
    Some(property)
  } else {
    walk_schema(rest, &property, spec)
  }
}

fn place_leaf(tree: &mut BTreeMap<String, BodyNode>, segments: &[&str], value: Value) {
  let Some((head, rest)) = segments.split_first() else {
    return;
  };

  if rest.is_empty() {
    if !matches!(tree.get(*head), Some(BodyNode::Object(_))) {
      tree.insert((*head).to_string(), BodyNode::Leaf(value));
    }
    return;
  }

  let node = tree
    .entry((*head).to_string())
    .or_insert_with(|| BodyNode::Object(BTreeMap::new()));
  if matches!(node, BodyNode::Leaf(_)) {
    *node = BodyNode::Object(BTreeMap::new());
  }
  if let BodyNode::Object(children) = node {
    place_leaf(children, rest, value);
  }
}

/// Finds a property on `schema` or, failing that, on any composition branch.
fn property_by_name(name: &str, schema: &ObjectSchema, spec: &Spec, visited: &mut Vec<String>) -> Option<ObjectSchema> {
  if let Some(property) = schema.properties.get(name) {
    return property.resolve(spec).ok();
  }

  for branch_ref in schema.composition_branches() {
    let ref_name = extract_schema_ref_name(branch_ref);
    if let Some(ref_name) = &ref_name {
      if visited.contains(ref_name) {
        continue;
      }
      visited.push(ref_name.clone());
    }

    if let Ok(branch) = branch_ref.resolve(spec)
      && let Some(found) = property_by_name(name, &branch, spec, visited)
    {
      return Some(found);
    }
  }

  None
}

fn typed_placeholder(leaf: &ObjectSchema, param_name: &str) -> Value {
  let expression = match leaf.single_type_or_nullable() {
    Some(SchemaType::String) => format!("{{{{params.{param_name}}}}}"),
    Some(SchemaType::Integer | SchemaType::Number) => format!("{{{{int(params.{param_name})}}}}"),
    Some(SchemaType::Boolean) => format!("{{{{bool(params.{param_name})}}}}"),
    Some(SchemaType::Array) => {
      return Value::Array(vec![Value::String(format!("{{{{arr(params.{param_name})}}}}"))]);
    }
    _ => format!("{{{{obj(params.{param_name})}}}}"),
  };
  Value::String(expression)
}

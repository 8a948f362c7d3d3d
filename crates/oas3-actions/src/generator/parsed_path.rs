use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use super::{errors::CompileError, operations::ParameterDefinition};

/// `{name}` plus the RFC 6570 operator prefixes (`.`, `;`, `?`) and explode suffix (`*`).
static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[.;?]?([^{}*]+)\*?\}").expect("bad regex"));

/// Byte span of every template token in `path`, with the parameter name it carries.
pub fn template_spans(path: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
  PATH_TOKEN.captures_iter(path).filter_map(|captures| {
    let token = captures.get(0)?;
    let name = captures.get(1)?;
    Some((token.range(), name.as_str()))
  })
}

/// Parameter names in the order they appear in a path template.
#[must_use]
pub fn template_tokens(path: &str) -> Vec<&str> {
  template_spans(path).map(|(_, name)| name).collect()
}

/// Reorders declared path parameters to match their position in `path`.
///
/// Every template token must name a declared parameter and the counts must agree.
pub fn sort_params_by_path(
  path: &str,
  mut declared: Vec<ParameterDefinition>,
) -> Result<Vec<ParameterDefinition>, CompileError> {
  let tokens = template_tokens(path);
  if tokens.len() != declared.len() {
    return Err(CompileError::PathParameterCount {
      path: path.to_string(),
      found: tokens.len(),
      declared: declared.len(),
    });
  }

  let mut ordered = Vec::with_capacity(declared.len());
  for token in tokens {
    let Some(position) = declared.iter().position(|param| param.name == token) else {
      return Err(CompileError::UnknownPathParameter {
        path: path.to_string(),
        name: token.to_string(),
      });
    };
    ordered.push(declared.swap_remove(position));
  }

  Ok(ordered)
}

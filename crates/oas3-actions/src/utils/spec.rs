use std::{
  ffi::OsStr,
  fmt,
  path::{Path, PathBuf},
};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;

use crate::generator::operations::DeclaredSecurity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext.to_ascii_lowercase().as_str() {
      "json" => Some(Self::Json),
      "yaml" | "yml" => Some(Self::Yaml),
      _ => None,
    }
  }

  /// JSON documents open with an object; anything else is read as YAML.
  #[must_use]
  pub fn sniff(bytes: &[u8]) -> Self {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
      Some(b'{') => Self::Json,
      _ => Self::Yaml,
    }
  }
}

/// Where an API document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
  File(PathBuf),
  Remote(String),
}

impl SpecSource {
  /// Interprets `location` as a URL when it carries an http(s) scheme, otherwise as
  /// a path relative to `base`.
  #[must_use]
  pub fn resolve(base: &Path, location: &str) -> Self {
    if location.starts_with("http://") || location.starts_with("https://") {
      Self::Remote(location.to_string())
    } else {
      Self::File(base.join(location))
    }
  }

  fn declared_format(&self) -> Option<SpecFormat> {
    match self {
      Self::File(path) => path.extension().and_then(OsStr::to_str).and_then(SpecFormat::from_extension),
      Self::Remote(url) => {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        Path::new(path)
          .extension()
          .and_then(OsStr::to_str)
          .and_then(SpecFormat::from_extension)
      }
    }
  }
}

impl fmt::Display for SpecSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::File(path) => write!(f, "{}", path.display()),
      Self::Remote(url) => f.write_str(url),
    }
  }
}

enum SpecBytes {
  Mapped(AsyncMmapFile),
  Fetched(Vec<u8>),
}

impl SpecBytes {
  fn as_slice(&self) -> &[u8] {
    match self {
      Self::Mapped(file) => file.as_slice(),
      Self::Fetched(bytes) => bytes,
    }
  }
}

pub struct SpecLoader {
  bytes: SpecBytes,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(source: &SpecSource) -> anyhow::Result<Self> {
    let bytes = match source {
      SpecSource::File(path) => SpecBytes::Mapped(
        AsyncMmapFile::open(path)
          .await
          .with_context(|| format!("failed to open OpenAPI document {}", path.display()))?,
      ),
      SpecSource::Remote(url) => SpecBytes::Fetched(fetch(url).await?),
    };

    let format = source
      .declared_format()
      .unwrap_or_else(|| SpecFormat::sniff(bytes.as_slice()));

    Ok(Self { bytes, format })
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    match self.format {
      SpecFormat::Json => Ok(serde_json::from_slice::<OpenApiV3Spec>(self.bytes.as_slice())?),
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.bytes.as_slice())?;
        Ok(oas3::from_yaml(content)?)
      }
    }
  }

  /// Second pass over the raw document for what `oas3` does not keep.
  pub fn declared_security(&self) -> anyhow::Result<DeclaredSecurity> {
    match self.format {
      SpecFormat::Json => Ok(serde_json::from_slice(self.bytes.as_slice())?),
      SpecFormat::Yaml => Ok(serde_yaml::from_str(std::str::from_utf8(self.bytes.as_slice())?)?),
    }
  }
}

#[cfg(feature = "remote")]
async fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
  let response = reqwest::get(url)
    .await
    .with_context(|| format!("failed to fetch OpenAPI document {url}"))?
    .error_for_status()?;
  Ok(response.bytes().await?.to_vec())
}

#[cfg(not(feature = "remote"))]
async fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
  anyhow::bail!("cannot fetch {url}: built without the `remote` feature")
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn source_resolution_distinguishes_urls_from_paths() {
    let base = Path::new("/work/grafana");
    assert_eq!(
      SpecSource::resolve(base, "https://example.com/openapi.json"),
      SpecSource::Remote("https://example.com/openapi.json".to_string())
    );
    assert_eq!(
      SpecSource::resolve(base, "openapi.yaml"),
      SpecSource::File(PathBuf::from("/work/grafana/openapi.yaml"))
    );
  }

  #[test]
  fn format_comes_from_extension_before_content() {
    let remote = SpecSource::Remote("https://example.com/spec.yml?raw=1".to_string());
    assert_eq!(remote.declared_format(), Some(SpecFormat::Yaml));
    assert_eq!(SpecSource::File(PathBuf::from("api.txt")).declared_format(), None);
    assert_eq!(SpecFormat::sniff(b"  \n{\"openapi\": \"3.0.0\"}"), SpecFormat::Json);
    assert_eq!(SpecFormat::sniff(b"openapi: 3.0.0"), SpecFormat::Yaml);
  }

  #[tokio::test]
  async fn loads_yaml_document_without_extension() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
      file,
      "openapi: 3.0.0\ninfo:\n  title: Test\n  version: '1'\npaths: {{}}"
    )?;

    let spec = SpecLoader::open(&SpecSource::File(file.path().to_path_buf()))
      .await?
      .parse()?;
    assert_eq!(spec.info.title, "Test");
    Ok(())
  }

  #[tokio::test]
  async fn explicit_empty_security_is_remembered() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
      file,
      concat!(
        "openapi: 3.0.0\n",
        "info:\n  title: Test\n  version: '1'\n",
        "security:\n  - ApiKey: []\n",
        "paths:\n",
        "  /health:\n",
        "    summary: Liveness\n",
        "    get:\n",
        "      security: []\n",
        "      responses:\n        200:\n          description: ok\n",
        "  /teams:\n",
        "    get:\n",
        "      responses:\n        200:\n          description: ok\n",
      )
    )?;

    let declared = SpecLoader::open(&SpecSource::File(file.path().to_path_buf()))
      .await?
      .declared_security()?;
    assert!(declared.declares("/health", &http::Method::GET));
    assert!(!declared.declares("/teams", &http::Method::GET));
    Ok(())
  }
}

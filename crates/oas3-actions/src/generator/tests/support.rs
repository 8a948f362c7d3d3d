use oas3::Spec;
use serde_json::{Value, json};

use crate::generator::mask::Mask;

pub(super) const GRAFANA_SPEC: &str = include_str!("../../../fixtures/grafana_dashboard.yaml");
pub(super) const GRAFANA_MASK: &str = include_str!("../../../fixtures/grafana_mask.yaml");
pub(super) const TEAMS_MASK: &str = include_str!("../../../fixtures/teams_mask.yaml");

pub(super) fn grafana_spec() -> Spec {
  oas3::from_yaml(GRAFANA_SPEC).expect("failed to parse grafana fixture")
}

pub(super) fn parse_mask(raw: &str) -> Mask {
  Mask::parse(raw).expect("failed to parse test mask")
}

/// Wraps `paths` (and optional `components`) in a minimal 3.1 document.
pub(super) fn spec_with(paths: Value, components: Value) -> Spec {
  serde_json::from_value(json!({
    "openapi": "3.1.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "servers": [{ "url": "https://api.example.com" }],
    "paths": paths,
    "components": components
  }))
  .expect("failed to parse test spec")
}

pub(super) fn spec_from_paths(paths: Value) -> Spec {
  spec_with(paths, json!({}))
}

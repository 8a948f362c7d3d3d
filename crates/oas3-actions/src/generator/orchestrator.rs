use oas3::Spec;

use super::{
  discovery::{DiscoveredApi, discover},
  errors::CompileError,
  mask::Mask,
  metrics::{GenerationStats, GenerationWarning},
  named_actions::{NamedActionGenerator, NamedActionsGroup},
  operations::DeclaredSecurity,
};

pub struct GeneratedOutput {
  pub group: NamedActionsGroup,
  pub yaml: String,
  pub stats: GenerationStats,
}

/// Runs one document and one mask through discovery and catalog generation.
pub struct Orchestrator {
  spec: Spec,
  mask: Mask,
  declared_security: DeclaredSecurity,
}

impl Orchestrator {
  #[must_use]
  pub fn new(spec: Spec, mask: Mask) -> Self {
    Self {
      spec,
      mask,
      declared_security: DeclaredSecurity::default(),
    }
  }

  /// Operations that override the document-level security, read from the raw document.
  #[must_use]
  pub fn with_declared_security(mut self, declared_security: DeclaredSecurity) -> Self {
    self.declared_security = declared_security;
    self
  }

  #[must_use]
  pub fn mask(&self) -> &Mask {
    &self.mask
  }

  pub fn discover(&self) -> Result<DiscoveredApi, CompileError> {
    discover(&self.spec, &self.declared_security)
  }

  pub fn generate(&self) -> Result<GeneratedOutput, CompileError> {
    let discovered = self.discover()?;
    let mut stats = GenerationStats::default();

    stats.record_operations(discovered.operations.len());
    stats.record_discovered(discovered.actions.len());
    stats.record_warnings(discovered.operations.warnings().iter().cloned());
    for chain in discovered.skipped_cycles {
      stats.record_cycle(chain);
    }
    if discovered.operations.operations().any(|operation| operation.servers.is_empty()) {
      stats.record_warning(GenerationWarning::MissingServer);
    }

    let group = NamedActionGenerator::new(&self.spec, &self.mask, &discovered.operations)
      .generate(&discovered.actions, &mut stats)?;
    let yaml = group.to_yaml()?;

    Ok(GeneratedOutput { group, yaml, stats })
  }
}

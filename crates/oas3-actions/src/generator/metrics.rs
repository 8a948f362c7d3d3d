use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub operations_extracted: usize,
  pub actions_discovered: usize,
  pub actions_generated: usize,
  pub actions_filtered: usize,
  pub parameters_generated: usize,
  pub cycles_skipped: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_operations(&mut self, count: usize) {
    self.operations_extracted += count;
  }

  pub fn record_discovered(&mut self, count: usize) {
    self.actions_discovered += count;
  }

  pub fn record_generated(&mut self, parameters: usize) {
    self.actions_generated += 1;
    self.parameters_generated += parameters;
  }

  pub fn record_filtered(&mut self) {
    self.actions_filtered += 1;
  }

  /// `chain` is the reference stack that was active when the property was skipped.
  pub fn record_cycle(&mut self, chain: Vec<String>) {
    self.cycles_skipped += 1;
    self.cycle_details.push(chain);
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "operation id '{operation_id}' of {replacement} replaces {replaced}")]
  DuplicateOperationId {
    operation_id: String,
    replaced: String,
    replacement: String,
  },
  #[strum(to_string = "mask action '{action}' matches no operation")]
  MaskActionNotFound { action: String },
  #[strum(to_string = "[{action}] mask parameter '{parameter}' matches no parameter")]
  MaskParameterNotFound { action: String, parameter: String },
  #[strum(to_string = "document declares no server, URL templates use an empty host")]
  MissingServer,
}

impl GenerationWarning {
  /// Mask entries that silently select nothing usually mean a typo in the mask.
  pub fn is_mask_mismatch(&self) -> bool {
    matches!(
      self,
      Self::MaskActionNotFound { .. } | Self::MaskParameterNotFound { .. }
    )
  }
}

pub(crate) mod body;
pub(crate) mod constants;
pub mod discovery;
pub mod errors;
pub mod mask;
pub mod metrics;
pub mod named_actions;
pub(crate) mod naming;
pub mod operations;
pub mod orchestrator;
pub mod parameters;
pub(crate) mod parsed_path;
pub(crate) mod templates;

#[cfg(test)]
mod tests;

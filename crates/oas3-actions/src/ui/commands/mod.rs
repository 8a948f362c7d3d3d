pub mod generate;
pub mod list;

pub use generate::{GenerateConfig, generate_named_actions};
pub use list::{list_actions, list_parameters};

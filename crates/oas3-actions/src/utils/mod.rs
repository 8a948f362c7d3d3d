pub mod refs;
pub mod schema_ext;
pub mod spec;

pub(crate) use refs::{ResolveExt, extract_schema_ref_name, reference_description};
pub(crate) use schema_ext::SchemaExt;

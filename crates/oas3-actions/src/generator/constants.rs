/// Joins the segments of a flattened body parameter name (`dashboard__title`).
pub(crate) const BODY_PARAM_DELIMITER: &str = "__";
pub(crate) const ARRAY_DEFAULT_DELIMITER: &str = ",";
pub(crate) const PLACEHOLDER_PREFIX: &str = "Example: ";
/// Display index that sorts a parameter after every explicitly indexed one.
pub(crate) const DEFAULT_PARAM_INDEX: i64 = 999;

pub(crate) const PREFERRED_CONTENT_TYPE: &str = "application/json";

pub(crate) const HTTP_ACTION_NAMESPACE: &str = "http";
pub(crate) const REQUEST_URL_KEY: &str = "REQUEST_URL";
pub(crate) const URL_VALUE_KEY: &str = "url";
pub(crate) const BODY_VALUE_KEY: &str = "body";
pub(crate) const CONTENT_TYPE_VALUE_KEY: &str = "contentType";

pub(crate) const NAMED_ACTIONS_FILE: &str = "named_actions.yaml";
pub(crate) const DEFAULT_MASK_FILE: &str = "mask.yaml";

/// Words rendered fully uppercase in derived display names.
pub(crate) const UPPERCASE_WORDS: &[&str] = &["url", "id", "ip", "ssl"];

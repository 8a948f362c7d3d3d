use crate::generator::naming::display_name;

#[test]
fn camel_case_splits_into_words() {
  assert_eq!(display_name("NameWithNoSpaces"), "Name With No Spaces");
  assert_eq!(display_name("loginOrEmail"), "Login Or Email");
}

#[test]
fn separators_become_spaces() {
  assert_eq!(display_name("name.with.dots"), "Name With Dots");
  assert_eq!(display_name("name_With_underscores"), "Name With Underscores");
  assert_eq!(display_name("dashboard__title"), "Dashboard Title");
  assert_eq!(display_name("dashboard__schemaVersion"), "Dashboard Schema Version");
}

#[test]
fn acronyms_are_uppercased() {
  assert_eq!(display_name("[]Mix_things.up url and ids"), "Mix Things Up URL And IDs");
  assert_eq!(display_name("user_id"), "User ID");
  assert_eq!(display_name("sslCert"), "SSL Cert");
  assert_eq!(display_name("ip"), "IP");
}

#[test]
fn uppercase_runs_stay_together() {
  assert_eq!(display_name("getURLList"), "Get URLList");
  assert_eq!(display_name(""), "");
}

use serde_json::json;

use super::support::{GRAFANA_SPEC, grafana_spec, spec_from_paths, spec_with};
use crate::generator::{
  body::join_path,
  discovery::{Action, discover},
  operations::DeclaredSecurity,
  parameters::ParamCategory,
};

fn single_action(spec: &oas3::Spec) -> (Action, Vec<Vec<String>>) {
  let discovered = discover(spec, &DeclaredSecurity::default()).expect("discovery succeeds");
  assert_eq!(discovered.actions.len(), 1);
  let action = discovered.actions.into_iter().next().expect("one action");
  (action, discovered.skipped_cycles)
}

fn keys(action: &Action) -> Vec<&str> {
  action.parameters.keys().map(String::as_str).collect()
}

#[test]
fn join_path_uses_double_underscore() {
  assert_eq!(join_path("", "dashboard"), "dashboard");
  assert_eq!(join_path("dashboard", "title"), "dashboard__title");
  assert_eq!(join_path("a__b", "c"), "a__b__c");
}

#[test]
fn nested_objects_flatten_to_delimited_leaves() {
  let (action, cycles) = single_action(&grafana_spec());

  assert!(cycles.is_empty());
  assert_eq!(
    keys(&action),
    vec![
      "dashboard__id",
      "dashboard__refresh",
      "dashboard__schemaVersion",
      "dashboard__tags",
      "dashboard__timezone",
      "dashboard__title",
      "dashboard__uid",
      "dashboard__version",
      "folderId",
      "folderUid",
      "message",
      "overwrite",
    ]
  );

  let params = &action.parameters;
  assert_eq!(params["dashboard__id"].category, Some(ParamCategory::Integer));
  assert_eq!(params["dashboard__tags"].category, Some(ParamCategory::Array));
  assert_eq!(params["overwrite"].category, Some(ParamCategory::Bool));
  assert_eq!(params["dashboard__uid"].format, "uuid");
  assert_eq!(params["dashboard__timezone"].placeholder, "Example: browser");
  assert_eq!(
    params["dashboard__refresh"].description,
    "Set the dashboard refresh interval."
  );
  assert_eq!(
    params["folderId"].description,
    "The id of the folder to save the dashboard in."
  );
}

#[test]
fn required_is_the_conjunction_along_the_path() {
  let (action, _) = single_action(&grafana_spec());
  let params = &action.parameters;

  assert!(params["dashboard__title"].required);
  assert!(!params["dashboard__uid"].required);
  assert!(!params["folderId"].required);

  let optional_body = spec_from_paths(json!({
    "/api/dashboards/db": { "post": {
      "operationId": "CreateDashboard",
      "requestBody": { "required": false, "content": { "application/json": { "schema": {
        "type": "object",
        "required": ["dashboard"],
        "properties": {
          "dashboard": {
            "type": "object",
            "required": ["title"],
            "properties": { "title": { "type": "string" } }
          }
        }
      } } } }
    } }
  }));
  let (action, _) = single_action(&optional_body);
  assert!(!action.parameters["dashboard__title"].required);
}

#[test]
fn dashboard_body_joins_existing_path_parameter() -> anyhow::Result<()> {
  let raw = GRAFANA_SPEC.replace(
    "  /api/dashboards/db:\n    post:\n",
    concat!(
      "  /api/folders/{folderKey}/dashboards:\n",
      "    post:\n",
      "      parameters:\n",
      "        - name: folderKey\n",
      "          in: path\n",
      "          required: true\n",
      "          schema:\n",
      "            type: string\n",
    ),
  );
  let (action, _) = single_action(&oas3::from_yaml(&raw)?);

  assert_eq!(action.parameters.len(), 13);
  assert!(action.parameters["folderKey"].required);
  assert!(action.parameters.contains_key("dashboard__timezone"));
  Ok(())
}

#[test]
fn path_params_sit_beside_body_leaves() {
  let spec = spec_from_paths(json!({
    "/api/folders/{folderUid}/dashboards": { "post": {
      "operationId": "CreateInFolder",
      "parameters": [{ "name": "folderUid", "in": "path", "required": true, "schema": { "type": "string" } }],
      "requestBody": { "required": true, "content": { "application/json": { "schema": {
        "type": "object",
        "required": ["title"],
        "properties": { "title": { "type": "string" }, "tags": { "type": "array" } }
      } } } }
    } }
  }));

  let (action, _) = single_action(&spec);
  assert_eq!(keys(&action), vec!["folderUid", "tags", "title"]);
  assert!(action.parameters["folderUid"].required);
  assert!(action.parameters["title"].required);
  assert!(!action.parameters["tags"].required);
}

#[test]
fn reference_description_fills_in_for_bare_components() {
  let spec = spec_with(
    json!({
      "/api/labels": { "post": {
        "operationId": "CreateLabel",
        "requestBody": { "content": { "application/json": { "schema": {
          "type": "object",
          "properties": {
            "tag": { "$ref": "#/components/schemas/Tag", "description": "Primary tag" },
            "note": { "$ref": "#/components/schemas/Note", "description": "ignored" }
          }
        } } } }
      } }
    }),
    json!({ "schemas": {
      "Tag": { "type": "string" },
      "Note": { "type": "string", "description": "Free text" }
    } }),
  );

  let (action, _) = single_action(&spec);
  assert_eq!(action.parameters["tag"].description, "Primary tag");
  assert_eq!(action.parameters["note"].description, "Free text");
}

#[test]
fn recursive_references_are_cut_and_reported() {
  let spec = spec_with(
    json!({
      "/api/nodes": { "post": {
        "operationId": "CreateNode",
        "requestBody": { "content": { "application/json": {
          "schema": { "$ref": "#/components/schemas/Node" }
        } } }
      } }
    }),
    json!({ "schemas": {
      "Node": {
        "type": "object",
        "properties": {
          "value": { "type": "string" },
          "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } },
          "child": { "$ref": "#/components/schemas/Node" }
        }
      }
    } }),
  );

  let (action, cycles) = single_action(&spec);
  assert_eq!(
    keys(&action),
    vec!["child__children", "child__value", "children", "value"]
  );
  assert_eq!(cycles, vec![vec!["Node".to_string(), "Node".to_string()]]);
}

#[test]
fn composition_branches_merge_at_the_same_level() {
  let spec = spec_with(
    json!({
      "/api/users": { "post": {
        "operationId": "CreateUser",
        "requestBody": { "required": true, "content": { "application/json": { "schema": {
          "allOf": [
            { "$ref": "#/components/schemas/Base" },
            { "type": "object", "properties": { "email": { "type": "string" } } }
          ]
        } } } }
      } }
    }),
    json!({ "schemas": {
      "Base": {
        "type": "object",
        "required": ["id"],
        "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
      }
    } }),
  );

  let (action, cycles) = single_action(&spec);
  assert!(cycles.is_empty());
  assert_eq!(keys(&action), vec!["email", "id", "name"]);
  assert!(action.parameters["id"].required);
  assert!(!action.parameters["name"].required);
}

#[test]
fn missing_body_schema_adds_no_parameters() {
  let spec = spec_from_paths(json!({
    "/api/ping": { "post": {
      "operationId": "Ping",
      "requestBody": { "content": { "application/json": {} } }
    } }
  }));

  let (action, _) = single_action(&spec);
  assert!(action.parameters.is_empty());
}

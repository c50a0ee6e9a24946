//! Loading JSON catalogs from disk.

use std::fs;

use evexpr_metadata::{MetadataError, MetadataProvider, Platform};

const CATALOG: &str = r#"{
  "extensions": [
    {
      "name": "Inventory",
      "expressions": [
        {
          "name": "ItemCount",
          "returnType": "number",
          "parameters": [
            { "type": "currentScene", "codeOnly": true },
            { "type": "string", "description": "Inventory name" },
            { "type": "string", "optional": true }
          ]
        }
      ],
      "objects": [
        {
          "type": "Inventory::Chest",
          "expressions": [
            { "name": "Capacity", "returnType": "number", "parameters": [{ "type": "object" }] }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn load_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    fs::write(&path, CATALOG).unwrap();

    let mut platform = Platform::with_builtins();
    platform.load(&path).unwrap();

    let item_count = platform.free_function("ItemCount").unwrap();
    assert_eq!(item_count.parameter_count_range(0), (1, 2));
    assert!(item_count.parameters[0].code_only);
    assert!(platform.object_function("Inventory::Chest", "Capacity").is_some());
    // Base object functions still apply to the new object type.
    assert!(platform.object_function("Inventory::Chest", "X").is_some());
    assert!(platform.free_function("ToString").is_some());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = Platform::new().load(&path).unwrap_err();
    assert!(matches!(err, MetadataError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_file_reports_origin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "name": "Broken", "expressions": [{ "name": 3 }] }"#).unwrap();

    let err = Platform::new().load(&path).unwrap_err();
    assert!(matches!(err, MetadataError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn platform_is_shareable_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Platform>();
    assert_send_sync::<evexpr_metadata::ObjectsScope>();
}

use colforge::model::{
    ColumnFilter, DefinitionError, DimensionRelation, Field, PartitionSpec, TableDefinition,
};
use std::fs;

#[test]
fn test_builder_matches_toml() {
    let toml = r#"
database_name = "retail"
table_name = "sales"
high_cardinality = ["order_no"]

[[dimensions]]
column = "order_no"

[[dimensions]]
column = "sold_at"
type = "timestamp"

[[measures]]
column = "amount"
type = "decimal"
precision = 10
scale = 2
"#;
    let parsed = TableDefinition::from_toml_str(toml).unwrap();
    let built = TableDefinition::new("retail", "sales")
        .dimension(Field::new("order_no"))
        .dimension(Field::new("sold_at").with_type("timestamp"))
        .measure(Field::new("amount").with_type("decimal").with_precision(10, 2))
        .high_cardinality("order_no");

    assert_eq!(parsed, built);
}

#[test]
fn test_json_nested_children() {
    let json = r#"{
        "table_name": "events",
        "dimensions": [
            {
                "column": "tags",
                "type": "array",
                "children": [{ "column": "val", "type": "string" }]
            }
        ]
    }"#;
    let def = TableDefinition::from_json_str(json).unwrap();

    assert_eq!(def.database_name, "");
    let tags = &def.dimensions[0];
    assert!(tags.has_children());
    assert_eq!(tags.child_fields()[0].column, "val");
    assert_eq!(tags.child_fields()[0].declared_type(), Some("string"));
}

#[test]
fn test_empty_children_still_complex() {
    let json = r#"{ "table_name": "t", "dimensions": [{ "column": "s", "children": [] }] }"#;
    let def = TableDefinition::from_json_str(json).unwrap();
    assert!(def.dimensions[0].has_children());
    assert!(def.dimensions[0].child_fields().is_empty());
}

#[test]
fn test_partition_spec_defaults() {
    let toml = r#"
table_name = "t"

[partitioner]
columns = ["", "  "]
"#;
    let def = TableDefinition::from_toml_str(toml).unwrap();
    let spec: &PartitionSpec = def.partitioner.as_ref().unwrap();
    assert_eq!(spec.class, "");
    assert_eq!(spec.count, None);
    assert!(spec.nodes.is_none());
    assert!(spec.has_blank_columns());
}

#[test]
fn test_partition_count_zero_parsed() {
    let toml = r#"
table_name = "t"

[partitioner]
class = "hash"
count = 0
"#;
    let def = TableDefinition::from_toml_str(toml).unwrap();
    assert_eq!(def.partitioner.unwrap().count, Some(0));
}

#[test]
fn test_relation_filters() {
    let columns = vec!["cust_id".to_string(), "name".to_string(), "segment".to_string()];
    let include = DimensionRelation {
        table: "customer".to_string(),
        left_column: "customer_fk".to_string(),
        right_column: "cust_id".to_string(),
        columns: columns.clone(),
        filter: ColumnFilter::include(&["cust_id", "name"]),
    };
    assert_eq!(include.selected_columns(), vec!["cust_id", "name"]);

    let exclude = DimensionRelation {
        filter: ColumnFilter::exclude(&["segment"]),
        ..include.clone()
    };
    assert_eq!(exclude.selected_columns(), vec!["cust_id", "name"]);

    let upper = ColumnFilter {
        kind: "INCLUDE".to_string(),
        names: vec![],
    };
    assert!(upper.is_include());
}

#[test]
fn test_is_high_cardinality_ignores_case() {
    let def = TableDefinition::new("db", "t").high_cardinality("Order_No");
    assert!(def.is_high_cardinality("order_no"));
    assert!(!def.is_high_cardinality("city"));
}

#[test]
fn test_from_file_formats() {
    let dir = std::env::temp_dir().join(format!("colforge_def_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let toml_path = dir.join("sales.toml");
    fs::write(&toml_path, "table_name = \"sales\"\n").unwrap();
    assert_eq!(TableDefinition::from_file(&toml_path).unwrap().table_name, "sales");

    let json_path = dir.join("sales.JSON");
    fs::write(&json_path, r#"{ "table_name": "sales" }"#).unwrap();
    assert_eq!(TableDefinition::from_file(&json_path).unwrap().table_name, "sales");

    let yaml_path = dir.join("sales.yaml");
    fs::write(&yaml_path, "table_name: sales\n").unwrap();
    assert!(matches!(
        TableDefinition::from_file(&yaml_path),
        Err(DefinitionError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        TableDefinition::from_file(dir.join("missing.toml")),
        Err(DefinitionError::ReadError(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_toml_rejected() {
    let err = TableDefinition::from_toml_str("table_name = ").unwrap_err();
    assert!(matches!(err, DefinitionError::TomlError(_)));
}

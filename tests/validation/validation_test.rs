use colforge::validation::{contains_name, ensure_unique, find_duplicates, ValidationError};

#[test]
fn test_find_duplicates_case_insensitive() {
    let names = ["id", "City", "amt", "city", "ID", "city"];
    assert_eq!(find_duplicates(names), vec!["id", "City"]);
}

#[test]
fn test_find_duplicates_none() {
    assert!(find_duplicates(["a", "b", "c"]).is_empty());
}

#[test]
fn test_ensure_unique_reports_first() {
    let err = ensure_unique(["b", "a", "B", "a"], ValidationError::DuplicateColumn).unwrap_err();
    assert_eq!(err, ValidationError::DuplicateColumn("b".to_string()));
}

#[test]
fn test_contains_name_trims() {
    let hints = vec![" Order_No ".to_string()];
    assert!(contains_name(&hints, "order_no"));
    assert!(!contains_name(&hints, "order"));
}

#[test]
fn test_error_messages_name_offender() {
    let err = ValidationError::UnresolvedPartitionColumns(vec!["x".to_string(), "y".to_string()]);
    assert_eq!(
        err.to_string(),
        "Partition columns are not part of the dimension columns: x, y"
    );

    let err = ValidationError::UnsupportedDataType {
        column: "geo".to_string(),
        data_type: "geometry".to_string(),
    };
    assert!(err.to_string().contains("geometry"));
    assert!(err.to_string().contains("geo"));
}

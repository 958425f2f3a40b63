use colforge::compile::Compiler;
use colforge::config::Settings;
use colforge::dictionary::{DictionaryError, DictionaryLocator, TableIdentifier};
use colforge::model::{Field, TableDefinition};
use colforge::plugin::SequentialIdGenerator;
use colforge::{CompiledTable, Encoding};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn compiled() -> CompiledTable {
    let definition = TableDefinition::new("retail", "sales")
        .dimension(Field::new("city"))
        .dimension(Field::new("country"))
        .dimension(Field::new("order_no"))
        .measure(Field::new("amt"))
        .high_cardinality("order_no");
    Compiler::new()
        .with_id_generator(Arc::new(SequentialIdGenerator::new()))
        .compile(&definition)
        .unwrap()
}

fn store(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("colforge_store_{}_{}", tag, std::process::id()))
}

#[test]
fn test_existing_and_missing_dictionaries() {
    let compiled = compiled();
    let root = store("mixed");
    let table = TableIdentifier::new(&compiled.database_name, &compiled.table_name);
    let locator = DictionaryLocator::default();

    let metadata = locator.metadata_path(&root, &table);
    fs::create_dir_all(&metadata).unwrap();
    let city = compiled.schema.column("city").unwrap();
    fs::write(metadata.join(locator.file_name(city)), b"").unwrap();
    fs::write(metadata.join("unrelated.txt"), b"").unwrap();

    let columns = compiled
        .schema
        .dimensions()
        .filter(|c| c.has_encoding(Encoding::Dictionary));
    let files = locator.locate(columns, &root, &table).unwrap();

    let summary: Vec<(&str, bool)> = files
        .iter()
        .map(|f| (f.column_name.as_str(), f.exists))
        .collect();
    assert_eq!(summary, vec![("city", true), ("country", false)]);
    assert_eq!(
        files[1].path,
        root.join("retail")
            .join("sales")
            .join("Metadata")
            .join(format!("{}.dict", compiled.schema.column("country").unwrap().column_unique_id))
    );

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_custom_layout() {
    let compiled = compiled();
    let root = store("custom");
    let table = TableIdentifier::new("retail", "sales");
    let locator = DictionaryLocator {
        metadata_dir: "_meta".to_string(),
        extension: "dictfile".to_string(),
    };

    let city = compiled.schema.column("city").unwrap();
    let metadata = root.join("retail").join("sales").join("_meta");
    fs::create_dir_all(&metadata).unwrap();
    fs::write(metadata.join(format!("{}.dictfile", city.column_unique_id)), b"").unwrap();

    let files = locator.locate([city], &root, &table).unwrap();
    assert!(files[0].exists);

    let files = DictionaryLocator::default()
        .locate([city], &root, &table)
        .unwrap();
    assert!(!files[0].exists);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_high_cardinality_column_has_no_dictionary() {
    let compiled = compiled();
    let order_no = compiled.schema.column("order_no").unwrap();

    let err = DictionaryLocator::default()
        .locate([order_no], &store("unused"), &TableIdentifier::new("retail", "sales"))
        .unwrap_err();

    assert!(matches!(err, DictionaryError::NotDictionaryEncoded(ref name) if name == "order_no"));
    assert_eq!(err.to_string(), "Column 'order_no' is not dictionary encoded");
}

#[test]
fn test_empty_column_set() {
    let files = DictionaryLocator::default()
        .locate(
            std::iter::empty(),
            &store("empty"),
            &TableIdentifier::new("retail", "sales"),
        )
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_dictionary_found_after_recompile() {
    let definition = TableDefinition::new("retail", "sales")
        .dimension(Field::new("city"))
        .measure(Field::new("amt"));
    let compiler = Settings::default().compiler.compiler().unwrap();
    let root = store("recompile");
    let table = TableIdentifier::new("retail", "sales");
    let locator = DictionaryLocator::default();

    let first = compiler.compile(&definition).unwrap();
    let metadata = locator.metadata_path(&root, &table);
    fs::create_dir_all(&metadata).unwrap();
    fs::write(
        metadata.join(locator.file_name(first.schema.column("city").unwrap())),
        b"",
    )
    .unwrap();

    let second = compiler.compile(&definition).unwrap();
    let city = second.schema.column("city").unwrap();
    let files = locator.locate([city], &root, &table).unwrap();
    assert!(files[0].exists);
    assert_eq!(
        files[0].path.file_name().unwrap().to_string_lossy(),
        format!("{}.dict", first.schema.column("city").unwrap().column_unique_id)
    );

    fs::remove_dir_all(&root).unwrap();
}

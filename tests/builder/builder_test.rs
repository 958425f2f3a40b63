use colforge::builder::{BuildContext, BuildState, ColumnSchemaBuilder};
use colforge::model::{ColumnProperty, DataType, Field, FieldRole};
use colforge::plugin::{SequentialIdGenerator, UniqueIdGenerator};
use colforge::schema::{ColumnSchema, Encoding, DEFAULT_DUMMY_MEASURE, UNGROUPED};
use colforge::validation::ValidationError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Records every column it is asked to identify.
#[derive(Default)]
struct RecordingIdGenerator {
    seen: Mutex<Vec<(String, String)>>,
}

impl UniqueIdGenerator for RecordingIdGenerator {
    fn generate_unique_id(&self, database_name: &str, _table_name: &str, column: &ColumnSchema) -> String {
        let mut seen = self.seen.lock().unwrap();
        seen.push((database_name.to_string(), column.column_name.clone()));
        format!("id-{}", seen.len())
    }
}

struct Fixture {
    high_cardinality: Vec<String>,
    properties: HashMap<String, Vec<ColumnProperty>>,
}

impl Fixture {
    fn new(high_cardinality: &[&str]) -> Self {
        Self {
            high_cardinality: high_cardinality.iter().map(|s| s.to_string()).collect(),
            properties: HashMap::new(),
        }
    }

    fn builder<'a>(&'a self, generator: &'a dyn UniqueIdGenerator) -> ColumnSchemaBuilder<'a> {
        ColumnSchemaBuilder::new(BuildContext {
            database_name: "retail",
            table_name: "sales",
            high_cardinality: &self.high_cardinality,
            column_properties: &self.properties,
            id_generator: generator,
        })
    }
}

fn names(columns: &[ColumnSchema]) -> Vec<&str> {
    columns.iter().map(|c| c.column_name.as_str()).collect()
}

#[test]
fn test_nested_field_expands_depth_first() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let address = Field::new("address").with_type("struct").with_children(vec![
        Field::new("city"),
        Field::new("geo").with_children(vec![
            Field::new("lat").with_type("double"),
            Field::new("lon").with_type("double"),
        ]),
    ]);

    let (columns, state) = builder
        .build_field(&address, FieldRole::Dimension, BuildState::default())
        .unwrap();

    assert_eq!(
        names(&columns),
        vec![
            "address",
            "address.city",
            "address.geo",
            "address.geo.lat",
            "address.geo.lon"
        ]
    );
    assert_eq!(columns[0].number_of_child, 2);
    assert_eq!(columns[2].number_of_child, 2);
    assert_eq!(columns[2].data_type, DataType::Struct);
    assert_eq!(columns[1].data_type, DataType::String);
    assert!(columns.iter().all(|c| c.is_dimension));
    assert!(columns.iter().all(|c| c.column_group_id == UNGROUPED));

    let ordinals: Vec<usize> = columns.iter().map(|c| c.schema_ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
    assert_eq!(state.next_ordinal, 5);
}

#[test]
fn test_already_qualified_child_keeps_name() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let tags = Field::new("tags")
        .with_type("array")
        .with_children(vec![Field::new("tags.val")]);
    let (columns, _) = builder
        .build_field(&tags, FieldRole::Dimension, BuildState::default())
        .unwrap();

    assert_eq!(names(&columns), vec!["tags", "tags.val"]);
}

#[test]
fn test_build_all_threads_ordinals() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let dimensions = vec![
        Field::new("id").with_type("int"),
        Field::new("tags")
            .with_type("array")
            .with_children(vec![Field::new("val")]),
    ];
    let measures = vec![Field::new("amt")];

    let (columns, state) = builder.build_all(&dimensions, &measures).unwrap();

    assert_eq!(names(&columns), vec!["id", "tags", "tags.val", "amt"]);
    let ordinals: Vec<usize> = columns.iter().map(|c| c.schema_ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2, 3]);
    assert_eq!(state.next_ordinal, 4);

    let amt = &columns[3];
    assert!(!amt.is_dimension);
    assert_eq!(amt.data_type, DataType::Double);
    assert!(amt.encodings.is_empty());
}

#[test]
fn test_encoding_policy() {
    let fixture = Fixture::new(&["order_no", "created"]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let dimension = |name: &str, data_type: DataType| {
        builder.build_column(name, data_type, FieldRole::Dimension, 0)
    };

    assert_eq!(dimension("city", DataType::String).encodings, vec![Encoding::Dictionary]);
    assert!(dimension("order_no", DataType::String).encodings.is_empty());
    assert_eq!(
        dimension("sold_at", DataType::Date).encodings,
        vec![Encoding::Dictionary, Encoding::DirectDictionary]
    );
    assert_eq!(
        dimension("created", DataType::Timestamp).encodings,
        vec![Encoding::DirectDictionary]
    );

    let measure = builder.build_column("sold_ts", DataType::Timestamp, FieldRole::Measure, 0);
    assert_eq!(measure.encodings, vec![Encoding::DirectDictionary]);
}

#[test]
fn test_high_cardinality_match_ignores_case() {
    let fixture = Fixture::new(&["ORDER_NO"]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let column = builder.build_column("order_no", DataType::String, FieldRole::Dimension, 0);
    assert!(!column.has_encoding(Encoding::Dictionary));
}

#[test]
fn test_column_properties_copied() {
    let mut fixture = Fixture::new(&[]);
    fixture.properties.insert(
        "City".to_string(),
        vec![
            ColumnProperty::new("sort_order", "asc"),
            ColumnProperty::new("comment", "shipping city"),
        ],
    );
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let city = builder.build_column("city", DataType::String, FieldRole::Dimension, 0);
    assert_eq!(city.column_properties.len(), 2);
    assert_eq!(city.column_properties["sort_order"], "asc");

    let other = builder.build_column("zip", DataType::String, FieldRole::Dimension, 0);
    assert!(other.column_properties.is_empty());
}

#[test]
fn test_generator_called_once_per_column() {
    let fixture = Fixture::new(&[]);
    let generator = RecordingIdGenerator::default();
    let builder = fixture.builder(&generator);

    let dimensions = vec![Field::new("s").with_children(vec![Field::new("a"), Field::new("b")])];
    let (columns, _) = builder.build_all(&dimensions, &[]).unwrap();

    let seen = generator.seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("retail".to_string(), "s".to_string()),
            ("retail".to_string(), "s.a".to_string()),
            ("retail".to_string(), "s.b".to_string()),
        ]
    );
    for column in &columns {
        assert_eq!(column.column_unique_id, column.column_reference_id);
    }
    assert_eq!(columns[2].column_unique_id, "id-3");
}

#[test]
fn test_unknown_type_rejected() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let nested = Field::new("s").with_children(vec![Field::new("shape").with_type("geometry")]);
    let err = builder.build_all(&[nested], &[]).unwrap_err();

    assert_eq!(
        err,
        ValidationError::UnsupportedDataType {
            column: "s.shape".to_string(),
            data_type: "geometry".to_string(),
        }
    );
}

#[test]
fn test_measure_children_inherit_role() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let stats = Field::new("stats").with_children(vec![Field::new("min"), Field::new("max")]);
    let (columns, _) = builder
        .build_field(&stats, FieldRole::Measure, BuildState::default())
        .unwrap();

    assert!(columns.iter().all(|c| !c.is_dimension));
    assert_eq!(columns[1].data_type, DataType::Double);
}

#[test]
fn test_dummy_measure() {
    let fixture = Fixture::new(&[]);
    let generator = SequentialIdGenerator::new();
    let builder = fixture.builder(&generator);

    let (dummy, state) = builder.dummy_measure(BuildState { next_ordinal: 3 });
    assert_eq!(dummy.column_name, DEFAULT_DUMMY_MEASURE);
    assert_eq!(dummy.data_type, DataType::Double);
    assert!(!dummy.is_dimension);
    assert!(dummy.is_invisible);
    assert!(dummy.encodings.is_empty());
    assert_eq!(dummy.schema_ordinal, 3);
    assert_eq!(state.next_ordinal, 4);
    assert_eq!(dummy.column_unique_id, "retail_1");
}

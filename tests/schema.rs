mod common;

use common::{INCIDENT_JSON, TestWorkspace, incident_columns};
use servicenow_schema::{
    ColumnDescriptor, ColumnSet, DecimalSpec, FieldType, RecordSchema, SchemaField,
    construct_schema, io_utils::SchemaFormat,
};

#[test]
fn empty_column_list_produces_empty_schema() {
    let schema = construct_schema("incident", &[]);
    assert_eq!(schema.name, "incident");
    assert!(schema.is_empty());
}

#[test]
fn empty_field_names_are_dropped() {
    let columns = vec![
        ColumnDescriptor::new("id", "guid"),
        ColumnDescriptor::new("", "string"),
        ColumnDescriptor::new("priority", "integer"),
    ];
    let schema = construct_schema("incident", &columns);

    assert_eq!(
        schema,
        RecordSchema::new(
            "incident",
            vec![
                SchemaField {
                    name: "id".to_string(),
                    field_type: FieldType::String,
                    nullable: true,
                },
                SchemaField {
                    name: "priority".to_string(),
                    field_type: FieldType::Integer,
                    nullable: true,
                },
            ],
        )
    );
}

#[test]
fn incident_table_maps_every_servicenow_type() {
    let schema = construct_schema("incident", &incident_columns());

    assert_eq!(
        schema.field_names(),
        vec![
            "sys_id",
            "number",
            "priority",
            "active",
            "opened_at",
            "due_date",
            "business_duration",
            "cost",
            "caller_id",
            "work_notes",
        ]
    );
    let type_of = |name: &str| schema.field(name).expect("field present").field_type.clone();
    assert_eq!(type_of("sys_id"), FieldType::String);
    assert_eq!(type_of("active"), FieldType::Boolean);
    assert_eq!(type_of("opened_at"), FieldType::DateTime);
    assert_eq!(type_of("due_date"), FieldType::Date);
    assert_eq!(type_of("business_duration"), FieldType::Time);
    assert_eq!(
        type_of("cost"),
        FieldType::Decimal(DecimalSpec::default_servicenow())
    );
    assert_eq!(type_of("caller_id"), FieldType::String);
    assert!(schema.fields.iter().all(|field| field.nullable));
}

#[test]
fn mixed_case_and_unknown_type_names() {
    let columns = vec![
        ColumnDescriptor::new("due", "GLIDE_DATE"),
        ColumnDescriptor::new("mystery", "unknown_xyz"),
        ColumnDescriptor::new("untyped", ""),
    ];
    let schema = construct_schema("task", &columns);
    assert_eq!(schema.fields[0].field_type, FieldType::Date);
    assert_eq!(schema.fields[1].field_type, FieldType::String);
    assert_eq!(schema.fields[2].field_type, FieldType::String);
    assert!(schema.fields.iter().all(|field| field.nullable));
}

#[test]
fn loads_servicenow_json_export() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("incident.json", INCIDENT_JSON);

    let set = ColumnSet::load(&path, encoding_rs::UTF_8).expect("load descriptors");
    assert_eq!(set.table.as_deref(), Some("incident"));
    assert_eq!(set.columns.len(), 6);

    let schema = construct_schema(set.resolve_table(None).expect("table"), &set.columns);
    assert_eq!(
        schema.field_names(),
        vec!["sys_id", "number", "priority", "opened_at", "cost"]
    );
    assert_eq!(schema.fields[3].field_type, FieldType::DateTime);
}

#[test]
fn saved_schema_loads_back_in_both_formats() {
    let workspace = TestWorkspace::new();
    let schema = construct_schema("incident", &incident_columns());

    let yaml_path = workspace.path().join("incident.yml");
    schema
        .save(&yaml_path, SchemaFormat::Yaml)
        .expect("save yaml");
    assert_eq!(RecordSchema::load(&yaml_path).expect("load yaml"), schema);

    let json_path = workspace.path().join("incident.json");
    schema
        .save(&json_path, SchemaFormat::Json)
        .expect("save json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("read json"))
            .expect("valid json");
    assert_eq!(json["name"], "incident");
    assert_eq!(json["fields"][2]["name"], "priority");
    assert_eq!(json["fields"][2]["type"], "integer");
    assert_eq!(json["fields"][2]["nullable"], true);
    assert_eq!(json["fields"][7]["type"], "decimal(38,10)");
    assert_eq!(json["fields"][6]["type"], "time_micros");
    assert_eq!(RecordSchema::load(&json_path).expect("load json"), schema);
}

#[test]
fn loading_schema_with_unknown_type_fails() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "broken.yml",
        "name: incident\nfields:\n  - name: id\n    type: glide_date\n",
    );
    let err = RecordSchema::load(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Parsing schema file"));
    assert!(message.contains("Unknown field type 'glide_date'"));
}

#[test]
fn nullable_defaults_to_true_when_omitted() {
    let schema = RecordSchema::parse(
        "name: problem\nfields:\n  - name: state\n    type: integer\n  - name: nothing\n    type: \"null\"\n    nullable: false\n",
        SchemaFormat::Yaml,
    )
    .expect("parse schema");
    assert!(schema.fields[0].nullable);
    assert_eq!(schema.fields[1].field_type, FieldType::Null);
    assert!(!schema.fields[1].nullable);
}

#[test]
fn nullable_default_follows_field_type() {
    let schema = RecordSchema::parse(
        "name: t\nfields:\n  - name: x\n    type: \"null\"\n  - name: y\n    type: \"null\"\n    nullable: true\n  - name: z\n    type: date\n",
        SchemaFormat::Yaml,
    )
    .expect("parse schema");
    assert_eq!(schema.fields[0], SchemaField::new("x", FieldType::Null));
    assert!(!schema.fields[0].nullable);
    assert!(schema.fields[1].nullable);
    assert!(schema.fields[2].nullable);

    let schema = RecordSchema::parse(
        r#"{"name": "t", "fields": [{"name": "x", "type": "null"}]}"#,
        SchemaFormat::Json,
    )
    .expect("parse json schema");
    assert!(!schema.fields[0].nullable);
}

//! End-to-end scenarios for the decode → diff → present pipeline.
//!
//! Each test feeds one raw envelope payload through an [`Inspector`] and
//! checks the resulting display record, the way a broker consumption
//! loop would per dequeued message.

use oxbow_cdc::{
    DecodeError, DiffPolicy, Inspector, Origin, Rendered, RowTag, SectionKind, TIMESTAMP_ABSENT,
};
use serde_json::json;

fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("oxbow_cdc=debug")
        .with_test_writer()
        .try_init();
}

fn origin() -> Origin {
    Origin::new("cdc.public.users", 0, 10)
}

fn expect_event(rendered: Rendered) -> oxbow_cdc::DisplayRecord {
    match rendered {
        Rendered::Event(record) => record,
        Rendered::Malformed { error, .. } => panic!("unexpected decode failure: {error}"),
    }
}

#[test]
fn create_event_renders_after_image() {
    init_test_logging();
    let inspector = Inspector::new();
    let raw = br#"{"op":"c","source":{"table":"users"},"after":{"id":1,"name":"Ann"}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    assert_eq!(record.label, "CREATE");
    assert_eq!(record.table, "users");
    assert_eq!(record.timestamp, TIMESTAMP_ABSENT);
    assert_eq!(record.origin, origin());

    assert_eq!(record.sections.len(), 1);
    let data = &record.sections[0];
    assert_eq!(data.kind, SectionKind::Data);
    let rows: Vec<_> = data
        .rows
        .iter()
        .map(|row| (row.field.as_str(), row.value.clone(), row.tag))
        .collect();
    assert_eq!(
        rows,
        [
            ("id", json!(1), RowTag::Plain),
            ("name", json!("Ann"), RowTag::Plain),
        ]
    );
}

#[test]
fn update_tags_changed_field_in_after_section() {
    init_test_logging();
    let inspector = Inspector::new();
    let raw = br#"{"op":"u","before":{"status":"pending"},"after":{"status":"shipped"}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    assert_eq!(record.label, "UPDATE");

    let before = &record.sections[0];
    assert_eq!(before.kind, SectionKind::Before);
    assert_eq!(before.rows[0].field, "status");
    assert_eq!(before.rows[0].value, json!("pending"));
    assert_eq!(before.rows[0].tag, RowTag::Plain);

    let after = &record.sections[1];
    assert_eq!(after.kind, SectionKind::After);
    assert_eq!(after.rows[0].field, "status");
    assert_eq!(after.rows[0].value, json!("shipped"));
    assert_eq!(after.rows[0].tag, RowTag::Changed);
}

#[test]
fn update_omits_dropped_field_by_default() {
    let inspector = Inspector::new();
    let raw = br#"{"op":"u","before":{"status":"pending","qty":2},"after":{"status":"pending"}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    let after = &record.sections[1];
    assert_eq!(after.rows.len(), 1);
    assert_eq!(after.rows[0].field, "status");
    assert_eq!(after.rows[0].tag, RowTag::Plain);
}

#[test]
fn update_reports_dropped_field_under_removed_policy() {
    let inspector = Inspector::new().with_diff_policy(DiffPolicy::with_removed());
    let raw = br#"{"op":"u","before":{"status":"pending","qty":2},"after":{"status":"pending"}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    let after = &record.sections[1];
    assert_eq!(after.rows.len(), 2);
    assert_eq!(after.rows[1].field, "qty");
    assert_eq!(after.rows[1].value, json!(2));
    assert_eq!(after.rows[1].tag, RowTag::Removed);
}

#[test]
fn delete_renders_before_image() {
    let inspector = Inspector::new();
    let raw = br#"{"op":"d","source":{"table":"orders"},"ts_ms":0,"before":{"id":7}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    assert_eq!(record.label, "DELETE");
    // epoch start is a legitimate timestamp, never "N/A"
    assert_eq!(record.timestamp, "1970-01-01 00:00:00");
    assert_eq!(record.sections[0].kind, SectionKind::Deleted);
    assert_eq!(record.sections[0].rows[0].field, "id");
}

#[test]
fn malformed_payload_yields_diagnostic_not_crash() {
    init_test_logging();
    let inspector = Inspector::new();

    match inspector.inspect(b"not json", origin()) {
        Rendered::Malformed { error, origin } => {
            assert!(matches!(error, DecodeError::InvalidJson { .. }));
            assert_eq!(error.raw().as_ref(), b"not json");
            assert_eq!(origin.topic, "cdc.public.users");
        }
        Rendered::Event(record) => panic!("decoded malformed payload: {record:?}"),
    }

    // the stream keeps flowing: the same inspector still decodes
    let record = expect_event(inspector.inspect(br#"{"op":"r","after":{"id":1}}"#, origin()));
    assert_eq!(record.label, "READ (snapshot)");

    let snapshot = inspector.metrics().snapshot();
    assert_eq!(snapshot.decode_errors, 1);
    assert_eq!(snapshot.snapshots, 1);
}

#[test]
fn missing_op_classifies_unknown_with_no_rows() {
    let inspector = Inspector::new();
    let raw = br#"{"source":{"table":"users"},"before":{"id":1},"after":{"id":1}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    assert_eq!(record.label, "UNKNOWN (<missing>)");
    assert_eq!(record.table, "users");
    assert!(record.sections.is_empty());
}

#[test]
fn unknown_op_code_preserved_in_label() {
    let inspector = Inspector::new();
    let record = expect_event(inspector.inspect(br#"{"op":"truncate"}"#, origin()));
    assert_eq!(record.label, "UNKNOWN (truncate)");
    assert!(record.sections.is_empty());
}

#[test]
fn inspect_twice_yields_identical_records() {
    let inspector = Inspector::new();
    let raw = br#"{"op":"u","source":{"table":"orders"},"ts_ms":1705000000000,
                   "before":{"status":"pending","qty":2},
                   "after":{"status":"shipped","qty":2}}"#;

    let first = expect_event(inspector.inspect(raw, origin()));
    let second = expect_event(inspector.inspect(raw, origin()));
    assert_eq!(first, second);
}

#[test]
fn display_record_serializes_for_structured_sinks() {
    let inspector = Inspector::new();
    let raw = br#"{"op":"c","source":{"table":"users"},"after":{"id":1}}"#;

    let record = expect_event(inspector.inspect(raw, origin()));
    let rendered = serde_json::to_value(&record).unwrap();
    assert_eq!(rendered["label"], "CREATE");
    assert_eq!(rendered["origin"]["topic"], "cdc.public.users");
    assert_eq!(rendered["sections"][0]["kind"], "data");
    assert_eq!(rendered["sections"][0]["rows"][0]["tag"], "plain");
}

#[test]
fn concurrent_workers_share_one_inspector() {
    let inspector = Inspector::new();
    let handles: Vec<_> = (0..8i64)
        .map(|offset| {
            let inspector = inspector.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    let raw = format!(
                        r#"{{"op":"u","before":{{"n":{i}}},"after":{{"n":{}}}}}"#,
                        i + 1
                    );
                    let record = expect_event(
                        inspector.inspect(raw.as_bytes(), Origin::new("t", 0, offset)),
                    );
                    assert_eq!(record.sections[1].rows[0].tag, RowTag::Changed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(inspector.metrics().snapshot().updates, 800);
}

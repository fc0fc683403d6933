//! Console renderer over a canned stream of CDC envelopes.
//!
//! Shows the engine's side of the contract: the caller owns dequeueing
//! and literal formatting; `oxbow-cdc` turns each payload into a
//! `DisplayRecord` (or a malformed-payload diagnostic).
//!
//! Run with: cargo run -p oxbow-cdc --example render_stream

use oxbow_cdc::{Inspector, Origin, Rendered, RowTag, SectionKind};

fn section_title(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Data => "Data",
        SectionKind::Before => "Before",
        SectionKind::After => "After",
        SectionKind::Deleted => "Deleted Data",
    }
}

fn render(rendered: Rendered) {
    println!("{}", "=".repeat(60));
    match rendered {
        Rendered::Event(record) => {
            println!("Operation: {}", record.label);
            println!("Table:     {}", record.table);
            println!("Timestamp: {}", record.timestamp);
            println!("Origin:    {}", record.origin);
            for section in &record.sections {
                println!("\n{}:", section_title(section.kind));
                for row in &section.rows {
                    let tag = match row.tag {
                        RowTag::Plain => "",
                        RowTag::Changed => "  <- CHANGED",
                        RowTag::Removed => "  <- REMOVED",
                    };
                    println!("  {}: {}{tag}", row.field, row.value);
                }
            }
        }
        Rendered::Malformed { error, origin } => {
            println!("Malformed payload from {origin}: {error}");
            println!("Raw bytes: {:?}", error.raw());
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("oxbow_cdc=debug")
        .init();

    let inspector = Inspector::new();

    let stream: Vec<(&str, &[u8])> = vec![
        (
            "cdc.public.users",
            br#"{"op":"c","source":{"table":"users"},"ts_ms":1705000000000,
                "after":{"id":1,"username":"ann","email":"ann@example.com"}}"#,
        ),
        (
            "cdc.public.orders",
            br#"{"op":"u","source":{"table":"orders"},"ts_ms":1705000060000,
                "before":{"id":10,"status":"pending","qty":2},
                "after":{"id":10,"status":"shipped","qty":2}}"#,
        ),
        (
            "cdc.public.orders",
            br#"{"op":"d","source":{"table":"orders"},"ts_ms":1705000120000,
                "before":{"id":10,"status":"completed"}}"#,
        ),
        (
            "cdc.public.users",
            br#"{"op":"r","source":{"table":"users"},"after":{"id":2,"username":"bob"}}"#,
        ),
        ("cdc.public.users", b"not json at all"),
    ];

    for (offset, (topic, payload)) in stream.into_iter().enumerate() {
        render(inspector.inspect(payload, Origin::new(topic, 0, offset as i64)));
    }

    let snapshot = inspector.metrics().snapshot();
    println!("{}", "=".repeat(60));
    println!(
        "Processed {} events ({} decode errors, {:.0} events/sec)",
        snapshot.events_total, snapshot.decode_errors, snapshot.events_per_second
    );

    Ok(())
}

//! Integration tests for the configreader-core public API.
//!
//! These exercise the document model, the INI codec, coercion and search
//! together, the way the engine crate drives them.

use configreader_core::{
    coerce, parse, search, serialize, Document, SearchOptions, Value, DEFAULT_SECTION,
};

#[test]
fn test_bootstrap_document_survives_text_round_trip() {
    let doc = Document::bootstrap();
    let restored = parse(&serialize(&doc)).expect("parse must succeed");
    assert_eq!(restored, doc);
    assert_eq!(restored.get(DEFAULT_SECTION, "reader"), Some("configreader"));
}

#[test]
fn test_typed_values_read_back_after_round_trip() {
    // Arrange: store typed values as their text form, as the engine does.
    let mut doc = Document::bootstrap();
    doc.set("main", "truth", Value::Bool(true).to_stored());
    doc.set("main", "empty", Value::from("").to_stored());
    doc.set("main", "state", Value::Null.to_stored());
    doc.set("first", "count", Value::Int(0).to_stored());

    // Act
    let restored = parse(&serialize(&doc)).expect("parse must succeed");
    let read = |section: &str, key: &str| restored.get(section, key).map(coerce);

    // Assert
    assert_eq!(read("main", "truth"), Some(Value::Bool(true)));
    assert_eq!(read("main", "empty"), Some(Value::Str(String::new())));
    assert_eq!(read("main", "state"), Some(Value::Null));
    assert_eq!(read("first", "count"), Some(Value::Int(0)));
    assert_eq!(read("main", "count"), None);
}

#[test]
fn test_hand_written_file_is_searchable() {
    let text = "\
# hand-written settings
[main]
new = False

[MainSection]
browser = default
header = False
";
    let doc = parse(text).expect("parse must succeed");

    let hit = search(&doc, "default", &SearchOptions::exact())
        .expect("valid threshold")
        .expect("value must be found");

    assert_eq!(hit.as_tuple(), ("browser", "default", "MainSection"));
}

#[test]
fn test_search_order_follows_file_order() {
    let text = "[b]\nk = same\n[a]\nk = same\n";
    let doc = parse(text).expect("parse must succeed");

    let hit = search(&doc, "same", &SearchOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(hit.section, "b");
}

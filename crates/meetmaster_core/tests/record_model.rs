use meetmaster_core::{FixedClock, Record, RecordKind, RecordPayload, RecordValidationError};

fn clock() -> FixedClock {
    FixedClock::at(2024, 5, 14, 10, 15, 0).unwrap()
}

#[test]
fn constructors_stamp_from_clock() {
    let record = Record::information("Kickoff", "intro notes", "Alice", &clock()).unwrap();

    assert_eq!(record.creation_date, "14/05/2024");
    assert_eq!(record.creation_time, "10:15:00");
    assert_eq!(record.kind(), RecordKind::Information);
    assert_eq!(
        record.payload,
        RecordPayload::Information {
            given_by: "Alice".to_string()
        }
    );
}

#[test]
fn kind_follows_payload() {
    let decision = Record::decision("Budget", "", "approved", &clock()).unwrap();
    let task = Record::task("Draft", "", "Bob", "high", "next friday", &clock()).unwrap();

    assert_eq!(decision.kind(), RecordKind::Decision);
    assert_eq!(task.kind(), RecordKind::Task);
}

#[test]
fn restore_keeps_stamps_verbatim() {
    let record = Record::restore(
        "31/12/1999",
        "23:59:59",
        "Millennium",
        "",
        RecordPayload::Decision {
            result: "party".to_string(),
        },
    )
    .unwrap();

    assert_eq!(record.creation_date, "31/12/1999");
    assert_eq!(record.creation_time, "23:59:59");
}

#[test]
fn blank_title_is_rejected() {
    let err = Record::decision("   ", "", "approved", &clock()).unwrap_err();
    assert_eq!(err, RecordValidationError::EmptyTitle);
}

#[test]
fn kind_tags_are_capitalized_and_case_sensitive() {
    assert_eq!(RecordKind::Task.as_str(), "Task");
    assert_eq!(RecordKind::parse("Information"), Some(RecordKind::Information));
    assert_eq!(RecordKind::parse("information"), None);
    assert_eq!(RecordKind::parse("Unknown"), None);
}

#[test]
fn serialization_tags_payload_with_kind() {
    let record = Record::task("Draft", "outline", "Bob", "high", "01/06/2024", &clock()).unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["kind"], "Task");
    assert_eq!(json["title"], "Draft");
    assert_eq!(json["owner"], "Bob");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["due"], "01/06/2024");
    assert!(json.get("given_by").is_none());

    let decoded: Record = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn deserialize_rejects_blank_title() {
    let value = serde_json::json!({
        "creation_date": "14/05/2024",
        "creation_time": "10:15:00",
        "title": "  ",
        "description": "",
        "kind": "Decision",
        "result": "approved"
    });

    let err = serde_json::from_value::<Record>(value).unwrap_err();
    assert!(
        err.to_string().contains("record title must not be empty"),
        "unexpected error: {err}"
    );
}

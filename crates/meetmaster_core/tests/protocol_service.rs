use meetmaster_core::{
    build_record, FieldSource, FixedClock, InputError, ProtocolService, Record, RecordKind,
    RecordPayload, RecordValidationError, ServiceError, StoreError,
};
use std::collections::VecDeque;
use std::fs;
use std::io;
use tempfile::TempDir;

/// Answers prompts from a fixed script and remembers what was asked.
#[derive(Default)]
struct ScriptedFields {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedFields {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl FieldSource for ScriptedFields {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

fn clock() -> FixedClock {
    FixedClock::at(2024, 5, 14, 10, 15, 0).unwrap()
}

fn service(dir: &TempDir) -> ProtocolService<FixedClock> {
    ProtocolService::new(dir.path().join("meeting_protocol.txt"), clock())
}

#[test]
fn kickoff_scenario_across_processes() {
    let dir = TempDir::new().unwrap();

    let first = service(&dir);
    let record = Record::information("Kickoff", "intro notes", "Alice", &clock()).unwrap();
    assert_eq!(first.add(record).unwrap().value, 0);

    let second = service(&dir);
    assert_eq!(second.show(None).unwrap().value, vec!["Kickoff"]);
    assert_eq!(
        second.show(Some(RecordKind::Information)).unwrap().value,
        vec!["Kickoff"]
    );
    assert!(second
        .show(Some(RecordKind::Task))
        .unwrap()
        .value
        .is_empty());
}

#[test]
fn add_prompted_asks_variant_fields_in_order() {
    let dir = TempDir::new().unwrap();
    let mut fields = ScriptedFields::new(&["plan the release", "Bob", "high", "2024-06-01"]);

    let index = service(&dir)
        .add_prompted(RecordKind::Task, "Release", None, &mut fields)
        .unwrap()
        .value;
    assert_eq!(index, 0);
    assert_eq!(fields.asked, vec!["Description", "Owner", "Priority", "Due"]);

    let records = service(&dir).records(None).unwrap().value;
    assert_eq!(
        records[0].payload,
        RecordPayload::Task {
            owner: "Bob".to_string(),
            priority: "high".to_string(),
            due: "2024-06-01".to_string(),
        }
    );
    assert_eq!(records[0].description, "plan the release");
}

#[test]
fn given_description_is_not_prompted() {
    let mut fields = ScriptedFields::new(&["approved"]);
    let record = build_record(
        RecordKind::Decision,
        "Budget",
        Some("q3".to_string()),
        &mut fields,
        &clock(),
    )
    .unwrap();

    assert_eq!(fields.asked, vec!["Result"]);
    assert_eq!(record.description, "q3");
    assert_eq!(record.creation_date, "14/05/2024");
}

#[test]
fn blank_title_fails_before_prompting() {
    let mut fields = ScriptedFields::default();
    let err = build_record(RecordKind::Information, " ", None, &mut fields, &clock()).unwrap_err();

    assert!(matches!(
        err,
        InputError::Validation(RecordValidationError::EmptyTitle)
    ));
    assert!(fields.asked.is_empty());
}

#[test]
fn exhausted_input_does_not_touch_file() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let mut fields = ScriptedFields::new(&["desc"]);

    let err = svc
        .add_prompted(RecordKind::Decision, "Budget", None, &mut fields)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Input(InputError::Io(_))));
    assert!(!svc.path().exists());
}

#[test]
fn remove_out_of_range_keeps_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    svc.add(Record::decision("Budget", "", "approved", &clock()).unwrap())
        .unwrap();
    let before = fs::read_to_string(svc.path()).unwrap();

    let err = svc.remove(4).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::OutOfRange { index: 4, len: 1 })
    ));
    assert_eq!(fs::read_to_string(svc.path()).unwrap(), before);
}

#[test]
fn remove_and_delete_all_persist() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    for title in ["A", "B", "C"] {
        svc.add(Record::decision(title, "", "ok", &clock()).unwrap())
            .unwrap();
    }

    let removed = svc.remove(1).unwrap().value;
    assert_eq!(removed.title, "B");
    assert_eq!(svc.show(None).unwrap().value, vec!["A", "C"]);

    assert_eq!(svc.delete_all().unwrap().value, 2);
    assert!(svc.show(None).unwrap().value.is_empty());
}

#[test]
fn show_reports_skipped_rows() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    fs::write(
        svc.path(),
        "creation_date|creation_time|kind|title|desc|given_by|result|owner|priority|due\n\
         14/05/2024|10:15:00|Note|Lunch||||||\n",
    )
    .unwrap();

    let listing = svc.show(None).unwrap();
    assert!(listing.value.is_empty());
    assert_eq!(listing.skipped.len(), 1);
    assert_eq!(listing.skipped[0].line, 2);
}

const HEADER: &str = "creation_date|creation_time|kind|title|desc|given_by|result|owner|priority|due";

#[test]
fn mutations_return_rows_dropped_by_the_rewrite() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    fs::write(
        svc.path(),
        format!(
            "{HEADER}\n\
             14/05/2024|10:15:00|Information|Kickoff|intro|Alice||||\n\
             14/05/2024|10:16:00|Memo|Lunch||||||\n"
        ),
    )
    .unwrap();

    let added = svc
        .add(Record::decision("Budget", "", "approved", &clock()).unwrap())
        .unwrap();
    assert_eq!(added.value, 1);
    assert_eq!(added.skipped.len(), 1);
    assert_eq!(added.skipped[0].line, 3);

    // The rewrite no longer contains the unreadable row.
    let removed = svc.remove(0).unwrap();
    assert!(removed.skipped.is_empty());

    fs::write(
        svc.path(),
        format!("{HEADER}\n14/05/2024|10:16:00|Memo|Lunch||||||\n"),
    )
    .unwrap();
    let cleared = svc.delete_all().unwrap();
    assert_eq!(cleared.value, 0);
    assert_eq!(cleared.skipped.len(), 1);
}

#[test]
fn records_report_skipped_rows() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    fs::write(
        svc.path(),
        format!(
            "{HEADER}\n\
             14/05/2024|10:15:00|Decision|Budget|||approved|||\n\
             14/05/2024|10:16:00|Task|Short\n"
        ),
    )
    .unwrap();

    let outcome = svc.records(None).unwrap();
    assert_eq!(outcome.value.len(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].line, 3);
}

#[test]
fn hand_written_backslashes_survive_a_mutation() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    fs::write(
        svc.path(),
        format!("{HEADER}\n14/05/2024|10:15:00|Information|Paths|see C:\\docs|Alice||||\n"),
    )
    .unwrap();

    let added = svc
        .add(Record::decision("Budget", "", "approved", &clock()).unwrap())
        .unwrap();
    assert!(added.skipped.is_empty());

    let records = svc.records(None).unwrap().value;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].description, "see C:\\docs");
}

//! End-to-end ingest tests: file on disk -> validated patient frame.

use std::io::Write;

use pdd_ingest::{
    build_patient_frame, check_fluency_consistency, check_score_ranges, default_score_ranges,
    load_criteria_file, read_csv_table, resolve_duplicate_visits,
};
use pdd_model::{ConflictPolicy, PddError};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_and_validates_patient_export() {
    let file = write_temp(
        "id,age,mmse,faq,visit\n\
         P001,71,27,3,1\n\
         P002,68,21,14,1\n\
         P002,69,19,16,2\n",
    );
    let table = read_csv_table(file.path()).expect("read csv");
    let frame = build_patient_frame(&table).expect("build frame");
    check_score_ranges(&frame, &default_score_ranges()).expect("ranges ok");
    let frame = resolve_duplicate_visits(&frame, Some("visit")).expect("dedupe");
    assert_eq!(frame.height(), 2);
}

#[test]
fn semicolon_export_is_accepted() {
    let file = write_temp("id;mmse;faq\nP001;25;4\n");
    let table = read_csv_table(file.path()).expect("read csv");
    assert_eq!(table.headers, vec!["id", "mmse", "faq"]);
    let frame = build_patient_frame(&table).expect("build frame");
    assert_eq!(frame.height(), 1);
}

#[test]
fn out_of_range_export_halts_with_offender_listing() {
    let file = write_temp("id,mmse\nP001,27\nP002,35\n");
    let table = read_csv_table(file.path()).expect("read csv");
    let frame = build_patient_frame(&table).expect("build frame");
    let error = check_score_ranges(&frame, &default_score_ranges()).unwrap_err();
    let PddError::ScoresOutOfRange(violations) = error else {
        panic!("expected range error");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].id, "P002");
    assert_eq!(violations[0].column, "mmse");
}

#[test]
fn fluency_conflict_prefers_primary_by_default() {
    let file = write_temp(
        "id,fluency_s,fluency_p\n\
         P001,18,18\n\
         P002,9,21\n",
    );
    let table = read_csv_table(file.path()).expect("read csv");
    let frame = build_patient_frame(&table).expect("build frame");
    let conflicts = check_fluency_consistency(
        &frame,
        "fluency_s",
        "fluency_p",
        5.0,
        ConflictPolicy::PreferPrimary,
    )
    .expect("policy continues");
    assert_eq!(conflicts, vec!["P002".to_string()]);
}

#[test]
fn fluency_conflict_halts_when_configured() {
    let file = write_temp("id,fluency_s,fluency_p\nP002,9,21\n");
    let table = read_csv_table(file.path()).expect("read csv");
    let frame = build_patient_frame(&table).expect("build frame");
    let error =
        check_fluency_consistency(&frame, "fluency_s", "fluency_p", 5.0, ConflictPolicy::Halt)
            .unwrap_err();
    assert!(matches!(error, PddError::FluencyConflict(ids) if ids == vec!["P002".to_string()]));
}

#[test]
fn criteria_file_round_trip() {
    let file = write_temp(
        "variant,group,iadl_source,global_test,global_cutoff,iadl_test,iadl_cutoff,language_test,language_cutoff\n\
         mds_mmse,mmse,faq,mmse,26,faq,9,,\n\
         mds_moca,moca,other,moca,26,pill_q,0,fluency,9\n",
    );
    let variants = load_criteria_file(file.path()).expect("load criteria");
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].name, "mds_mmse");
    assert!(variants[0].language.is_none());
    assert_eq!(variants[1].language.as_ref().unwrap().column, "fluency");
}

//! End-to-end pipeline tests over temporary CSV fixtures.

use std::fs;
use std::path::PathBuf;

use pdd_cli::pipeline::{self, RunConfig};
use pdd_model::{ConflictPolicy, KappaDisplay, PipelineOptions};

const PATIENTS: &str = "id,mmse,moca,faq,pill_q,fluency\n\
                        P001,20,18,15,1,5\n\
                        P002,29,28,2,0,14\n\
                        P003,24,22,12,1,6\n\
                        P004,28,27,1,0,12\n";

const CRITERIA: &str = "variant,group,iadl_source,global_test,global_cutoff,\
                        iadl_test,iadl_cutoff,language_test,language_cutoff\n\
                        mds_mmse,mmse,faq,mmse,26,faq,9,,\n\
                        mds_moca,moca,other,moca,26,pill_q,0,fluency,9\n";

fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn run_config(dir: &std::path::Path, options: PipelineOptions, dry_run: bool) -> RunConfig {
    RunConfig {
        patients: write_fixture(dir, "patients.csv", PATIENTS),
        criteria: write_fixture(dir, "criteria.csv", CRITERIA),
        output_dir: dir.join("output"),
        options,
        visit_column: None,
        dry_run,
    }
}

#[test]
fn full_run_writes_all_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), PipelineOptions::default(), false);

    let result = pipeline::run(&config).expect("run pipeline");

    assert_eq!(result.patients, 4);
    assert_eq!(result.variants.len(), 2);
    assert_eq!(result.table.pairs.len(), 4);
    for name in [
        "diagnoses.csv",
        "concordance.csv",
        "summary.json",
        "plots/kappa.svg",
        "plots/accuracy.svg",
        "plots/sensitivity.svg",
        "plots/specificity.svg",
    ] {
        assert!(
            dir.path().join("output").join(name).exists(),
            "missing output {name}"
        );
    }
}

#[test]
fn identical_labelings_agree_perfectly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), PipelineOptions::default(), true);

    let result = pipeline::run(&config).expect("run pipeline");

    // Both variants flag P001 and P003, so cross-variant Kappa is perfect.
    let pair = result
        .table
        .pair("mds_mmse", "mds_moca")
        .expect("cross pair");
    assert_eq!(pair.n, 4);
    assert!((pair.kappa.expect("kappa").estimate - 1.0).abs() < 1e-12);
    assert!((pair.accuracy.expect("accuracy").estimate - 1.0).abs() < 1e-12);

    // Prevalences tie at 0.5; name order breaks the tie.
    let names: Vec<&str> = result
        .ordered
        .iter()
        .map(|variant| variant.name.as_str())
        .collect();
    assert_eq!(names, ["mds_mmse", "mds_moca"]);
}

#[test]
fn self_pairs_carry_sentinel_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), PipelineOptions::default(), true);

    let result = pipeline::run(&config).expect("run pipeline");
    let own = result.table.pair("mds_mmse", "mds_mmse").expect("self pair");
    assert_eq!(own.kappa.expect("kappa").estimate, 1.0);
    assert_eq!(own.accuracy.expect("accuracy").estimate, 1.0);
    assert!(own.sensitivity.is_none());
    assert!(own.mcnemar_p.is_none());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = run_config(dir.path(), PipelineOptions::default(), true);

    let result = pipeline::run(&config).expect("run pipeline");

    assert!(result.outputs.is_empty());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn out_of_range_score_fails_the_import() {
    let dir = tempfile::tempdir().expect("tempdir");
    let patients = write_fixture(dir.path(), "patients.csv", "id,mmse,faq\nP001,31,2\n");

    let error = pipeline::ingest(&patients, None, ConflictPolicy::PreferPrimary)
        .expect_err("range violation");
    assert!(format!("{error:#}").contains("mmse"));
}

#[test]
fn kappa_display_flag_reaches_the_result() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = PipelineOptions::default().with_kappa_display(KappaDisplay::Full);
    let config = run_config(dir.path(), options, true);

    let result = pipeline::run(&config).expect("run pipeline");
    assert_eq!(result.display, KappaDisplay::Full);
}

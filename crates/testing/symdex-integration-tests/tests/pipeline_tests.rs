//! End-to-end builds writing payload files

use expect_test::expect;
use std::fs;
use std::path::{Path, PathBuf};
use sx_ast::PackageMap;
use sx_driver::{Build, BuildReport, Config, DriverError, LOCK_FILE_NAME, OutputLock};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn build_mixed(out_dir: &Path) -> BuildReport {
    let corpus = fixture("mixed");
    let packages =
        PackageMap::from_file(&corpus.join("packages.toml")).expect("Failed to load package file");
    Build::from_dir(&corpus, Config::default())
        .with_packages(packages)
        .run(out_dir)
        .expect("Build failed")
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).expect("Payload missing")
}

#[test]
fn test_report_counts() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    let report = build_mixed(out.path());

    assert_eq!(report.indexed, 5);
    let skipped: Vec<&str> = report
        .skipped
        .iter()
        .map(|module| module.identifier.as_str())
        .collect();
    assert_eq!(skipped, vec!["broken", "zz_kinds_copy"]);
    assert_eq!(report.ignored, vec!["driver_main".to_string()]);
    assert_eq!(report.ambiguous_symbols, 1);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.top_modules[0].name, "kinds");
    assert_eq!(report.written.len(), 5);
    assert!(!out.path().join(LOCK_FILE_NAME).exists());
}

#[test]
fn test_modules_publics_payload() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    build_mixed(out.path());

    expect![[r#"
        modules = '{"app":[],"kinds":["dp","sp"],"report":[],"solver":["norm","solve"],"util":["dp","norm"]}'
        symbols = '{"dp":["kinds"],"norm":["solver","util"],"solve":["solver"],"sp":["kinds"]}'
    "#]]
    .assert_eq(&read(out.path(), "modules_publics.json"));
}

#[test]
fn test_packages_modules_payload() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    build_mixed(out.path());

    expect![[r#"
        packages = '["pkg__common","pkg__num__solvers","pkg__root"]'
        modules = '{"app":"pkg__root","kinds":"pkg__common","solver":"pkg__num__solvers","util":"pkg__common"}'
    "#]]
    .assert_eq(&read(out.path(), "packages_modules.json"));
}

#[test]
fn test_usage_stats_payload() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    build_mixed(out.path());

    expect![[r#"
        modules_used = '[["kinds",4],["util",2],["solver",2]]'
        symbols_used = '[["kinds:dp",4],["util:norm",2],["solver:solve",2]]'
        packages_used = '{"pkg__common":{"modules":[["kinds",4],["util",2]],"symbols":[["kinds:dp",4],["util:norm",2]]},"pkg__num__solvers":{"modules":[["solver",2]],"symbols":[["solver:solve",2]]}}'
    "#]]
    .assert_eq(&read(out.path(), "usage_stats.json"));
}

#[test]
fn test_privates_and_disambiguation_payloads() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    build_mixed(out.path());

    expect![[r#"
        modules_priv_symbols = '{"solver":["work"],"util":["scratch"]}'
        priv_symbols = '{"scratch":["util"],"work":["solver"]}'
    "#]]
    .assert_eq(&read(out.path(), "privates_referenced.json"));

    expect![[r#"
        ambiguous_symbols = '{"norm":["solver","util"]}'
    "#]]
    .assert_eq(&read(out.path(), "disambiguation.json"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let first = tempfile::tempdir().expect("Failed to create temp dir");
    let second = tempfile::tempdir().expect("Failed to create temp dir");
    let report = build_mixed(first.path());
    build_mixed(second.path());

    for path in &report.written {
        let name = path.file_name().expect("payload file name");
        assert_eq!(
            fs::read(path).expect("Payload missing"),
            fs::read(second.path().join(name)).expect("Payload missing"),
            "{name:?} differs between runs"
        );
    }
}

#[test]
fn test_configured_file_names_and_threshold() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::from_toml(
        Path::new("symdex.toml"),
        "[stats]\nmin_consumers = 3\n\n[output]\nusage_stats = \"usage.txt\"\n",
    )
    .expect("Invalid configuration");

    Build::from_dir(&fixture("mixed"), config)
        .run(out.path())
        .expect("Build failed");

    expect![[r#"
        modules_used = '[["kinds",4]]'
        symbols_used = '[["kinds:dp",4]]'
        packages_used = '{}'
    "#]]
    .assert_eq(&read(out.path(), "usage.txt"));
    assert!(!out.path().join("usage_stats.json").exists());
}

#[test]
fn test_locked_output_is_refused() {
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    let _lock = OutputLock::acquire(out.path()).expect("Failed to lock");

    let err = Build::from_dir(&fixture("mixed"), Config::default())
        .run(out.path())
        .expect_err("Build should not run in a locked directory");
    assert!(matches!(err, DriverError::Locked { .. }));
    assert!(!out.path().join("modules_publics.json").exists());
}

#[test]
fn test_missing_corpus_is_fatal() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = Build::from_dir(&dir.path().join("absent"), Config::default())
        .run(&dir.path().join("out"))
        .expect_err("Build should fail without a corpus");

    assert!(matches!(err, DriverError::Ast(sx_ast::AstError::Io { .. })));
    assert!(!dir.path().join("out").join(LOCK_FILE_NAME).exists());
}

//! Integration tests for application construction.
//!
//! These tests build application directories on disk with assert_fs and
//! load them through the public constructors.

use assert_fs::prelude::*;
use assert_fs::TempDir;

use appdef::app::options::{Metadata, WithComposes, WithParameters, WithParametersFiles};
use appdef::app::{new_app, new_app_from_default_files, App, AppError, AppOption};
use appdef::core::config::Config;
use appdef::core::layout::{CoreFileNames, COMPOSE_FILE_NAME, METADATA_FILE_NAME, PARAMETERS_FILE_NAME};

const VALID_META: &str = "name: test-app\nversion: 0.1.0";
const VALID_COMPOSE: &str = "version: \"3.0\"\nservices:\n  web:\n    image: nginx";
const VALID_PARAMETERS: &str = "foo: bar";

// =============================================================================
// Test Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An application directory with the three core documents at its root.
fn app_dir() -> TempDir {
    init_tracing();
    let dir = TempDir::new().expect("create temp dir");
    dir.child(METADATA_FILE_NAME).write_str(VALID_META).unwrap();
    dir.child(PARAMETERS_FILE_NAME)
        .write_str(VALID_PARAMETERS)
        .unwrap();
    dir.child(COMPOSE_FILE_NAME).write_str(VALID_COMPOSE).unwrap();
    dir
}

fn attachment_paths(app: &App) -> Vec<&str> {
    app.attachments().iter().map(|a| a.path()).collect()
}

// =============================================================================
// Default files
// =============================================================================

#[test]
fn default_files_only_core() {
    let dir = app_dir();
    let app = new_app_from_default_files(dir.path()).unwrap();

    assert_eq!(app.path(), dir.path().to_string_lossy());
    assert_eq!(app.parameters_raw().len(), 1);
    assert_eq!(app.parameters_raw()[0], VALID_PARAMETERS.as_bytes());
    assert_eq!(app.composes().len(), 1);
    assert_eq!(app.composes()[0], VALID_COMPOSE.as_bytes());
    assert_eq!(app.metadata_raw(), Some(VALID_META.as_bytes()));
    assert!(app.attachments().is_empty());
}

#[test]
fn default_files_missing_documents_are_not_errors() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    dir.child("README.md").write_str("hello").unwrap();

    let app = new_app_from_default_files(dir.path()).unwrap();
    assert!(app.metadata_raw().is_none());
    assert!(app.parameters_raw().is_empty());
    assert!(app.composes().is_empty());
    assert_eq!(attachment_paths(&app), vec!["README.md"]);
}

#[test]
fn default_files_invalid_metadata_fails() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    dir.child(METADATA_FILE_NAME).write_str("name: x").unwrap();

    let err = new_app_from_default_files(dir.path()).unwrap_err();
    assert!(err
        .to_string()
        .contains("failed to validate metadata:\n- (root): version is required"));
}

#[test]
fn attachments_and_nested_directories() {
    let dir = app_dir();
    dir.child("config.cfg").write_str("something").unwrap();
    dir.child("nesteddirectory").create_dir_all().unwrap();
    dir.child("nesteddirectory/nestedconfig.cfg")
        .write_str("something")
        .unwrap();

    let app = new_app_from_default_files(dir.path()).unwrap();
    assert_eq!(app.attachments().len(), 2);
    assert_eq!(app.attachments()[0].path(), "config.cfg");
    assert_eq!(app.attachments()[0].size(), 9);
    assert_eq!(
        app.attachments()[1].path(),
        "nesteddirectory/nestedconfig.cfg"
    );
}

#[test]
fn attachments_are_sorted() {
    let dir = app_dir();
    for name in ["c.cfg", "a.cfg", "b.cfg"] {
        dir.child(name).write_str("something").unwrap();
    }
    dir.child("nesteddirectory").create_dir_all().unwrap();
    for name in ["a.cfg", "c.cfg", "b.cfg"] {
        dir.child("nesteddirectory")
            .child(name)
            .write_str("something")
            .unwrap();
    }

    let app = new_app_from_default_files(dir.path()).unwrap();
    assert_eq!(
        attachment_paths(&app),
        vec![
            "a.cfg",
            "b.cfg",
            "c.cfg",
            "nesteddirectory/a.cfg",
            "nesteddirectory/b.cfg",
            "nesteddirectory/c.cfg",
        ]
    );
}

#[test]
fn nested_core_files_are_attachments() {
    let dir = app_dir();
    let nested = dir.child("nesteddirectory");
    nested.create_dir_all().unwrap();
    nested.child(METADATA_FILE_NAME).write_str(VALID_META).unwrap();
    nested
        .child(PARAMETERS_FILE_NAME)
        .write_str("other: value")
        .unwrap();
    nested.child(COMPOSE_FILE_NAME).write_str("x: y").unwrap();

    let app = new_app_from_default_files(dir.path()).unwrap();
    assert_eq!(
        attachment_paths(&app),
        vec![
            "nesteddirectory/docker-compose.yml",
            "nesteddirectory/metadata.yml",
            "nesteddirectory/parameters.yml",
        ]
    );
    assert_eq!(app.parameters_raw().len(), 1);
    assert_eq!(app.parameters_raw()[0], VALID_PARAMETERS.as_bytes());
    assert_eq!(app.composes().len(), 1);
    assert!(app.parameters().get("other").is_none());
}

#[test]
fn alternate_layout_from_config() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    dir.child("app.meta.yml").write_str(VALID_META).unwrap();
    dir.child("compose.yaml").write_str(VALID_COMPOSE).unwrap();
    dir.child(METADATA_FILE_NAME).write_str("ignored: true").unwrap();

    let config_file = dir.child("appdef.toml");
    config_file
        .write_str("[layout]\nmetadata = \"app.meta.yml\"\ncompose = \"compose.yaml\"\n")
        .unwrap();

    let config = Config::load(Some(config_file.path())).unwrap();
    let names = config.core_file_names();
    let app = App::from_directory(dir.path(), &names).unwrap();

    assert_eq!(app.name(), Some("test-app"));
    assert_eq!(app.composes().len(), 1);
    assert_eq!(attachment_paths(&app), vec!["appdef.toml", "metadata.yml"]);
}

#[test]
fn alternate_names_injected_directly() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    dir.child("m").write_str(VALID_META).unwrap();
    dir.child("p").write_str("a: 1").unwrap();

    let names = CoreFileNames::new("m", "p", "c");
    let app = App::from_directory(dir.path(), &names).unwrap();
    assert_eq!(app.version(), Some("0.1.0"));
    assert_eq!(app.parameters().get("a"), Some(&serde_json::json!(1)));
    assert!(!app.has_attachments());
}

// =============================================================================
// Manual composition
// =============================================================================

#[test]
fn manual_composition_mixes_files_and_streams() {
    let dir = app_dir();
    let override_file = dir.child("override.yml");
    override_file.write_str("foo: baz\nextra: 1").unwrap();

    let options: Vec<Box<dyn AppOption>> = vec![
        Box::new(Metadata::new(VALID_META.as_bytes())),
        Box::new(WithParameters::new(VALID_PARAMETERS.as_bytes())),
        Box::new(WithParametersFiles::new([override_file.path()])),
        Box::new(WithComposes::new(VALID_COMPOSE.as_bytes())),
    ];
    let app = new_app("manual", options).unwrap();

    assert_eq!(app.path(), "manual");
    assert_eq!(app.parameters_raw().len(), 2);
    assert_eq!(app.parameters().get("foo"), Some(&serde_json::json!("baz")));
    assert_eq!(app.parameters().get("extra"), Some(&serde_json::json!(1)));
}

#[test]
fn nonexistent_path_named_in_error() {
    init_tracing();
    let missing = "/definitely/not/here/parameters.yml";
    let err = App::builder("app")
        .option(WithParametersFiles::new([missing]))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains(missing));
    assert!(matches!(err.root_cause(), AppError::Read { .. }));
}

#[test]
fn broken_parameters_after_valid_documents() {
    init_tracing();
    let err = App::builder("my-app")
        .option(Metadata::new("version: \"0.1\"\nname: myname".as_bytes()))
        .option(WithComposes::new("version: \"3.6\"".as_bytes()))
        .option(WithParameters::new("my-parameters:\n    1: toto".as_bytes()))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Non-string key in my-parameters: 1"));
}

#[test]
fn cleanup_runs_on_error_paths() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let dir = app_dir();
    let cleaned = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cleaned);

    let mut app = App::builder(dir.path().to_string_lossy())
        .options(appdef::app::default_file_options(
            dir.path(),
            &CoreFileNames::default(),
        ))
        .option(appdef::app::options::WithCleanup::new(move || {
            flag.store(true, Ordering::SeqCst)
        }))
        .build()
        .unwrap();

    let downstream: Result<(), String> = Err("packaging failed".to_string());
    if downstream.is_err() {
        app.run_cleanup();
    }
    assert!(cleaned.load(Ordering::SeqCst));
}

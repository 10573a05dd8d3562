//! Loading restore config from disk

use cloze_restore::{ConfigError, PositionPolicy, RestoreConfig};
use std::io::Write;

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
subquestion_prefix = "part"
choice_type = "gapselect"
position_policy = "fail"

[namespaces]
composite = "question_multianswer"
"#
    )
    .unwrap();

    let config = RestoreConfig::load(file.path()).unwrap();

    assert_eq!(config.subquestion_prefix, "part");
    assert!(config.choice_type.is("gapselect"));
    assert_eq!(config.position_policy, PositionPolicy::Fail);
    assert_eq!(config.namespaces.composite.as_str(), "question_multianswer");
    assert_eq!(config.namespaces.question.as_str(), "question");
}

#[test]
fn load_invalid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "subquestion_prefix = [").unwrap();

    let err = RestoreConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RestoreConfig::load(dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

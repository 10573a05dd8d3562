//! `relink` over a bundle written to disk

use clap::Parser;
use cloze_cli::{run, Cli};
use cloze_codec::ResponsePayload;
use cloze_restore::{AttemptItem, LegacyState, ResponseStep, RestoreBundle};
use cloze_test_utils::{id, owl_fixture, NEW_QUESTION};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn bundle_file() -> NamedTempFile {
    let fixture = owl_fixture();
    let bundle = RestoreBundle {
        store: fixture.store,
        mappings: fixture.mapping.entries(),
        composites: vec![fixture.composite],
        attempts: vec![
            AttemptItem::Legacy(LegacyState::new(id(NEW_QUESTION), "1-Owl,2-25,4-Cat")),
            AttemptItem::Response(ResponseStep {
                question: id(NEW_QUESTION),
                attempt_sequence: 1,
                payload: [("sub2__order", "25,24,23")].into_iter().collect::<ResponsePayload>(),
            }),
        ],
    };

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&bundle).unwrap().as_bytes())
        .unwrap();
    file
}

fn relink(extra: &[&str]) -> anyhow::Result<String> {
    let file = bundle_file();
    let path = file.path().to_str().unwrap().to_string();
    let mut args = vec!["cloze-restore", "relink", path.as_str()];
    args.extend_from_slice(extra);
    run(Cli::try_parse_from(args)?)
}

#[test]
fn text_report() {
    let out = relink(&[]).unwrap();

    assert!(out.contains("composites created: 1 of 1"), "{out}");
    assert!(out.contains("composites corrected: 1 (1 rewritten, 0 unresolved children)"), "{out}");
    assert!(out.contains("shuffling switched off: 114"), "{out}");
    assert!(out.contains("attempts: 2 recoded, 0 failed"), "{out}");
    assert!(out.contains("skipped: answer pair '4-Cat'"), "{out}");
}

#[test]
fn json_report() {
    let out: serde_json::Value = serde_json::from_str(&relink(&["--json"]).unwrap()).unwrap();

    let outcomes = out["attempts"]["outcomes"].as_array().unwrap();
    assert_eq!(outcomes[0]["status"], "legacy");
    assert_eq!(outcomes[0]["outcome"]["answer"], "1-Owl,2-125,4-Cat");
    assert_eq!(outcomes[1]["payload"]["sub2__order"], "125,124,123");
    assert_eq!(out["correction"]["suppressed_shuffles"], serde_json::json!([114]));
}

#[test]
fn config_policy_applies() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, r#"position_policy = "fail""#).unwrap();
    let config_path = config.path().to_str().unwrap().to_string();

    let out = relink(&["--config", config_path.as_str()]).unwrap();
    assert!(out.contains("attempts: 1 recoded, 1 failed"), "{out}");
}

#[test]
fn missing_bundle_is_error() {
    let cli = Cli::try_parse_from(["cloze-restore", "relink", "/nonexistent/bundle.json"]).unwrap();
    let err = run(cli).unwrap_err();
    assert!(err.to_string().contains("failed to read bundle"));
}

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"{
    "output_dir": "unused",
    "namespace": "Demo.Native",
    "libraries": [
        {
            "name": "Log",
            "header": "log.h",
            "platforms": [{ "platform": "linux", "path": "liblog.so" }]
        }
    ],
    "macro_searches": [{ "prefix": "LOG_" }]
}"#;

const GRAPH: &str = r#"{
    "translation_units": [
        {
            "file_name": "include/log.h",
            "structs": [
                {
                    "name": "LogEntry",
                    "fields": [{ "name": "level", "type": { "kind": "builtin", "primitive": "int" } }]
                }
            ],
            "functions": [
                {
                    "name": "log_write",
                    "params": [
                        {
                            "name": "entry",
                            "type": {
                                "kind": "pointer",
                                "pointee": { "kind": "tag", "decl": { "named": "LogEntry" } }
                            }
                        }
                    ],
                    "ret": { "kind": "builtin", "primitive": "void" }
                }
            ],
            "macros": [{ "name": "LOG_LEVEL_MAX", "expression": "4" }]
        }
    ]
}"#;

fn csbind(dir: &Path, extra: &[&str]) -> Output {
    fs::write(dir.join("csbind.json"), CONFIG).unwrap();
    fs::write(dir.join("graph.json"), GRAPH).unwrap();
    Command::new(env!("CARGO_BIN_EXE_csbind"))
        .arg("--config")
        .arg(dir.join("csbind.json"))
        .arg("--graph")
        .arg(dir.join("graph.json"))
        .arg("--output")
        .arg(dir.join("out"))
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_cli_writes_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let output = csbind(dir.path(), &[]);
    assert!(output.status.success(), "{output:?}");

    let out = dir.path().join("out");
    for name in ["Platform", "LogLinuxNative", "LogLinux", "ILog", "Log", "LogEntry"] {
        assert!(out.join(format!("{name}.cs")).is_file(), "missing {name}.cs");
    }
    let facade = fs::read_to_string(out.join("Log.cs")).unwrap();
    assert!(facade.contains("namespace Demo.Native"));
    assert!(facade.contains("LOG_LEVEL_MAX"));
}

#[test]
fn test_cli_namespace_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = csbind(dir.path(), &["--namespace", "Other"]);
    assert!(output.status.success(), "{output:?}");

    let entry = fs::read_to_string(dir.path().join("out").join("LogEntry.cs")).unwrap();
    assert!(entry.contains("namespace Other"));
}

#[test]
fn test_cli_no_clear_refuses_populated_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("Stale.cs"), "// stale").unwrap();

    let output = csbind(dir.path(), &["--no-clear"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not empty"));
    assert!(out.join("Stale.cs").is_file());
}

#[test]
fn test_cli_reports_missing_graph() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("csbind.json"), CONFIG).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_csbind"))
        .arg("--config")
        .arg(dir.path().join("csbind.json"))
        .arg("--graph")
        .arg(dir.path().join("absent.json"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use appconf::{
    BindingTable, ConfigError, ConfigLoader, ConfigResult, EnvOverlay, FieldKind, OverlayError,
    Validate, load_config,
};
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, EnvOverlay)]
#[serde(default)]
struct MyConfig {
    #[env(var = "APP_HOST")]
    app_host: Option<String>,
    #[env(var = "APP_PORT")]
    app_port: Option<i64>,
    #[env(var = "APP_ONLINE")]
    app_online: Option<bool>,
    #[env(var = "APP_OTHER_PARAM")]
    app_other_param: String,
    banner: String,
}

impl Validate for MyConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.app_host.is_none() {
            return Err(ConfigError::validation(
                "field 'app_host' should be provided in configuration file",
            ));
        }
        if self.app_port.is_none() {
            return Err(ConfigError::validation(
                "field 'app_port' should be provided in configuration file",
            ));
        }
        if self.app_online.is_none() {
            return Err(ConfigError::validation(
                "field 'app_online' should be provided in configuration file",
            ));
        }
        if self.app_other_param.is_empty() {
            return Err(ConfigError::validation(
                "field 'app_other_param' should not be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, EnvOverlay)]
#[serde(default)]
#[env(prefix = "WORKER_")]
struct WorkerConfig {
    #[env]
    threads: usize,
    #[env(var = "QUEUE")]
    queue_name: String,
    #[env]
    verbose: Option<bool>,
}

const SCENARIO_YAML: &str = "\
app_host: file-host
app_port: 80
app_online: false
app_other_param: x
banner: hello
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn load_with(path: &Path, env: HashMap<String, String>) -> ConfigResult<MyConfig> {
    ConfigLoader::new(path).env(env).load()
}

#[test]
fn test_scenario_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", SCENARIO_YAML);

    let config = load_with(
        &path,
        vars(&[
            ("APP_HOST", "localhost"),
            ("APP_OTHER_PARAM", "${APP_HOST}_replica_0"),
        ]),
    )
    .unwrap();

    assert_eq!(
        config,
        MyConfig {
            app_host: Some("localhost".into()),
            app_port: Some(80),
            app_online: Some(false),
            app_other_param: "localhost_replica_0".into(),
            banner: "hello".into(),
        }
    );
    config.validate().unwrap();
}

#[test]
fn test_round_trip_without_env() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", SCENARIO_YAML);

    let loaded = load_with(&path, HashMap::new()).unwrap();
    let direct: MyConfig = serde_yaml::from_str(SCENARIO_YAML).unwrap();
    assert_eq!(loaded, direct);
}

#[test]
fn test_absent_variables_keep_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", "app_port: 81\n");

    let config = load_with(&path, vars(&[("APP_ONLINE", ""), ("UNRELATED", "1")])).unwrap();

    assert_eq!(config.app_port, Some(81));
    assert_eq!(config.app_host, None);
    assert_eq!(config.app_online, None);
    assert!(config.validate().is_err());
}

#[test]
fn test_type_coercion() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", SCENARIO_YAML);

    let config = load_with(&path, vars(&[("APP_PORT", "8080"), ("APP_ONLINE", "true")])).unwrap();
    assert_eq!(config.app_port, Some(8080));
    assert_eq!(config.app_online, Some(true));

    let err = load_with(&path, vars(&[("APP_PORT", "http")])).unwrap_err();
    match err {
        ConfigError::Overlay(OverlayError::TypeMismatch {
            field,
            var,
            expected,
            value,
        }) => {
            assert_eq!(field, "app_port");
            assert_eq!(var, "APP_PORT");
            assert_eq!(expected, FieldKind::Integer);
            assert_eq!(value, "http");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_json_file_via_fallback() {
    let dir = TempDir::new().unwrap();
    // The raw DEL character makes this invalid YAML but valid JSON.
    let path = write(
        &dir,
        "config.yaml",
        "{\"app_host\": \"json\u{7f}host\", \"app_port\": 9000, \"app_online\": true, \"app_other_param\": \"y\"}",
    );

    let config = load_with(&path, HashMap::new()).unwrap();
    assert_eq!(config.app_host.as_deref(), Some("json\u{7f}host"));
    assert_eq!(config.app_port, Some(9000));
    assert_eq!(config.app_online, Some(true));
}

#[test]
fn test_plain_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "config.json",
        r#"{"app_host": "h", "app_port": 1, "app_online": false, "app_other_param": "p"}"#,
    );

    let config = load_with(&path, vars(&[("APP_ONLINE", "1")])).unwrap();
    assert_eq!(config.app_host.as_deref(), Some("h"));
    assert_eq!(config.app_online, Some(true));
}

#[test]
fn test_unparseable_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", "app_port: [1, 2\n");

    let err = load_with(&path, HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.ends_with("config.yaml")));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut config = MyConfig::default();

    let err = load_config(dir.path().join("nope.yaml"), &mut config).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert_eq!(config, MyConfig::default());
}

#[test]
fn test_load_config_reads_process_env() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "worker.yaml", "threads: 2\nqueue_name: jobs\n");

    // SAFETY: these variable names are only used by this test
    unsafe {
        std::env::set_var("WORKER_THREADS", "16");
        std::env::set_var("WORKER_VERBOSE", "F");
    }
    let mut config = WorkerConfig::default();
    let result = load_config(&path, &mut config);
    unsafe {
        std::env::remove_var("WORKER_THREADS");
        std::env::remove_var("WORKER_VERBOSE");
    }

    result.unwrap();
    assert_eq!(config.threads, 16);
    assert_eq!(config.queue_name, "jobs");
    assert_eq!(config.verbose, Some(false));
}

#[test]
fn test_derived_binding_table() {
    let table = WorkerConfig::env_bindings();
    let summary: Vec<_> = table
        .iter()
        .map(|b| (b.field(), b.var(), b.kind(), b.is_optional()))
        .collect();

    assert_eq!(
        summary,
        [
            ("threads", "WORKER_THREADS", FieldKind::Integer, false),
            ("queue_name", "WORKER_QUEUE", FieldKind::String, false),
            ("verbose", "WORKER_VERBOSE", FieldKind::Boolean, true),
        ]
    );
    assert!(MyConfig::env_bindings().get("banner").is_none());
}

#[test]
fn test_cyclic_interpolation_is_bounded() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", SCENARIO_YAML);

    let err = load_with(
        &path,
        vars(&[("APP_HOST", "${VAR_A}"), ("VAR_A", "${VAR_B}"), ("VAR_B", "${VAR_A}")]),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Overlay(OverlayError::InterpolationLimit { ref var, .. }) if var == "APP_HOST"
    ));
}

struct Broken {
    value: String,
}

impl EnvOverlay for Broken {
    fn env_bindings() -> BindingTable<Self> {
        BindingTable::<Self>::new().bind("value", "", |b| &mut b.value)
    }
}

#[test]
#[should_panic(expected = "empty environment variable name")]
fn test_invalid_binding_is_fatal() {
    let mut broken = Broken {
        value: String::new(),
    };
    let _ = broken.apply_env(&HashMap::<String, String>::new());
}

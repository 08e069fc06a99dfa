use std::io::Write;
use std::path::PathBuf;

use envcfg::{ConfigError, ConfigTree, EnvConfig, Layer, Properties, SharedEnvConfig};
use tempfile::NamedTempFile;

const CONFIG_A: &str = r#"
[envConfig]
env = "testEnv"

[envConfig.default]
a = 1
b = ["foo", "bar", "baz"]
c = 5

[envConfig.testEnv]
a = 2
"#;

const CONFIG_B: &str = r#"
[envConfig]
env = "doesNotExist"

[envConfig.default]
a = 1
b = "True"

[envConfig.testEnv]
a = 2
b = false
"#;

fn init(text: &str) -> EnvConfig {
    EnvConfig::init(ConfigTree::parse(text).unwrap()).unwrap()
}

#[test]
fn test_config_a_environment_and_fallback() {
    let config = init(CONFIG_A);

    assert_eq!(config.environment(), "testEnv");
    assert_eq!(config.get_int("a").unwrap(), 2);
    assert_eq!(config.get_list("b").unwrap(), vec!["foo", "bar", "baz"]);
    assert_eq!(config.get_int("c").unwrap(), 5);
    assert_eq!(config.get_string("a").unwrap(), "2");
    assert!(!config.get_bool("a").unwrap());
}

#[test]
fn test_config_a_shape_mismatches() {
    let config = init(CONFIG_A);

    assert!(matches!(config.get_list("a"), Err(ConfigError::MalformedValue { .. })));
    assert!(matches!(config.get_string("b"), Err(ConfigError::MalformedValue { .. })));
    assert!(matches!(config.get_int("b"), Err(ConfigError::MalformedValue { .. })));
    assert!(matches!(config.get_bool("b"), Err(ConfigError::MalformedValue { .. })));
}

#[test]
fn test_config_b_missing_environment_section() {
    let config = init(CONFIG_B);

    assert_eq!(config.environment(), "doesNotExist");
    assert_eq!(config.get_int("a").unwrap(), 1);
    assert!(config.get_bool("b").unwrap());
    assert_eq!(config.get_string("b").unwrap(), "True");
    assert!(matches!(config.get_int("b"), Err(ConfigError::MalformedValue { .. })));
    assert_eq!(config.get_int_or_none("b").unwrap(), None);
}

#[test]
fn test_config_c_empty_tree() {
    let config = EnvConfig::init(ConfigTree::default()).unwrap();

    assert_eq!(config.environment(), "default");
    assert_eq!(config.external_config_file(), None);
    assert_eq!(config.get_int_or_default("a", 3).unwrap(), 3);
    assert!(matches!(config.get_bool("a"), Err(ConfigError::KeyNotFound(_))));
    assert!(matches!(config.get_int("a"), Err(ConfigError::KeyNotFound(_))));
    assert!(matches!(config.get_list("a"), Err(ConfigError::KeyNotFound(_))));
    assert!(matches!(config.get_string("a"), Err(ConfigError::KeyNotFound(_))));
    assert_eq!(config.get_string_or_none("a").unwrap(), None);
    assert_eq!(config.get_bool_or_none("a").unwrap(), None);
    assert_eq!(config.get_list_or_none("a").unwrap(), None);
    assert!(config.get_list_or_empty("a").unwrap().is_empty());
}

#[test]
fn test_default_values() {
    assert!(init(CONFIG_B).get_bool_or_default("c", true).unwrap());
    assert_eq!(init(CONFIG_A).get_string_or_default("a", "3").unwrap(), "2");
    assert!(init(CONFIG_A)
        .get_list_or_default("f", Vec::new())
        .unwrap()
        .is_empty());
}

#[test]
fn test_external_override_wins() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "x = \"from-file\"").unwrap();
    writeln!(file, "[db]").unwrap();
    writeln!(file, "password = \"hunter2\"").unwrap();

    let text = format!(
        r#"
        [envConfig]
        env = "prod"

        [envConfig.default]
        x = "from-default"
        y = "from-default"

        [envConfig.prod]
        externalConfigFile = {:?}
        x = "from-env"
        "#,
        file.path().display().to_string()
    );
    let config = init(&text);

    assert_eq!(config.external_config_file(), Some(file.path()));
    assert_eq!(config.get_string("x").unwrap(), "from-file");
    assert_eq!(config.get_string("db.password").unwrap(), "hunter2");
    assert_eq!(config.get_string("y").unwrap(), "from-default");
    assert_eq!(config.resolve_with_layer("y").unwrap().1, Layer::Default);

    // Override values are not part of the dump.
    let dump = config.dump();
    assert_eq!(dump.entries["x"], "from-env");
    assert!(!dump.entries.contains_key("db.password"));
}

#[test]
fn test_missing_external_file_fails_init() {
    let tree = ConfigTree::parse(
        r#"
        [envConfig.default]
        externalConfigFile = "/nonexistent/override.toml"
        "#,
    )
    .unwrap();

    let err = EnvConfig::init(tree).unwrap_err();
    assert!(err.is_external_load_failure());
    assert!(matches!(
        err,
        ConfigError::FileNotFound(ref p) if p == &PathBuf::from("/nonexistent/override.toml")
    ));
}

#[test]
fn test_external_file_key_is_not_read_from_override() {
    // The override file itself cannot redirect to another override, nor
    // change the environment.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "env = \"other\"").unwrap();
    writeln!(file, "[envConfig]").unwrap();
    writeln!(file, "env = \"other\"").unwrap();

    let text = format!(
        "[envConfig.default]\nexternalConfigFile = {:?}",
        file.path().display().to_string()
    );
    let config = init(&text);
    assert_eq!(config.environment(), "default");
}

#[test]
fn test_dump_merges_layers() {
    let dump = init(CONFIG_A).dump_config();

    assert_eq!(dump.environment, "testEnv");
    assert_eq!(dump.external_file, None);
    assert_eq!(dump.entries.len(), 3);
    assert_eq!(dump.entries["a"], "2");
    assert_eq!(dump.entries["b"], "[foo, bar, baz]");
    assert_eq!(dump.entries["c"], "5");
}

#[test]
fn test_shared_config_lifecycle() {
    let shared = SharedEnvConfig::new();
    assert!(matches!(shared.get_int("a"), Err(ConfigError::NotInitialized)));
    assert!(matches!(shared.get_int_or_default("a", 1), Err(ConfigError::NotInitialized)));

    shared
        .init_config(ConfigTree::parse(CONFIG_A).unwrap(), true)
        .unwrap();
    assert_eq!(shared.get_int("a").unwrap(), 2);

    shared
        .init_config(ConfigTree::parse(CONFIG_B).unwrap(), false)
        .unwrap();
    assert_eq!(shared.get_int("a").unwrap(), 1);
    assert_eq!(shared.environment().unwrap(), "doesNotExist");
}

#[test]
fn test_fallback_and_precedence_laws() {
    let environments = ["default", "staging", "prod", "missing"];
    for env in environments {
        let text = format!(
            r#"
            [envConfig]
            env = "{env}"
            [envConfig.default]
            only_default = "d"
            shared = "d"
            [envConfig.staging]
            shared = "staging"
            [envConfig.prod]
            shared = "prod"
            "#
        );
        let config = init(&text);

        assert_eq!(config.get_string("only_default").unwrap(), "d", "env {env}");

        let expected = match env {
            "staging" | "prod" => env,
            _ => "d",
        };
        assert_eq!(config.get_string("shared").unwrap(), expected, "env {env}");
    }
}

#[test]
fn test_float_values_are_not_integers() {
    let config = init("[envConfig.default]\nratio = 1.0");

    assert_eq!(config.get_string("ratio").unwrap(), "1.0");
    assert!(matches!(config.get_int("ratio"), Err(ConfigError::MalformedValue { .. })));
    assert_eq!(config.get_int_or_none("ratio").unwrap(), None);
}

#[test]
fn test_external_file_configured_under_root() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "x = \"from-file\"").unwrap();

    let text = format!(
        r#"
        [envConfig]
        env = "prod"
        externalConfigFile = {:?}

        [envConfig.prod]
        x = "from-env"
        "#,
        file.path().display().to_string()
    );
    let config = init(&text);

    assert_eq!(config.external_config_file(), Some(file.path()));
    assert_eq!(config.get_string("x").unwrap(), "from-file");
}

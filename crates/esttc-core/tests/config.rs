use esttc_core::config::{ConfigError, DestinationSettings, TransmitterConfig};
use esttc_core::timing::BaudRate;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = TransmitterConfig {
        destination: DestinationSettings {
            host: "localhost".to_string(),
            port: 6000,
        },
        baud_rate: BaudRate::B2400,
        interval_multiple: 4,
        duration_secs: 120,
    };
    config.save(&path).unwrap();

    let loaded = TransmitterConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.default_interval_ms(), Ok(1142 * 4));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = TransmitterConfig::load_or_default(dir.path().join("absent.json")).unwrap();
    assert_eq!(config, TransmitterConfig::default());
}

#[test]
fn test_load_rejects_bad_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        TransmitterConfig::load(&path),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_load_rejects_out_of_range_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "duration_secs": 900 }"#).unwrap();

    assert!(matches!(
        TransmitterConfig::load(&path),
        Err(ConfigError::InvalidDefault(_))
    ));
}

#[test]
fn test_unresolvable_destination() {
    let config = TransmitterConfig {
        destination: DestinationSettings {
            host: String::new(),
            port: 1,
        },
        ..Default::default()
    };
    assert!(matches!(
        config.destination_addr(),
        Err(ConfigError::InvalidDestination(_))
    ));
}

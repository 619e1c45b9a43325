use pretty_assertions::assert_eq;
use std::collections::HashMap;

use super::fixtures::{minimal_config, two_hosts_config};
use crate::config::{ConfigError, SanityConfig, VolumeBind, parse_driver_opt};
use crate::container::touch_cases;

#[test]
fn test_default_config() {
    let config = SanityConfig::default();

    assert_eq!(config.endpoints, vec![
        "unix:///var/run/docker.sock",
        "unix:///var/run/docker.sock"
    ]);
    assert_eq!(config.volume_name, "TestVol");
    assert_eq!(config.driver, "vmdk");
    assert_eq!(config.image, "busybox");
    assert!(config.remove_containers);
    assert_eq!(config.api_version, None);
    assert_eq!(config.mount_point("TestVol"), "/mnt/vol/TestVol");
    config.validate().unwrap();
}

#[test]
fn test_config_from_file() {
    let config = SanityConfig::from_file(two_hosts_config()).unwrap();

    assert_eq!(config.endpoints, vec![
        "unix:///var/run/docker.sock",
        "tcp://esx-vm2.local:2375"
    ]);
    assert_eq!(config.api_version.as_deref(), Some("v1.22"));
    assert_eq!(config.volume_name, "SanityVol");
    assert_eq!(
        config.driver_opts,
        HashMap::from([
            ("size".to_string(), "2gb".to_string()),
            ("policy".to_string(), "good".to_string()),
            ("diskformat".to_string(), "thin".to_string()),
        ])
    );
    assert!(!config.remove_containers);
    // Unset keys keep their defaults
    assert_eq!(config.image, "busybox");
    assert_eq!(config.touch_file, "file_to_touch");
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = SanityConfig::from_file(minimal_config()).unwrap();

    assert_eq!(config, SanityConfig {
        volume_name: "MinimalVol".to_string(),
        ..Default::default()
    });
}

#[test]
fn test_missing_config_file() {
    let err = SanityConfig::from_file("/nonexistent/sanity.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::FileError(_)));
}

#[test]
fn test_malformed_yaml() {
    let err = SanityConfig::from_yaml("endpoints: {not: [a list").unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));

    let err = SanityConfig::from_yaml("remove_containers: maybe").unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases = [
        SanityConfig {
            endpoints: Vec::new(),
            ..Default::default()
        },
        SanityConfig {
            volume_name: String::new(),
            ..Default::default()
        },
        SanityConfig {
            volume_name: "a/b".to_string(),
            ..Default::default()
        },
        SanityConfig {
            mount_location: "mnt/vol".to_string(),
            ..Default::default()
        },
        SanityConfig {
            image: String::new(),
            ..Default::default()
        },
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(ConfigError::Invalid(_))),
            "{config:?}"
        );
    }
}

#[test]
fn test_parse_driver_opt() {
    assert_eq!(
        parse_driver_opt("size=1gb").unwrap(),
        ("size".to_string(), "1gb".to_string())
    );
    assert_eq!(
        parse_driver_opt("vsan-policy-name=a=b").unwrap(),
        ("vsan-policy-name".to_string(), "a=b".to_string())
    );
    assert!(parse_driver_opt("size").is_err());
    assert!(parse_driver_opt("=1gb").is_err());
}

#[test]
fn test_volume_bind() {
    let bind = VolumeBind::new("TestVol", "/mnt/vol/TestVol");
    assert_eq!(bind.to_string(), "TestVol:/mnt/vol/TestVol");
}

#[test]
fn test_touch_cases_order() {
    let cases = touch_cases("busybox", "/mnt/vol/TestVol", "file_to_touch");

    let cmds = cases.iter().map(|c| c.cmd.join(" ")).collect::<Vec<_>>();
    assert_eq!(cmds, vec![
        "touch /mnt/vol/TestVol/file_to_touch",
        "stat /mnt/vol/TestVol/file_to_touch"
    ]);
    assert!(cases.iter().all(|c| c.expected == 0 && c.image == "busybox"));
}

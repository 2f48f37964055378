use dnscache_domain::config::cache::CacheConfig;
use dnscache_domain::ConfigError;

#[test]
fn test_cache_config_default_values() {
    let config = CacheConfig::default();

    assert_eq!(config.zones, vec![".".to_string()]);
    assert_eq!(config.positive_capacity, 10_000);
    assert_eq!(config.negative_capacity, 10_000);
    assert_eq!(config.positive_min_ttl, 0);
    assert_eq!(config.positive_max_ttl, 86_400);
    assert_eq!(config.negative_min_ttl, 30);
    assert_eq!(config.negative_max_ttl, 3_600);
    assert_eq!(config.prefetch_amount, 0);
    assert!(!config.prefetch_enabled());
    assert!((config.prefetch_threshold - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.prefetch_concurrency, 4);
    assert_eq!(config.prefetch_queue_size, 1_024);
    assert_eq!(config.store_shards, 16);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_config_partial_toml_fills_defaults() {
    let toml_str = r#"
        zones = ["example.org.", "miek.nl."]
        positive_capacity = 500
        prefetch_amount = 2
    "#;

    let config: CacheConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.zones.len(), 2);
    assert_eq!(config.positive_capacity, 500);
    assert_eq!(config.negative_capacity, 10_000);
    assert!(config.prefetch_enabled());
    assert_eq!(config.negative_max_ttl, 3_600);
}

#[test]
fn test_zone_matching_is_case_insensitive() {
    let config = CacheConfig {
        zones: vec!["miek.nl.".to_string()],
        ..Default::default()
    };

    assert!(config.matches_zone("miek.nl."));
    assert!(config.matches_zone("mIEK.nL."));
    assert!(config.matches_zone("www.Miek.NL"));
    assert!(!config.matches_zone("example.org."));
    assert!(!config.matches_zone("nl."));
}

#[test]
fn test_validate_rejects_zero_capacity() {
    let config = CacheConfig {
        negative_capacity: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_validate_rejects_inverted_ttl_bounds() {
    let positive = CacheConfig {
        positive_min_ttl: 600,
        positive_max_ttl: 60,
        ..Default::default()
    };
    assert!(positive.validate().is_err());

    let negative = CacheConfig {
        negative_min_ttl: 7200,
        ..Default::default()
    };
    assert!(negative.validate().is_err());
}

#[test]
fn test_validate_rejects_threshold_out_of_range() {
    for threshold in [0.0, -0.5, 1.5, f64::NAN] {
        let config = CacheConfig {
            prefetch_threshold: threshold,
            ..Default::default()
        };
        assert!(
            config.validate().is_err(),
            "threshold {} should be rejected",
            threshold
        );
    }

    let upper_bound = CacheConfig {
        prefetch_threshold: 1.0,
        ..Default::default()
    };
    assert!(upper_bound.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_zone_list() {
    let config = CacheConfig {
        zones: vec![],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

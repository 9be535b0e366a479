use super::*;
use crate::manifest::assets::AssetCategory;

#[test]
fn empty_json_yields_defaults() {
    let config = ReaderConfig::from_json("{}").unwrap();
    assert_eq!(config, ReaderConfig::default());
    assert_eq!(config.max_zoom_scale, 4.0);
    assert_eq!(config.navigation_cooldown_ms, 500);
    assert_eq!(config.clear_active_after_ms, 600);
    assert_eq!(config.assets.base_path, "/assets");
}

#[test]
fn nested_sections_parse() {
    let config = ReaderConfig::from_json(
        r#"{
            "maxZoomScale": 3,
            "navigationCooldownMs": 250,
            "featureFlags": { "defaultZoomScale": 2, "subtitleDefaultOn": false },
            "assets": { "basePath": "/static", "includeSlugFolder": true,
                        "categoryOverrides": { "audio": "sound" } }
        }"#,
    )
    .unwrap();
    assert_eq!(config.max_zoom_scale, 3.0);
    assert_eq!(config.navigation_cooldown_ms, 250);
    assert_eq!(config.feature_flags.default_zoom_scale, 2.0);
    assert!(!config.feature_flags.subtitle_default_on);
    assert!(config.assets.include_slug_folder);
    assert_eq!(
        config.assets.category_overrides.get(&AssetCategory::Audio).map(String::as_str),
        Some("sound")
    );
}

#[test]
fn validation_rejects_bad_scales() {
    let err = ReaderConfig::from_json(r#"{"maxZoomScale": 0.5}"#).unwrap_err();
    assert!(matches!(err, PagespotError::Validation(_)));

    let err = ReaderConfig::from_json(r#"{"featureFlags": {"defaultZoomScale": 0}}"#).unwrap_err();
    assert!(matches!(err, PagespotError::Validation(_)));

    let err = ReaderConfig::from_json(r#"{"assets": {"cdnBaseUrl": "  "}}"#).unwrap_err();
    assert!(err.to_string().contains("cdnBaseUrl"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ReaderConfig::from_json("{").unwrap_err();
    assert!(matches!(err, PagespotError::Serde(_)));
}

#[test]
fn missing_file_surfaces_path() {
    let err = ReaderConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
}

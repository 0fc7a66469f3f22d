use monthlycli::{
    config::parse_user_list,
    cover::{CoverConfig, Slot},
};

#[test]
fn test_parse_user_list() {
    assert_eq!(parse_user_list("alice,bob"), vec!["alice", "bob"]);
    assert_eq!(parse_user_list(" alice , bob ,"), vec!["alice", "bob"]);
}

#[test]
fn test_parse_user_list_drops_duplicates_in_order() {
    assert_eq!(
        parse_user_list("carol,alice,carol,bob,alice"),
        vec!["carol", "alice", "bob"]
    );
}

#[test]
fn test_parse_user_list_empty() {
    assert!(parse_user_list("").is_empty());
    assert!(parse_user_list(" , ,").is_empty());
}

#[test]
fn test_cover_config_defaults() {
    let config = CoverConfig::default();

    assert_eq!(config.canvas_size, 500);
    assert_eq!(config.sample_size, 150);
    assert_eq!(config.clusters, 5);
    assert_eq!(config.kmeans_restarts, 20);
    assert_eq!(config.jpeg_quality, 75);
    assert_eq!(config.large_label.origin, (10, 10));
    assert_eq!(config.small_label.origin, (10, 112));
}

#[test]
fn test_cover_config_slots() {
    let config = CoverConfig::default();

    assert_eq!(
        config.slot(0),
        Some(Slot {
            size: 230,
            position: (25, 216)
        })
    );
    assert_eq!(
        config.slot(2),
        Some(Slot {
            size: 150,
            position: (325, 256)
        })
    );
    assert_eq!(config.slot(3), None);

    assert_eq!(config.slots_used(0), 0);
    assert_eq!(config.slots_used(1), 1);
    assert_eq!(config.slots_used(7), 3);
}

#[test]
fn test_cover_config_from_json() {
    let mut value = serde_json::to_value(CoverConfig::default()).unwrap();
    value["slot_sizes"] = serde_json::json!([300]);

    let config: CoverConfig = serde_json::from_value(value).unwrap();
    assert_eq!(config.slots_used(3), 1);
    assert_eq!(config.slot(0).map(|s| s.size), Some(300));
}

//! End-to-end cache manager behavior over the scripted stub API.

use std::sync::Arc;

use cicat_cli::cache::ComponentCacheManager;
use cicat_cli::config::Settings;
use cicat_cli::models::SourceConfig;
use cicat_cli::test_utils::StubApi;

const INSTANCE: &str = "gitlab.com";

fn settings_with(sources: Vec<SourceConfig>) -> Settings {
    Settings {
        sources,
        persistence: false,
        ..Settings::default()
    }
}

/// A project source plus a group source, refreshed together.
#[tokio::test]
async fn full_refresh_across_mixed_sources() {
    let api = StubApi::new()
        .with_project(INSTANCE, "tools/deploy", "main")
        .with_template(
            INSTANCE,
            "tools/deploy",
            "main",
            "deploy.yml",
            "spec:\n  description: Deploys a service\n  inputs:\n    env:\n      default: prod\n      type: string\n",
        )
        .with_tags(INSTANCE, "tools/deploy", &["v1.0.0"])
        .with_group(INSTANCE, "platform", &[("platform/runners", "runners")])
        .with_project(INSTANCE, "platform/runners", "master")
        .with_template(
            INSTANCE,
            "platform/runners",
            "master",
            "runner.yml",
            "spec:\n  inputs:\n    size:\n      type: number\n      default: 2\n",
        );

    let sources = vec![
        SourceConfig::project("deploy", "tools/deploy"),
        SourceConfig::group("Platform", "platform"),
    ];
    let manager = Arc::new(ComponentCacheManager::new(
        Arc::new(api),
        settings_with(sources),
        None,
    ));

    manager.refresh_components().await;

    let components = manager.components();
    assert_eq!(components.len(), 2);

    // Source-configuration order governs cache layout.
    assert_eq!(components[0].name, "deploy");
    assert_eq!(components[0].source, "deploy");
    assert_eq!(components[1].name, "runner");
    assert_eq!(components[1].source, "Platform/runners");
    assert_eq!(components[1].version, "master");

    // The second refresh pass filled version lists for every component.
    for component in &components {
        let versions = component.available_versions.as_ref().expect("versions filled");
        assert_eq!(versions[0], "main");
    }

    assert!(manager.source_errors().is_empty());
}

/// One member project's file-content fetches always fail; the group still
/// contributes every other project's components and the refresh never
/// raises.
#[tokio::test]
async fn group_partial_failure_keeps_other_projects() {
    let api = StubApi::new()
        .with_group(
            INSTANCE,
            "grp",
            &[("grp/one", "one"), ("grp/two", "two"), ("grp/three", "three")],
        )
        .with_project(INSTANCE, "grp/one", "main")
        .with_template(INSTANCE, "grp/one", "main", "alpha.yml", "spec:\n  description: Alpha\n")
        .with_project(INSTANCE, "grp/two", "main")
        .with_template(INSTANCE, "grp/two", "main", "beta.yml", "unused")
        .failing_file(INSTANCE, "grp/two", "main", "templates/beta.yml")
        .with_project(INSTANCE, "grp/three", "main")
        .with_template(INSTANCE, "grp/three", "main", "gamma.yml", "spec:\n  description: Gamma\n");

    let manager = Arc::new(ComponentCacheManager::new(
        Arc::new(api),
        settings_with(vec![SourceConfig::group("Group", "grp")]),
        None,
    ));

    manager.refresh_components().await;

    let components = manager.components();
    let descriptions: Vec<&str> = components.iter().map(|c| c.description.as_str()).collect();

    // Projects one and three parsed normally.
    assert!(descriptions.contains(&"Alpha"));
    assert!(descriptions.contains(&"Gamma"));
    // Project two degraded to the placeholder description instead of
    // aborting the group.
    assert!(descriptions.contains(&"beta component"));
    assert!(manager.source_errors().is_empty());
}

/// A snapshot written by one process is served by the next without any
/// network traffic, version cache included.
#[tokio::test]
async fn snapshot_restore_serves_versions_without_refetching() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let api = StubApi::new()
        .with_project(INSTANCE, "tools/deploy", "main")
        .with_template(INSTANCE, "tools/deploy", "main", "deploy.yml", "spec:\n  description: D\n")
        .with_tags(INSTANCE, "tools/deploy", &["v1.0.0", "v2.0.0"]);

    let settings = Settings {
        sources: vec![SourceConfig::project("deploy", "tools/deploy")],
        ..Settings::default()
    };

    let manager = Arc::new(ComponentCacheManager::new(
        Arc::new(api),
        settings.clone(),
        Some(path.clone()),
    ));
    manager.refresh_components().await;
    drop(manager);

    // Cold start: the stub knows nothing, so any fetch would fail loudly.
    let cold_api = Arc::new(StubApi::new());
    let restored = Arc::new(ComponentCacheManager::new(
        Arc::clone(&cold_api),
        settings,
        Some(path),
    ));

    let components = restored.components();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].name, "deploy");

    // Version resolution is answered from the restored version cache.
    let versions = restored.fetch_component_versions(&components[0]).await;
    assert_eq!(versions[0], "main");
    assert!(versions.contains(&"v2.0.0".to_string()));
    assert_eq!(cold_api.tag_calls(), 0);
    assert_eq!(cold_api.project_calls(), 0);
}

/// The full out-of-band flow: resolve a pinned version, then observe both
/// entries living side by side in the cache.
#[tokio::test]
async fn pinned_version_flow() {
    let api = StubApi::new()
        .with_project(INSTANCE, "tools/deploy", "main")
        .with_template(INSTANCE, "tools/deploy", "main", "deploy.yml", "spec:\n  description: New\n")
        .with_template(INSTANCE, "tools/deploy", "v1.0.0", "deploy.yml", "spec:\n  description: Old\n")
        .with_tags(INSTANCE, "tools/deploy", &["v1.0.0"]);

    let manager = Arc::new(ComponentCacheManager::new(
        Arc::new(api),
        settings_with(vec![SourceConfig::project("deploy", "tools/deploy")]),
        None,
    ));
    manager.refresh_components().await;

    let pinned = manager
        .fetch_specific_version("deploy", "tools/deploy", INSTANCE, "v1.0.0")
        .await
        .unwrap()
        .expect("v1.0.0 exists");
    assert_eq!(pinned.description, "Old");
    // Pinned fetches inherit the cached sibling's display label.
    assert_eq!(pinned.source, "deploy");

    let components = manager.components();
    assert_eq!(components.len(), 2);
    let versions: Vec<&str> = components.iter().map(|c| c.version.as_str()).collect();
    assert!(versions.contains(&"main"));
    assert!(versions.contains(&"v1.0.0"));
}

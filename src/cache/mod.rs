//! Component cache management.
//!
//! This module provides the top-level orchestrator of the catalog:
//! [`ComponentCacheManager`] holds the authoritative in-memory component
//! list, drives full refreshes across all configured sources, merges and
//! dedupes results, persists snapshots, and exposes freshness-gated read
//! access plus imperative mutation APIs.
//!
//! # State machine
//!
//! A cache instance moves `Empty -> Populated <-> Refreshing`. A refresh may
//! run from either non-refreshing state; concurrent refresh requests while
//! one is already in flight are no-ops - callers are not queued, they
//! observe the running refresh and return immediately. The serialization
//! primitive is a real mutex ([`tokio::sync::Mutex`] acquired with
//! `try_lock`) guarding the whole refresh critical section including the
//! persistence write, so the at-most-one-refresh guarantee holds on a
//! multi-threaded runtime.
//!
//! # Read path
//!
//! [`ComponentCacheManager::components`] never blocks on network activity:
//! it returns the current snapshot immediately and, when the snapshot is
//! older than the configured freshness window, spawns a background full
//! refresh (fire-and-forget, errors logged). A fresh snapshot whose version
//! lists have aged past the longer secondary window triggers a version-only
//! refresh instead.
//!
//! # Failure model
//!
//! Refresh failures are caught at the narrowest scope: per source, per
//! project, per file, per version fetch. A failed source contributes zero
//! components and one entry in the per-source error map
//! ([`ComponentCacheManager::source_errors`]); it never aborts sibling
//! sources, and `refresh_components` itself never returns an error.

pub mod snapshot;

pub use snapshot::CacheSnapshot;

use chrono::{DateTime, Utc};
use futures::future;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::CatalogFetcher;
use crate::config::Settings;
use crate::constants::INJECTED_BRANCHES;
use crate::core::Result;
use crate::models::{Component, Parameter};
use crate::remote::GitlabApi;
use crate::version::{VersionCache, rank_versions};

/// Diagnostic snapshot of cache internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    /// Number of cached components.
    pub component_count: usize,
    /// Timestamp of the last successful refresh, if any.
    pub last_refresh: Option<DateTime<Utc>>,
    /// Whether snapshots are written to disk.
    pub persistence_enabled: bool,
}

/// Mutable cache state, guarded by one lock.
///
/// Mutated only by the manager's own methods; the lock is never held across
/// an await point.
#[derive(Debug, Default)]
struct CacheState {
    components: Vec<Component>,
    source_errors: HashMap<String, String>,
    /// Epoch ms of the last full refresh; zero forces staleness.
    last_refresh_ms: i64,
    /// Epoch ms of the last version pass (full or version-only).
    last_version_refresh_ms: i64,
}

/// Top-level orchestrator owning the in-memory catalog and the per-project
/// version cache.
///
/// Constructed once per process and shared via [`Arc`]; the read path
/// spawns background refresh tasks that need a handle back to the manager.
#[derive(Debug)]
pub struct ComponentCacheManager<A> {
    api: Arc<A>,
    settings: Settings,
    fetcher: CatalogFetcher<A>,
    state: RwLock<CacheState>,
    version_cache: VersionCache,
    /// Single-flight guard for the whole refresh critical section,
    /// persistence included.
    refresh_lock: Mutex<()>,
    snapshot_path: Option<PathBuf>,
}

impl<A: GitlabApi + 'static> ComponentCacheManager<A> {
    /// Creates a manager, loading the persisted snapshot if enabled.
    ///
    /// A missing or invalid snapshot starts the cache empty; the first read
    /// will trigger a background refresh.
    #[must_use]
    pub fn new(api: Arc<A>, settings: Settings, snapshot_path: Option<PathBuf>) -> Self {
        let version_cache = VersionCache::new();
        let mut state = CacheState::default();

        if settings.persistence
            && let Some(path) = &snapshot_path
            && let Some(snapshot) = CacheSnapshot::load(path)
        {
            state.last_refresh_ms = snapshot.last_refresh_ms;
            state.last_version_refresh_ms = snapshot.last_refresh_ms;
            state.components = snapshot.components;
            version_cache.restore(snapshot.project_versions);
        }

        Self {
            fetcher: CatalogFetcher::new(Arc::clone(&api)),
            api,
            settings,
            state: RwLock::new(state),
            version_cache,
            refresh_lock: Mutex::new(()),
            snapshot_path,
        }
    }

    /// Returns the current component snapshot immediately.
    ///
    /// Side effect: a snapshot older than the configured freshness window
    /// triggers a background full refresh; a fresh snapshot with stale
    /// version lists triggers a background version-only refresh. Neither
    /// blocks the caller; background errors are logged, not thrown.
    #[must_use]
    pub fn components(self: &Arc<Self>) -> Vec<Component> {
        let now = Utc::now().timestamp_millis();
        let (components, last_refresh_ms, last_version_ms) = {
            let state = self.state.read().expect("cache state lock poisoned");
            (state.components.clone(), state.last_refresh_ms, state.last_version_refresh_ms)
        };

        let cache_window_ms = self.settings.cache_window().as_millis() as i64;
        let version_window_ms = self.settings.version_cache_window().as_millis() as i64;

        if now - last_refresh_ms > cache_window_ms {
            debug!("catalog stale, scheduling background refresh");
            let this = Arc::clone(self);
            tokio::spawn(async move {
                this.refresh_components().await;
            });
        } else if now - last_version_ms > version_window_ms {
            debug!("version lists stale, scheduling background version refresh");
            let this = Arc::clone(self);
            tokio::spawn(async move {
                this.refresh_versions().await;
            });
        }

        components
    }

    /// Runs a full refresh across all configured sources.
    ///
    /// No-op when a refresh is already in flight. Per-source failures are
    /// recorded in the error map and contribute zero components; this method
    /// never fails. The in-memory list is replaced wholesale in source
    /// configuration order, persisted, and then a second pass fills in
    /// missing version lists (sequential, failure-tolerant) before
    /// persisting again.
    pub async fn refresh_components(&self) {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            debug!("refresh already in flight, skipping");
            return;
        };

        info!(sources = self.settings.sources.len(), "refreshing component catalog");
        self.version_cache.clear();

        // All sources are fetched concurrently; results are collected back
        // in configuration order, which governs cache layout only.
        let fetches = self.settings.sources.iter().map(|source| async move {
            (source.name.clone(), self.fetcher.fetch_source(source).await)
        });
        let results = future::join_all(fetches).await;

        let mut components: Vec<Component> = Vec::new();
        let mut source_errors: HashMap<String, String> = HashMap::new();

        for (source_name, result) in results {
            match result {
                Ok(catalog) => {
                    for (project, message) in &catalog.project_failures {
                        warn!(source = %source_name, %project, %message, "project skipped");
                    }
                    if let Some(warning) = catalog.warning {
                        warn!(source = %source_name, %warning, "source produced no components");
                        source_errors.insert(source_name, warning);
                    }
                    components.extend(catalog.components);
                }
                Err(e) => {
                    warn!(source = %source_name, error = %e, "source failed");
                    source_errors.insert(source_name, e.to_string());
                }
            }
        }

        if self.settings.sources.is_empty() {
            // An empty catalog is useless to every consumer; ship the two
            // built-in local placeholders instead.
            components = builtin_components();
        }

        let now = Utc::now().timestamp_millis();
        {
            let mut state = self.state.write().expect("cache state lock poisoned");
            state.components = components;
            state.source_errors = source_errors;
            state.last_refresh_ms = now;
        }
        self.persist();

        self.fill_missing_versions().await;
        {
            let mut state = self.state.write().expect("cache state lock poisoned");
            state.last_version_refresh_ms = Utc::now().timestamp_millis();
        }
        self.persist();

        info!(components = self.cache_info().component_count, "catalog refresh complete");
    }

    /// Resets the freshness clock and refreshes, guaranteeing a real fetch
    /// regardless of current staleness.
    pub async fn force_refresh(&self) {
        {
            let mut state = self.state.write().expect("cache state lock poisoned");
            state.last_refresh_ms = 0;
        }
        self.refresh_components().await;
    }

    /// Refreshes version lists for every cached component without touching
    /// catalog content. No-op when a refresh is already in flight.
    pub async fn refresh_versions(&self) {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            debug!("refresh already in flight, skipping version refresh");
            return;
        };

        self.version_cache.clear();
        self.fill_all_versions().await;
        {
            let mut state = self.state.write().expect("cache state lock poisoned");
            state.last_version_refresh_ms = Utc::now().timestamp_millis();
        }
        self.persist();
    }

    /// Upserts a component by identity key without triggering a refresh.
    ///
    /// Used when a single component is resolved out-of-band. A later write
    /// with the same `(name, source_path, instance, version)` replaces the
    /// earlier entry in place; other versions of the same component are
    /// untouched.
    pub fn add_component_to_cache(&self, component: Component) {
        self.upsert(component);
        self.persist();
    }

    /// Upserts a dynamically resolved component (e.g. one the user navigated
    /// to directly). Same semantics as
    /// [`ComponentCacheManager::add_component_to_cache`].
    pub fn add_dynamic_component(&self, component: Component) {
        self.add_component_to_cache(component);
    }

    /// Resolves the ranked version list for a component's project and writes
    /// it back onto the matching cached entries.
    ///
    /// Served from the version cache when possible; otherwise the tag list
    /// is fetched live, branch names injected, ranked, and cached. On fetch
    /// failure the component's own version is returned as a single-element
    /// list rather than failing the caller.
    pub async fn fetch_component_versions(&self, component: &Component) -> Vec<String> {
        match self
            .resolve_project_versions(&component.gitlab_instance, &component.source_path)
            .await
        {
            Ok(versions) => {
                {
                    let mut state = self.state.write().expect("cache state lock poisoned");
                    for cached in state.components.iter_mut().filter(|c| {
                        c.gitlab_instance == component.gitlab_instance
                            && c.source_path == component.source_path
                    }) {
                        cached.available_versions = Some(versions.clone());
                    }
                }
                self.persist();
                versions
            }
            Err(e) => {
                warn!(
                    path = %component.source_path,
                    error = %e,
                    "version fetch failed, falling back to current version"
                );
                vec![component.version.clone()]
            }
        }
    }

    /// Fetches one component at one specific version, validating the version
    /// exists before any content fetch.
    ///
    /// Returns `Ok(None)` - not an error - when the version is absent from
    /// the project's tags and branches, or when the catalog at that ref
    /// contains no component of that name. A found component is upserted
    /// into the cache without evicting other versions' entries.
    ///
    /// # Errors
    ///
    /// Only the initial tag-list/metadata lookup failing entirely is
    /// surfaced as an error.
    pub async fn fetch_specific_version(
        &self,
        name: &str,
        source_path: &str,
        instance: &str,
        version: &str,
    ) -> Result<Option<Component>> {
        let known = self.resolve_project_versions(instance, source_path).await?;
        if !known.iter().any(|v| v == version) {
            debug!(name, version, "requested version does not exist, skipping content fetch");
            return Ok(None);
        }

        // Reuse the display label of an already-cached sibling when we have
        // one, so out-of-band fetches line up with refresh results.
        let label = {
            let state = self.state.read().expect("cache state lock poisoned");
            state
                .components
                .iter()
                .find(|c| c.gitlab_instance == instance && c.source_path == source_path)
                .map_or_else(|| source_path.to_string(), |c| c.source.clone())
        };

        let found = self
            .fetcher
            .fetch_project_at_ref(instance, source_path, &label, version)
            .await?
            .into_iter()
            .find(|c| c.name == name);

        let Some(mut component) = found else {
            return Ok(None);
        };
        component.available_versions = Some(known);

        self.upsert(component.clone());
        self.persist();
        Ok(Some(component))
    }

    /// Read-only copy of the last refresh's per-source failure map.
    #[must_use]
    pub fn source_errors(&self) -> HashMap<String, String> {
        self.state.read().expect("cache state lock poisoned").source_errors.clone()
    }

    /// Diagnostic snapshot of cache internals.
    #[must_use]
    pub fn cache_info(&self) -> CacheInfo {
        let state = self.state.read().expect("cache state lock poisoned");
        CacheInfo {
            component_count: state.components.len(),
            last_refresh: (state.last_refresh_ms > 0)
                .then(|| DateTime::from_timestamp_millis(state.last_refresh_ms))
                .flatten(),
            persistence_enabled: self.settings.persistence && self.snapshot_path.is_some(),
        }
    }

    /// Ranked versions for one project: version cache hit, else live fetch
    /// with branch injection and cache populate.
    async fn resolve_project_versions(&self, instance: &str, path: &str) -> Result<Vec<String>> {
        if let Some(versions) = self.version_cache.get(instance, path) {
            return Ok(versions);
        }
        let tags = self.api.project_tags(instance, path).await?;
        let versions = inject_branches_and_rank(tags);
        self.version_cache.set(instance, path, versions.clone());
        Ok(versions)
    }

    /// Second refresh pass: resolve version lists for components lacking
    /// them. Sequential and tolerant of individual failures.
    async fn fill_missing_versions(&self) {
        let targets = self.version_targets(true);
        self.apply_version_targets(targets).await;
    }

    /// Version-only refresh: resolve version lists for every component.
    async fn fill_all_versions(&self) {
        let targets = self.version_targets(false);
        self.apply_version_targets(targets).await;
    }

    /// Unique `(instance, path)` pairs to resolve versions for.
    fn version_targets(&self, missing_only: bool) -> Vec<(String, String)> {
        let state = self.state.read().expect("cache state lock poisoned");
        let mut targets: Vec<(String, String)> = Vec::new();
        for component in &state.components {
            if missing_only && component.available_versions.is_some() {
                continue;
            }
            let pair = (component.gitlab_instance.clone(), component.source_path.clone());
            if !targets.contains(&pair) {
                targets.push(pair);
            }
        }
        targets
    }

    async fn apply_version_targets(&self, targets: Vec<(String, String)>) {
        for (instance, path) in targets {
            match self.resolve_project_versions(&instance, &path).await {
                Ok(versions) => {
                    let mut state = self.state.write().expect("cache state lock poisoned");
                    for component in state
                        .components
                        .iter_mut()
                        .filter(|c| c.gitlab_instance == instance && c.source_path == path)
                    {
                        component.available_versions = Some(versions.clone());
                    }
                }
                Err(e) => {
                    warn!(%instance, %path, error = %e, "version list fetch failed");
                }
            }
        }
    }

    fn upsert(&self, component: Component) {
        let mut state = self.state.write().expect("cache state lock poisoned");
        if let Some(existing) = state.components.iter_mut().find(|c| c.same_identity(&component))
        {
            *existing = component;
        } else {
            state.components.push(component);
        }
    }

    /// Writes the current state to the snapshot file. Failures are logged,
    /// never propagated; the in-memory cache keeps functioning.
    fn persist(&self) {
        if !self.settings.persistence {
            return;
        }
        let Some(path) = &self.snapshot_path else {
            return;
        };

        let snapshot = {
            let state = self.state.read().expect("cache state lock poisoned");
            CacheSnapshot::new(
                state.components.clone(),
                state.last_refresh_ms,
                self.version_cache.entries(),
            )
        };
        if let Err(e) = snapshot.save(path) {
            warn!(path = %path.display(), error = %e, "snapshot save failed");
        }
    }
}

/// Injects the conventional branch names and ranks the result.
fn inject_branches_and_rank(mut versions: Vec<String>) -> Vec<String> {
    for branch in INJECTED_BRANCHES {
        if !versions.iter().any(|v| v == branch) {
            versions.push(branch.to_string());
        }
    }
    rank_versions(&versions)
}

/// Two fixed local placeholder components used when no sources are
/// configured, so consumers never see an empty catalog.
fn builtin_components() -> Vec<Component> {
    let deploy_params = vec![
        {
            let mut p = Parameter::new("environment");
            p.description = "Target environment name".to_string();
            p.required = true;
            p
        },
        {
            let mut p = Parameter::new("dry-run");
            p.description = "Print the plan without applying it".to_string();
            p.param_type = crate::models::ParameterType::Boolean;
            p.default_value = Some(crate::models::ParameterDefault::Bool(false));
            p
        },
    ];
    let test_params = vec![{
        let mut p = Parameter::new("stage");
        p.description = "Pipeline stage to attach the test job to".to_string();
        p.default_value = Some(crate::models::ParameterDefault::Str("test".to_string()));
        p
    }];

    vec![
        Component {
            name: "deploy".to_string(),
            description: "Deploy a build to a named environment".to_string(),
            parameters: deploy_params,
            source: "built-in".to_string(),
            source_path: "local/deploy".to_string(),
            gitlab_instance: "local".to_string(),
            version: "main".to_string(),
            url: Component::reference_url("local", "local/deploy", "deploy", "main"),
            available_versions: Some(vec!["main".to_string()]),
            readme: None,
        },
        Component {
            name: "test".to_string(),
            description: "Run a project test suite".to_string(),
            parameters: test_params,
            source: "built-in".to_string(),
            source_path: "local/test".to_string(),
            gitlab_instance: "local".to_string(),
            version: "main".to_string(),
            url: Component::reference_url("local", "local/test", "test", "main"),
            available_versions: Some(vec!["main".to_string()]),
            readme: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceConfig;
    use crate::test_utils::{StubApi, sample_component};

    const INSTANCE: &str = "gitlab.com";

    fn manager_with(
        api: StubApi,
        sources: Vec<SourceConfig>,
    ) -> (Arc<ComponentCacheManager<StubApi>>, Arc<StubApi>) {
        let api = Arc::new(api);
        let settings = Settings {
            sources,
            persistence: false,
            ..Settings::default()
        };
        let manager = Arc::new(ComponentCacheManager::new(Arc::clone(&api), settings, None));
        (manager, api)
    }

    fn deploy_source() -> SourceConfig {
        SourceConfig::project("deploy-src", "grp/deploy")
    }

    fn deploy_api() -> StubApi {
        StubApi::new()
            .with_project(INSTANCE, "grp/deploy", "main")
            .with_template(
                INSTANCE,
                "grp/deploy",
                "main",
                "deploy.yml",
                "spec:\n  description: Deploys things\n  inputs:\n    env:\n      default: prod\n",
            )
            .with_tags(INSTANCE, "grp/deploy", &["v1.0.0", "v2.0.0"])
    }

    #[tokio::test]
    async fn dedup_merge_is_idempotent() {
        let (manager, _api) = manager_with(StubApi::new(), vec![]);

        let mut first = sample_component("deploy", "v1.0.0");
        first.description = "first".to_string();
        let mut second = sample_component("deploy", "v1.0.0");
        second.description = "second".to_string();

        manager.add_component_to_cache(first);
        let size_after_first = manager.cache_info().component_count;
        manager.add_component_to_cache(second);

        let components = manager.components();
        assert_eq!(components.len(), size_after_first);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].description, "second");
    }

    #[tokio::test]
    async fn distinct_versions_coexist() {
        let (manager, _api) = manager_with(StubApi::new(), vec![]);
        manager.add_component_to_cache(sample_component("deploy", "v1.0.0"));
        manager.add_component_to_cache(sample_component("deploy", "v2.0.0"));
        assert_eq!(manager.cache_info().component_count, 2);
    }

    #[tokio::test]
    async fn zero_sources_falls_back_to_builtins() {
        let (manager, _api) = manager_with(StubApi::new(), vec![]);
        manager.refresh_components().await;

        let components = manager.components();
        assert_eq!(components.len(), 2);
        let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["deploy", "test"]);
        assert!(components.iter().all(|c| c.gitlab_instance == "local"));
    }

    #[tokio::test]
    async fn refresh_records_source_errors_without_aborting_siblings() {
        let api = deploy_api();
        let sources = vec![SourceConfig::project("broken", "grp/missing"), deploy_source()];
        let (manager, _api) = manager_with(api, sources);

        manager.refresh_components().await;

        let components = manager.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "deploy");

        let errors = manager.source_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors["broken"].contains("grp/missing"));
    }

    #[tokio::test]
    async fn freshness_gating_prevents_repeat_refreshes() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);
        manager.refresh_components().await;
        let fetches_after_refresh = api.project_calls();
        assert_eq!(fetches_after_refresh, 1);

        let _ = manager.components();
        let _ = manager.components();
        // Give any (incorrectly) spawned background refresh a chance to run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(api.project_calls(), fetches_after_refresh);
    }

    #[tokio::test]
    async fn stale_cache_triggers_background_refresh() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);

        // Fresh instance with epoch refresh time: the read returns the empty
        // snapshot immediately and schedules a refresh behind the caller.
        let initial = manager.components();
        assert!(initial.is_empty());

        for _ in 0..50 {
            tokio::task::yield_now().await;
            if api.project_calls() > 0 {
                break;
            }
        }
        assert!(api.project_calls() > 0);
    }

    #[tokio::test]
    async fn force_refresh_always_fetches() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);
        manager.refresh_components().await;
        assert_eq!(api.project_calls(), 1);

        manager.force_refresh().await;
        assert_eq!(api.project_calls(), 2);
    }

    #[tokio::test]
    async fn refresh_fills_missing_versions() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);
        manager.refresh_components().await;

        let components = manager.components();
        let versions = components[0].available_versions.as_ref().unwrap();
        assert_eq!(versions[0], "main");
        assert!(versions.contains(&"v2.0.0".to_string()));
        // One tag fetch for the whole project, via the version cache.
        assert_eq!(api.tag_calls(), 1);
    }

    #[tokio::test]
    async fn component_versions_ranked_and_cached() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);
        let component = {
            let mut c = sample_component("deploy", "main");
            c.source_path = "grp/deploy".to_string();
            c
        };
        manager.add_component_to_cache(component.clone());

        let versions = manager.fetch_component_versions(&component).await;
        assert_eq!(versions, vec!["main", "master", "v2.0.0", "v1.0.0"]);
        assert_eq!(api.tag_calls(), 1);

        // Second resolution is served from the version cache.
        let again = manager.fetch_component_versions(&component).await;
        assert_eq!(again, versions);
        assert_eq!(api.tag_calls(), 1);

        let cached = manager.components();
        assert_eq!(cached[0].available_versions.as_ref().unwrap(), &versions);
    }

    #[tokio::test]
    async fn version_fetch_failure_falls_back_to_own_version() {
        let api = StubApi::new().failing_tags(INSTANCE, "grp/project");
        let (manager, _api) = manager_with(api, vec![]);

        let component = sample_component("deploy", "v1.2.3");
        let versions = manager.fetch_component_versions(&component).await;
        assert_eq!(versions, vec!["v1.2.3"]);
    }

    #[tokio::test]
    async fn specific_version_absent_skips_content_fetch() {
        let (manager, api) = manager_with(deploy_api(), vec![deploy_source()]);

        let result = manager
            .fetch_specific_version("deploy", "grp/deploy", INSTANCE, "v9.9.9")
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(api.raw_file_calls(), 0);
        assert_eq!(api.tree_calls(), 0);
    }

    #[tokio::test]
    async fn specific_version_appends_without_evicting() {
        let api = deploy_api().with_template(
            INSTANCE,
            "grp/deploy",
            "v1.0.0",
            "deploy.yml",
            "spec:\n  description: Old deploy\n",
        );
        let (manager, _api) = manager_with(api, vec![deploy_source()]);
        manager.refresh_components().await;
        assert_eq!(manager.cache_info().component_count, 1);

        let fetched = manager
            .fetch_specific_version("deploy", "grp/deploy", INSTANCE, "v1.0.0")
            .await
            .unwrap()
            .expect("version exists");

        assert_eq!(fetched.version, "v1.0.0");
        assert_eq!(fetched.description, "Old deploy");
        // Both the default-branch entry and the pinned one are cached.
        assert_eq!(manager.cache_info().component_count, 2);
    }

    #[tokio::test]
    async fn specific_version_unknown_component_name_is_none() {
        let (manager, _api) = manager_with(deploy_api(), vec![deploy_source()]);
        let result = manager
            .fetch_specific_version("nonexistent", "grp/deploy", INSTANCE, "main")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn snapshot_roundtrip_through_manager() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let api = Arc::new(deploy_api());
        let settings = Settings {
            sources: vec![deploy_source()],
            ..Settings::default()
        };
        let manager = Arc::new(ComponentCacheManager::new(
            Arc::clone(&api),
            settings.clone(),
            Some(path.clone()),
        ));
        manager.refresh_components().await;
        assert!(path.exists());

        // A second process start: no network, populated from the snapshot.
        let cold_api = Arc::new(StubApi::new());
        let restored =
            Arc::new(ComponentCacheManager::new(Arc::clone(&cold_api), settings, Some(path)));
        let components = restored.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "deploy");
        assert!(components[0].available_versions.is_some());
        assert!(restored.cache_info().last_refresh.is_some());
        assert!(restored.cache_info().persistence_enabled);
    }

    #[tokio::test]
    async fn cache_info_reports_state() {
        let (manager, _api) = manager_with(StubApi::new(), vec![]);
        let info = manager.cache_info();
        assert_eq!(info.component_count, 0);
        assert!(info.last_refresh.is_none());
        assert!(!info.persistence_enabled);

        manager.refresh_components().await;
        let info = manager.cache_info();
        assert_eq!(info.component_count, 2);
        assert!(info.last_refresh.is_some());
    }

    #[test]
    fn branch_injection_and_ranking() {
        let ranked = inject_branches_and_rank(vec!["v1.0.0".to_string(), "main".to_string()]);
        assert_eq!(ranked, vec!["main", "master", "v1.0.0"]);
    }
}

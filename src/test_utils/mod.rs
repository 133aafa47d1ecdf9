//! Test utilities for cicat
//!
//! This module provides utilities for writing tests against the catalog
//! core without touching the network: a scripted [`StubApi`] implementing
//! [`GitlabApi`] with per-endpoint call counters, and fixture builders for
//! components.
//!
//! Available to unit tests via `cfg(test)` and to the integration test
//! harness via the `test-utils` feature (the crate dev-depends on itself
//! with that feature enabled).
//!
//! # Example
//!
//! ```rust,no_run
//! use cicat_cli::test_utils::StubApi;
//!
//! let api = StubApi::new()
//!     .with_project("gitlab.com", "grp/deploy", "main")
//!     .with_template(
//!         "gitlab.com",
//!         "grp/deploy",
//!         "main",
//!         "deploy.yml",
//!         "spec:\n  inputs:\n    env:\n",
//!     );
//! assert_eq!(api.project_calls(), 0);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{CatalogError, Result};
use crate::models::Component;
use crate::remote::{GitlabApi, GroupProject, ProjectInfo, TreeEntry};

fn project_key(instance: &str, path: &str) -> String {
    format!("{instance}|{path}")
}

fn ref_key(instance: &str, path: &str, sub: &str, reference: &str) -> String {
    format!("{instance}|{path}|{sub}|{reference}")
}

/// Scripted in-memory [`GitlabApi`] implementation.
///
/// Populated with builder methods before use; every endpoint counts its
/// invocations so tests can assert on fetch behavior (freshness gating,
/// never-fetched guarantees).
#[derive(Debug, Default)]
pub struct StubApi {
    projects: HashMap<String, ProjectInfo>,
    trees: HashMap<String, Vec<TreeEntry>>,
    files: HashMap<String, String>,
    tags: HashMap<String, Vec<String>>,
    groups: HashMap<String, Vec<GroupProject>>,
    failing_files: HashSet<String>,
    failing_tags: HashSet<String>,

    project_calls: AtomicUsize,
    tree_calls: AtomicUsize,
    raw_file_calls: AtomicUsize,
    tag_calls: AtomicUsize,
    group_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl StubApi {
    /// Creates an empty stub; every lookup misses until scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project with the given default branch.
    #[must_use]
    pub fn with_project(mut self, instance: &str, path: &str, default_branch: &str) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        self.projects.insert(
            project_key(instance, path),
            ProjectInfo {
                id,
                name,
                path_with_namespace: path.to_string(),
                default_branch: Some(default_branch.to_string()),
                web_url: Some(format!("https://{instance}/{path}")),
            },
        );
        self
    }

    /// Registers a template file under `templates/` at a ref, both in the
    /// tree listing and as raw content.
    #[must_use]
    pub fn with_template(
        mut self,
        instance: &str,
        path: &str,
        reference: &str,
        file_name: &str,
        content: &str,
    ) -> Self {
        let file_path = format!("templates/{file_name}");
        self.trees
            .entry(ref_key(instance, path, "templates", reference))
            .or_default()
            .push(TreeEntry {
                name: file_name.to_string(),
                path: file_path.clone(),
                entry_type: "blob".to_string(),
            });
        self.files
            .insert(ref_key(instance, path, &file_path, reference), content.to_string());
        self
    }

    /// Registers a raw file (e.g. a README) at a ref.
    #[must_use]
    pub fn with_file(
        mut self,
        instance: &str,
        path: &str,
        reference: &str,
        file_path: &str,
        content: &str,
    ) -> Self {
        self.files
            .insert(ref_key(instance, path, file_path, reference), content.to_string());
        self
    }

    /// Registers the tag list of a project.
    #[must_use]
    pub fn with_tags(mut self, instance: &str, path: &str, tags: &[&str]) -> Self {
        self.tags.insert(
            project_key(instance, path),
            tags.iter().map(|t| (*t).to_string()).collect(),
        );
        self
    }

    /// Registers a group's member projects as `(path, name)` pairs.
    #[must_use]
    pub fn with_group(mut self, instance: &str, group_path: &str, members: &[(&str, &str)]) -> Self {
        let projects = members
            .iter()
            .enumerate()
            .map(|(i, (path, name))| GroupProject {
                id: 1000 + i as u64,
                name: (*name).to_string(),
                path_with_namespace: (*path).to_string(),
            })
            .collect();
        self.groups.insert(project_key(instance, group_path), projects);
        self
    }

    /// Scripts a raw-file fetch to fail with a transport error.
    #[must_use]
    pub fn failing_file(
        mut self,
        instance: &str,
        path: &str,
        reference: &str,
        file_path: &str,
    ) -> Self {
        self.failing_files.insert(ref_key(instance, path, file_path, reference));
        self
    }

    /// Scripts the tag listing of a project to fail with a transport error.
    #[must_use]
    pub fn failing_tags(mut self, instance: &str, path: &str) -> Self {
        self.failing_tags.insert(project_key(instance, path));
        self
    }

    /// Number of project-metadata lookups performed.
    #[must_use]
    pub fn project_calls(&self) -> usize {
        self.project_calls.load(Ordering::SeqCst)
    }

    /// Number of tree listings performed.
    #[must_use]
    pub fn tree_calls(&self) -> usize {
        self.tree_calls.load(Ordering::SeqCst)
    }

    /// Number of raw-file fetches performed.
    #[must_use]
    pub fn raw_file_calls(&self) -> usize {
        self.raw_file_calls.load(Ordering::SeqCst)
    }

    /// Number of tag-list fetches performed.
    #[must_use]
    pub fn tag_calls(&self) -> usize {
        self.tag_calls.load(Ordering::SeqCst)
    }

    /// Number of group-project listings performed.
    #[must_use]
    pub fn group_calls(&self) -> usize {
        self.group_calls.load(Ordering::SeqCst)
    }
}

impl GitlabApi for StubApi {
    async fn project(&self, instance: &str, path: &str) -> Result<ProjectInfo> {
        self.project_calls.fetch_add(1, Ordering::SeqCst);
        self.projects.get(&project_key(instance, path)).cloned().ok_or_else(|| {
            CatalogError::ProjectNotFound {
                path: path.to_string(),
                instance: instance.to_string(),
            }
        })
    }

    async fn repository_tree(
        &self,
        instance: &str,
        project_path: &str,
        dir: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>> {
        self.tree_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .trees
            .get(&ref_key(instance, project_path, dir, reference))
            .cloned()
            .unwrap_or_default())
    }

    async fn raw_file(
        &self,
        instance: &str,
        project_path: &str,
        file_path: &str,
        reference: &str,
    ) -> Result<String> {
        self.raw_file_calls.fetch_add(1, Ordering::SeqCst);
        let key = ref_key(instance, project_path, file_path, reference);
        if self.failing_files.contains(&key) {
            return Err(CatalogError::Transport {
                url: key,
                reason: "scripted failure".to_string(),
            });
        }
        self.files.get(&key).cloned().ok_or_else(|| CatalogError::HttpStatus {
            status: 404,
            url: key,
        })
    }

    async fn project_tags(&self, instance: &str, project_path: &str) -> Result<Vec<String>> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        let key = project_key(instance, project_path);
        if self.failing_tags.contains(&key) {
            return Err(CatalogError::Transport {
                url: key,
                reason: "scripted failure".to_string(),
            });
        }
        Ok(self.tags.get(&key).cloned().unwrap_or_default())
    }

    async fn group_projects(&self, instance: &str, group_path: &str) -> Result<Vec<GroupProject>> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        self.groups.get(&project_key(instance, group_path)).cloned().ok_or_else(|| {
            CatalogError::HttpStatus {
                status: 404,
                url: format!("https://{instance}/api/v4/groups/{group_path}/projects"),
            }
        })
    }
}

/// Builds a minimal component for cache tests.
#[must_use]
pub fn sample_component(name: &str, version: &str) -> Component {
    Component {
        name: name.to_string(),
        description: format!("{name} component"),
        parameters: Vec::new(),
        source: "test".to_string(),
        source_path: "grp/project".to_string(),
        gitlab_instance: "gitlab.com".to_string(),
        version: version.to_string(),
        url: Component::reference_url("gitlab.com", "grp/project", name, version),
        available_versions: None,
        readme: None,
    }
}

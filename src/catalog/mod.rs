//! Catalog fetching: turning remote projects and groups into components.
//!
//! [`CatalogFetcher`] orchestrates [`GitlabApi`] calls for one configured
//! source. For a project it enumerates the `templates/` directory at the
//! default branch, fetches each YAML template with bounded concurrency, runs
//! the spec parser over it, and attaches README-derived descriptions as
//! fallback. For a group it enumerates member projects (transitively) and
//! recurses per project in fixed-size batches.
//!
//! # Failure scope
//!
//! Failures are absorbed at the narrowest scope that can recover:
//! - a single template file failing to fetch or parse degrades that one
//!   component to a default description
//! - a tree or README listing failure degrades to "no content there"
//! - one broken member project never stops its group siblings
//!
//! The only hard, source-fatal error is the very first step: resolving
//! project (or group) metadata. That failure propagates so the cache
//! manager can record the whole source as errored for the refresh cycle.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::{GROUP_PROJECT_BATCH_SIZE, TEMPLATE_FILE_BATCH_SIZE, TEMPLATES_DIR};
use crate::core::Result;
use crate::models::{Component, SourceConfig, SourceKind};
use crate::remote::{GitlabApi, TreeEntry, process_batch};
use crate::template::parse_template;

/// Result of fetching one configured source.
#[derive(Debug, Default)]
pub struct SourceCatalog {
    /// Components discovered across the source.
    pub components: Vec<Component>,
    /// Soft condition (e.g. a group whose projects all came up empty),
    /// distinct from a hard fetch failure.
    pub warning: Option<String>,
    /// Per-project failures inside a group, `(project path, message)`.
    pub project_failures: Vec<(String, String)>,
}

/// Fetches component catalogs from remote projects and groups.
#[derive(Debug)]
pub struct CatalogFetcher<A> {
    api: Arc<A>,
}

impl<A: GitlabApi> CatalogFetcher<A> {
    /// Creates a fetcher over a shared API client.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Fetches one configured source, dispatching on its kind.
    ///
    /// # Errors
    ///
    /// Only metadata resolution failures propagate; see module docs.
    pub async fn fetch_source(&self, source: &SourceConfig) -> Result<SourceCatalog> {
        match source.kind {
            SourceKind::Project => {
                let components = self
                    .fetch_project(&source.gitlab_instance, &source.path, &source.name)
                    .await?;
                Ok(SourceCatalog {
                    components,
                    warning: None,
                    project_failures: Vec::new(),
                })
            }
            SourceKind::Group => {
                self.fetch_group(&source.gitlab_instance, &source.path, &source.name).await
            }
        }
    }

    /// Fetches all components of a single project at its default branch.
    ///
    /// Zero YAML template files is absence of catalog content, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when project metadata cannot be resolved.
    pub async fn fetch_project(
        &self,
        instance: &str,
        path: &str,
        source_label: &str,
    ) -> Result<Vec<Component>> {
        let project = self.api.project(instance, path).await?;
        let reference = project.default_branch.clone().unwrap_or_else(|| "main".to_string());
        self.fetch_project_at_ref(instance, path, source_label, &reference).await
    }

    /// Fetches all components of a project at an explicit ref (tag or
    /// branch). Used both by the default-branch path above and by
    /// specific-version resolution.
    pub async fn fetch_project_at_ref(
        &self,
        instance: &str,
        path: &str,
        source_label: &str,
        reference: &str,
    ) -> Result<Vec<Component>> {
        // Template listing and README fetch are independent; run both at once.
        let (tree, readme) = futures::join!(
            self.api.repository_tree(instance, path, TEMPLATES_DIR, reference),
            self.api.raw_file(instance, path, "README.md", reference),
        );

        let entries: Vec<TreeEntry> = match tree {
            Ok(entries) => entries.into_iter().filter(TreeEntry::is_yaml_file).collect(),
            Err(e) => {
                // Missing templates/ directory or listing hiccup: no catalog
                // content here, which is not a source failure.
                debug!(path, error = %e, "template listing unavailable");
                Vec::new()
            }
        };
        let readme = readme.ok();

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let api = Arc::clone(&self.api);
        let results = process_batch(entries, TEMPLATE_FILE_BATCH_SIZE, |entry| {
            let api = Arc::clone(&api);
            let readme = readme.clone();
            async move {
                let name = template_name(&entry.name);
                let component = match api.raw_file(instance, path, &entry.path, reference).await {
                    Ok(content) => {
                        build_component(instance, path, source_label, reference, &name, &content, readme)
                    }
                    Err(e) => {
                        warn!(file = %entry.path, error = %e, "template fetch failed, using defaults");
                        fallback_component(instance, path, source_label, reference, &name, readme)
                    }
                };
                Ok::<Component, crate::core::CatalogError>(component)
            }
        })
        .await;

        Ok(results.into_iter().filter_map(Result::ok).collect())
    }

    /// Fetches all components across a group's member projects.
    ///
    /// # Errors
    ///
    /// Fails only when the member-project listing itself cannot be fetched.
    pub async fn fetch_group(
        &self,
        instance: &str,
        group_path: &str,
        source_label: &str,
    ) -> Result<SourceCatalog> {
        let projects = self.api.group_projects(instance, group_path).await?;
        let scanned = projects.len();
        debug!(group_path, scanned, "scanning group member projects");

        let results = process_batch(projects, GROUP_PROJECT_BATCH_SIZE, |project| async move {
            let label = format!("{source_label}/{}", project.name);
            self.fetch_project(instance, &project.path_with_namespace, &label)
                .await
                .map_err(|e| (project.path_with_namespace.clone(), e.to_string()))
        })
        .await;

        let mut components = Vec::new();
        let mut project_failures = Vec::new();
        for result in results {
            match result {
                Ok(found) => components.extend(found),
                Err((path, message)) => {
                    warn!(project = %path, %message, "group member project failed");
                    project_failures.push((path, message));
                }
            }
        }

        let warning = if components.is_empty() && scanned > 0 {
            Some(format!("no components found in {scanned} projects"))
        } else {
            None
        };

        Ok(SourceCatalog {
            components,
            warning,
            project_failures,
        })
    }
}

/// Component name for a template file (`deploy.yml` -> `deploy`).
fn template_name(file_name: &str) -> String {
    file_name
        .strip_suffix(".yaml")
        .or_else(|| file_name.strip_suffix(".yml"))
        .unwrap_or(file_name)
        .to_string()
}

/// First line of a README usable as a description: not a heading, not a
/// badge, long enough to say something.
fn readme_description(readme: &str) -> Option<String> {
    readme
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('[') && line.len() > 20)
        .map(ToString::to_string)
}

fn build_component(
    instance: &str,
    path: &str,
    source_label: &str,
    reference: &str,
    name: &str,
    content: &str,
    readme: Option<String>,
) -> Component {
    let spec = parse_template(content);
    // Fallback priority: spec-declared > leading-comment (both from the
    // parser) > README-derived > literal placeholder.
    let description = spec
        .description
        .or_else(|| readme.as_deref().and_then(readme_description))
        .unwrap_or_else(|| format!("{name} component"));

    Component {
        name: name.to_string(),
        description,
        parameters: spec.parameters,
        source: source_label.to_string(),
        source_path: path.to_string(),
        gitlab_instance: instance.to_string(),
        version: reference.to_string(),
        url: Component::reference_url(instance, path, name, reference),
        available_versions: None,
        readme,
    }
}

fn fallback_component(
    instance: &str,
    path: &str,
    source_label: &str,
    reference: &str,
    name: &str,
    readme: Option<String>,
) -> Component {
    Component {
        name: name.to_string(),
        description: format!("{name} component"),
        parameters: Vec::new(),
        source: source_label.to_string(),
        source_path: path.to_string(),
        gitlab_instance: instance.to_string(),
        version: reference.to_string(),
        url: Component::reference_url(instance, path, name, reference),
        available_versions: None,
        readme,
    }
}

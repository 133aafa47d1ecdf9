//! Typed GitLab REST API surface.
//!
//! The core consumes the [`GitlabApi`] trait: project metadata by path,
//! repository tree listing, raw file content, tag lists, and the paged
//! group member-project listing. [`GitlabClient`] is the production
//! implementation over [`HttpClient`]; tests substitute a scripted stub.
//!
//! All requests authenticate optionally via a per-instance private token
//! resolved from the configuration.

use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

use crate::constants::GROUP_PROJECTS_PAGE_SIZE;
use crate::core::Result;
use crate::remote::http::HttpClient;

/// Project metadata as returned by `GET /projects/:path`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    /// Numeric project id, used by endpoints that do not accept paths.
    pub id: u64,
    /// Human project name.
    pub name: String,
    /// Full namespaced path (e.g. `"components/deploy"`).
    pub path_with_namespace: String,
    /// Default branch; absent on empty repositories.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Browser URL of the project.
    #[serde(default)]
    pub web_url: Option<String>,
}

/// One entry of a repository tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// File or directory name.
    pub name: String,
    /// Path relative to the repository root.
    pub path: String,
    /// `"blob"` for files, `"tree"` for directories.
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    /// Whether this entry is a YAML template file.
    #[must_use]
    pub fn is_yaml_file(&self) -> bool {
        self.entry_type == "blob"
            && (self.name.ends_with(".yml") || self.name.ends_with(".yaml"))
    }
}

/// One tag from the tag-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TagInfo {
    /// Tag name.
    pub name: String,
}

/// One member project from the paged group listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupProject {
    /// Numeric project id.
    pub id: u64,
    /// Human project name.
    pub name: String,
    /// Full namespaced path.
    pub path_with_namespace: String,
}

/// The remote API surface the catalog core consumes.
///
/// Methods return `Send` futures so implementations can be driven from
/// spawned background refresh tasks. Implementations are expected to handle
/// their own retry policy; the core treats any returned error as final for
/// the enclosing scope.
pub trait GitlabApi: Send + Sync {
    /// Resolves project metadata by namespaced path.
    fn project(
        &self,
        instance: &str,
        path: &str,
    ) -> impl Future<Output = Result<ProjectInfo>> + Send;

    /// Lists one directory of the repository tree at a ref.
    fn repository_tree(
        &self,
        instance: &str,
        project_path: &str,
        dir: &str,
        reference: &str,
    ) -> impl Future<Output = Result<Vec<TreeEntry>>> + Send;

    /// Fetches raw file content at a ref.
    fn raw_file(
        &self,
        instance: &str,
        project_path: &str,
        file_path: &str,
        reference: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Lists tag names of a project.
    fn project_tags(
        &self,
        instance: &str,
        project_path: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Lists all member projects of a group, transitively including
    /// subgroups.
    fn group_projects(
        &self,
        instance: &str,
        group_path: &str,
    ) -> impl Future<Output = Result<Vec<GroupProject>>> + Send;
}

/// Percent-encodes a namespaced path for use as a single URL segment.
///
/// GitLab accepts project and file paths as one segment with `/` encoded;
/// `.` is encoded as well to survive proxies that collapse dot segments.
#[must_use]
pub(crate) fn encode_path(path: &str) -> String {
    path.replace('/', "%2F").replace('.', "%2E")
}

/// Builds the API v4 base URL for an instance host.
#[must_use]
pub(crate) fn api_base(instance: &str) -> String {
    if instance.starts_with("http://") || instance.starts_with("https://") {
        format!("{instance}/api/v4")
    } else {
        format!("https://{instance}/api/v4")
    }
}

/// Production [`GitlabApi`] implementation over HTTP.
#[derive(Debug, Clone, Default)]
pub struct GitlabClient {
    http: HttpClient,
    /// Private tokens keyed by instance host.
    tokens: HashMap<String, String>,
}

impl GitlabClient {
    /// Creates a client with per-instance tokens from the configuration.
    #[must_use]
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            http: HttpClient::new(),
            tokens,
        }
    }

    fn token_for(&self, instance: &str) -> Option<&str> {
        self.tokens.get(instance).map(String::as_str)
    }
}

impl GitlabApi for GitlabClient {
    async fn project(&self, instance: &str, path: &str) -> Result<ProjectInfo> {
        let url = format!("{}/projects/{}", api_base(instance), encode_path(path));
        self.http.fetch_json(&url, self.token_for(instance)).await
    }

    async fn repository_tree(
        &self,
        instance: &str,
        project_path: &str,
        dir: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/projects/{}/repository/tree?path={}&ref={}&per_page=100",
            api_base(instance),
            encode_path(project_path),
            dir,
            reference,
        );
        self.http.fetch_json(&url, self.token_for(instance)).await
    }

    async fn raw_file(
        &self,
        instance: &str,
        project_path: &str,
        file_path: &str,
        reference: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw?ref={}",
            api_base(instance),
            encode_path(project_path),
            encode_path(file_path),
            reference,
        );
        self.http.fetch_text(&url, self.token_for(instance)).await
    }

    async fn project_tags(&self, instance: &str, project_path: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/projects/{}/repository/tags?per_page=100",
            api_base(instance),
            encode_path(project_path),
        );
        let tags: Vec<TagInfo> = self.http.fetch_json(&url, self.token_for(instance)).await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn group_projects(&self, instance: &str, group_path: &str) -> Result<Vec<GroupProject>> {
        let mut projects = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!(
                "{}/groups/{}/projects?include_subgroups=true&per_page={}&page={}",
                api_base(instance),
                encode_path(group_path),
                GROUP_PROJECTS_PAGE_SIZE,
                page,
            );
            let batch: Vec<GroupProject> =
                self.http.fetch_json(&url, self.token_for(instance)).await?;
            let short_page = batch.len() < GROUP_PROJECTS_PAGE_SIZE;
            projects.extend(batch);
            if short_page {
                break;
            }
            page += 1;
        }
        debug!(group_path, count = projects.len(), "group member projects listed");
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_encoding() {
        assert_eq!(encode_path("components/deploy"), "components%2Fdeploy");
        assert_eq!(encode_path("templates/run.yml"), "templates%2Frun%2Eyml");
    }

    #[test]
    fn api_base_handles_bare_hosts_and_urls() {
        assert_eq!(api_base("gitlab.com"), "https://gitlab.com/api/v4");
        assert_eq!(
            api_base("https://gitlab.example.com"),
            "https://gitlab.example.com/api/v4"
        );
        assert_eq!(
            api_base("http://localhost:8080"),
            "http://localhost:8080/api/v4"
        );
    }

    #[test]
    fn yaml_detection() {
        let blob = |name: &str| TreeEntry {
            name: name.to_string(),
            path: format!("templates/{name}"),
            entry_type: "blob".to_string(),
        };
        assert!(blob("deploy.yml").is_yaml_file());
        assert!(blob("deploy.yaml").is_yaml_file());
        assert!(!blob("README.md").is_yaml_file());

        let dir = TreeEntry {
            name: "nested.yml".to_string(),
            path: "templates/nested.yml".to_string(),
            entry_type: "tree".to_string(),
        };
        assert!(!dir.is_yaml_file());
    }

    #[test]
    fn token_lookup_is_per_instance() {
        let mut tokens = HashMap::new();
        tokens.insert("gitlab.example.com".to_string(), "secret".to_string());
        let client = GitlabClient::new(tokens);
        assert_eq!(client.token_for("gitlab.example.com"), Some("secret"));
        assert_eq!(client.token_for("gitlab.com"), None);
    }
}

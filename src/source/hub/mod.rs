//! Black Duck REST API client.
//!
//! Minimal blocking client: exchanges the API token for a bearer token once,
//! then serves the [`ProjectResolver`] and [`BomSource`] traits. Collection
//! endpoints are read as a single page with a fixed `limit`.

mod response;

pub use response::{ItemsPage, TokenResponse};

use super::traits::{BomSource, ProjectResolver};
use crate::config::ServerConfig;
use crate::error::{
    EnrichmentErrorKind, ExportError, OptionContext, Result, SourceErrorKind,
};
use crate::model::{
    BomNode, ComponentDetails, ComponentVersion, CopyrightEntry, CustomField, MatchedFile,
    Origin, Project, ProjectVersion, ResolvedVersion, ReviewComment,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::time::Duration;

const BOM_MEDIA_TYPE: &str = "application/vnd.blackducksoftware.bill-of-materials-6+json";
const COPYRIGHT_MEDIA_TYPE: &str = "application/vnd.blackducksoftware.copyright-4+json";
const USER_MEDIA_TYPE: &str = "application/vnd.blackducksoftware.user-4+json";
const JSON_MEDIA_TYPE: &str = "application/json";

const BOM_PAGE_LIMIT: usize = 5000;
const COPYRIGHT_PAGE_LIMIT: usize = 100;

/// Connection settings for [`HubClient`].
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// Server base URL, without trailing slash
    pub base_url: String,
    pub api_token: String,
    /// Accept invalid TLS certificates
    pub trust_certs: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HubClientConfig {
    /// Build from the server section of an export config.
    pub fn from_server(server: &ServerConfig) -> Result<Self> {
        let base_url = server
            .url
            .as_deref()
            .context_none("server.url is not set")?
            .trim_end_matches('/')
            .to_string();
        let api_token = server
            .api_token
            .clone()
            .context_none("server.api_token is not set")?;
        Ok(Self {
            base_url,
            api_token,
            trust_certs: server.trust_certs,
            timeout: server.timeout(),
        })
    }
}

/// HTTP client for a Black Duck server.
pub struct HubClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

fn network_error(context: &str, err: &reqwest::Error) -> ExportError {
    ExportError::source(context, SourceErrorKind::NetworkError(err.to_string()))
}

impl HubClient {
    /// Create a client and authenticate against the server.
    pub fn connect(config: HubClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.trust_certs)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", &e))?;

        let bearer_token = Self::authenticate(&client, &config)?;
        tracing::debug!("Authenticated against {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url,
            bearer_token,
        })
    }

    fn authenticate(client: &Client, config: &HubClientConfig) -> Result<String> {
        let url = format!("{}/api/tokens/authenticate", config.base_url);
        let response = client
            .post(&url)
            .header(AUTHORIZATION, format!("token {}", config.api_token))
            .header(ACCEPT, USER_MEDIA_TYPE)
            .send()
            .map_err(|e| network_error("authenticating", &e))?;

        if !response.status().is_success() {
            return Err(ExportError::source(
                "authenticating",
                SourceErrorKind::Authentication(format!(
                    "server returned status {}",
                    response.status().as_u16()
                )),
            ));
        }

        let token: TokenResponse = response.json().map_err(|e| {
            ExportError::source(
                "authenticating",
                SourceErrorKind::InvalidResponse(e.to_string()),
            )
        })?;
        Ok(token.bearer_token)
    }

    fn get(&self, url: &str, accept: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .header(ACCEPT, accept)
    }

    fn send(&self, request: RequestBuilder, context: &str) -> Result<reqwest::blocking::Response> {
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                ExportError::enrichment(context, EnrichmentErrorKind::Timeout)
            } else {
                network_error(context, &e)
            }
        })?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(ExportError::source(
                context,
                SourceErrorKind::Authentication("bearer token rejected".to_string()),
            ));
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ExportError::source(
                context,
                SourceErrorKind::Status {
                    status: status.as_u16(),
                    message,
                },
            ));
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T> {
        self.send(request, context)?.json().map_err(|e| {
            ExportError::source(context, SourceErrorKind::InvalidResponse(e.to_string()))
        })
    }

    fn get_items<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<Vec<T>> {
        let page: ItemsPage<T> = self.get_json(request, context)?;
        Ok(page.items)
    }

    fn linked_items<T: DeserializeOwned>(
        &self,
        href: Option<&str>,
        rel: &str,
        accept: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let href = href.ok_or_else(|| {
            ExportError::enrichment(rel, EnrichmentErrorKind::MissingLink(rel.to_string()))
        })?;
        let mut request = self.get(href, accept);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        self.get_items(request, rel)
    }

    fn find_project(&self, name: &str) -> Result<Option<Project>> {
        let request = self
            .get(&format!("{}/api/projects", self.base_url), JSON_MEDIA_TYPE)
            .query(&[("q", format!("name:{name}"))]);
        let projects: Vec<Project> = self.get_items(request, "searching projects")?;
        Ok(projects.into_iter().find(|p| p.name == name))
    }

    fn find_version(&self, project: &Project, version: &str) -> Result<Option<ProjectVersion>> {
        let href = project
            .meta
            .link("versions")
            .ok_or_else(|| ExportError::missing_resource("project versions", &project.name))?;
        let request = self
            .get(href, JSON_MEDIA_TYPE)
            .query(&[("q", format!("versionName:{version}"))]);
        let versions: Vec<ProjectVersion> = self.get_items(request, "searching versions")?;
        Ok(versions.into_iter().find(|v| v.version_name == version))
    }

    fn version_href<'a>(&self, version: &'a ResolvedVersion) -> Result<&'a str> {
        version
            .version
            .meta
            .href
            .as_deref()
            .ok_or_else(|| ExportError::missing_resource("project version", version.label()))
    }

    /// Resolve the children of one hierarchical BOM entry, recursively.
    fn children_of(&self, component: &ComponentVersion) -> Result<Vec<BomNode>> {
        let Some(href) = component.link("children") else {
            return Ok(Vec::new());
        };
        let request = self
            .get(href, BOM_MEDIA_TYPE)
            .query(&[("limit", BOM_PAGE_LIMIT)]);
        let children: Vec<ComponentVersion> = self.get_items(request, "hierarchical children")?;
        children
            .into_iter()
            .map(|child| {
                let grandchildren = self.children_of(&child)?;
                Ok(BomNode::new(child).with_children(grandchildren))
            })
            .collect()
    }
}

impl ProjectResolver for HubClient {
    fn resolve(&self, project: &str, version: &str) -> Result<ResolvedVersion> {
        let Some(found) = self.find_project(project)? else {
            return Err(ExportError::project_not_found(project, self.project_names()?));
        };
        let found_version = self
            .find_version(&found, version)?
            .ok_or_else(|| ExportError::version_not_found(version))?;
        Ok(ResolvedVersion {
            project: found,
            version: found_version,
        })
    }

    fn project_names(&self) -> Result<Vec<String>> {
        let request = self
            .get(&format!("{}/api/projects", self.base_url), JSON_MEDIA_TYPE)
            .query(&[("limit", BOM_PAGE_LIMIT)]);
        let projects: Vec<Project> = self.get_items(request, "listing projects")?;
        Ok(projects.into_iter().map(|p| p.name).collect())
    }
}

impl BomSource for HubClient {
    fn bom_components(&self, version: &ResolvedVersion) -> Result<Vec<ComponentVersion>> {
        let url = format!("{}/components", self.version_href(version)?);
        let request = self
            .get(&url, BOM_MEDIA_TYPE)
            .query(&[("limit", BOM_PAGE_LIMIT)]);
        self.get_items(request, "BOM components")
    }

    fn hierarchical_bom(&self, version: &ResolvedVersion) -> Result<Vec<BomNode>> {
        let url = format!("{}/hierarchical-components", self.version_href(version)?);
        let request = self
            .get(&url, BOM_MEDIA_TYPE)
            .query(&[("limit", BOM_PAGE_LIMIT)]);
        let roots: Vec<ComponentVersion> = self.get_items(request, "hierarchical BOM")?;
        roots
            .into_iter()
            .map(|root| {
                let children = self.children_of(&root)?;
                Ok(BomNode::new(root).with_children(children))
            })
            .collect()
    }

    fn copyrights(&self, origin: &Origin) -> Result<Vec<CopyrightEntry>> {
        self.linked_items(
            origin.copyrights_url(),
            "component-origin-copyrights",
            COPYRIGHT_MEDIA_TYPE,
            Some(COPYRIGHT_PAGE_LIMIT),
        )
    }

    fn comments(&self, component: &ComponentVersion) -> Result<Vec<ReviewComment>> {
        self.linked_items(component.link("comments"), "comments", JSON_MEDIA_TYPE, None)
    }

    fn matched_files(&self, component: &ComponentVersion) -> Result<Vec<MatchedFile>> {
        self.linked_items(
            component.link("matched-files"),
            "matched-files",
            BOM_MEDIA_TYPE,
            None,
        )
    }

    fn custom_fields(&self, component: &ComponentVersion) -> Result<Vec<CustomField>> {
        self.linked_items(
            component.link("custom-fields"),
            "custom-fields",
            JSON_MEDIA_TYPE,
            None,
        )
    }

    fn component_details(&self, component: &ComponentVersion) -> Result<ComponentDetails> {
        let href = component.component.as_deref().ok_or_else(|| {
            ExportError::enrichment(
                "component",
                EnrichmentErrorKind::MissingLink("component".to_string()),
            )
        })?;
        self.get_json(self.get(href, JSON_MEDIA_TYPE), "component details")
    }

    fn license_text(&self, license_key: &str) -> Result<String> {
        let url = format!("{}/api/licenses/{license_key}/text", self.base_url);
        self.send(self.get(&url, "text/plain"), "license text")?
            .text()
            .map_err(|e| network_error("license text", &e))
    }
}

//! VictoriaMetrics Cloud client
//!
//! Holds the API key, base URL and transport, and exposes one typed method
//! per API operation. Methods validate their input before dispatching.

use super::http::{decode_json, decode_text, discard, RequestBody};
use crate::error::{Error, Result};
use crate::model::{
    AccessToken, AccessTokenCreateRequest, CloudProviderInfo, DeploymentCreationRequest,
    DeploymentInfo, DeploymentSummary, DeploymentUpdateRequest, RegionInfo, TierInfo,
};
use crate::validation::{
    check_deployment_id, check_non_empty, check_tenant_id, validate_common_deployment_params,
    validate_creation_request, DeploymentParams,
};
use reqwest::Method;
use std::fmt;
use url::Url;

/// Default base URL of the VictoriaMetrics Cloud API
pub const DEFAULT_BASE_URL: &str = "https://api.victoriametrics.cloud";

const USER_AGENT: &str = concat!("vmcloud/", env!("CARGO_PKG_VERSION"));

const API_V1: [&str; 2] = ["api", "v1"];
const DEPLOYMENTS: &str = "deployments";

/// Client for the VictoriaMetrics Cloud API
///
/// Read-only after construction; clones share the underlying connection pool
/// and may be used from many tasks at once.
#[derive(Clone)]
pub struct Client {
    pub(super) http: reqwest::Client,
    pub(super) api_key: String,
    pub(super) base_url: String,
    pub(super) parsed_url: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Builder for [`Client`]
///
/// Overrides are applied in call order, so the last call for a field wins.
pub struct ClientBuilder {
    api_key: String,
    http: Option<reqwest::Client>,
    base_url: String,
}

impl ClientBuilder {
    /// Use a custom HTTP client (timeouts, proxies, test transports)
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Use a base URL other than [`DEFAULT_BASE_URL`]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::invalid_argument("API key cannot be empty"));
        }

        let parsed_url = Url::parse(&self.base_url).map_err(|e| Error::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: self.base_url,
                reason: "cannot be a base URL".to_string(),
            });
        }

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .map_err(|source| Error::Transport {
                    context: "failed to create HTTP client",
                    source,
                })?,
        };

        tracing::debug!("VictoriaMetrics Cloud client for {}", self.base_url);

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url: self.base_url,
            parsed_url,
        })
    }
}

impl Client {
    /// Create a client with the default base URL and transport
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            http: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// The base URL as configured
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Cloud providers available for deployments
    pub async fn list_cloud_providers(&self) -> Result<Vec<CloudProviderInfo>> {
        self.execute(Method::GET, None, &api_path(&["cloud_providers"]), decode_json)
            .await
    }

    /// Regions available for deployments
    pub async fn list_regions(&self) -> Result<Vec<RegionInfo>> {
        self.execute(Method::GET, None, &api_path(&["regions"]), decode_json)
            .await
    }

    /// Instance tiers available for deployments
    pub async fn list_tiers(&self) -> Result<Vec<TierInfo>> {
        self.execute(Method::GET, None, &api_path(&["tiers"]), decode_json)
            .await
    }

    // =========================================================================
    // Deployments
    // =========================================================================

    /// Deployments of the account owning the API key
    pub async fn list_deployments(&self) -> Result<Vec<DeploymentSummary>> {
        self.execute(Method::GET, None, &api_path(&[DEPLOYMENTS]), decode_json)
            .await
    }

    pub async fn get_deployment_details(&self, deployment_id: &str) -> Result<DeploymentInfo> {
        check_deployment_id(deployment_id)?;
        self.execute(
            Method::GET,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id]),
            decode_json,
        )
        .await
    }

    pub async fn create_deployment(
        &self,
        deployment: &DeploymentCreationRequest,
    ) -> Result<DeploymentInfo> {
        validate_creation_request(deployment)?;
        let body = RequestBody::json(deployment, "deployment create request")?;
        self.execute(Method::POST, Some(body), &api_path(&[DEPLOYMENTS]), decode_json)
            .await
    }

    pub async fn update_deployment(
        &self,
        deployment_id: &str,
        deployment: &DeploymentUpdateRequest,
    ) -> Result<DeploymentInfo> {
        check_deployment_id(deployment_id)?;
        validate_common_deployment_params(&DeploymentParams::from(deployment))?;
        let body = RequestBody::json(deployment, "deployment update request")?;
        self.execute(
            Method::PUT,
            Some(body),
            &api_path(&[DEPLOYMENTS, deployment_id]),
            decode_json,
        )
        .await
    }

    pub async fn delete_deployment(&self, deployment_id: &str) -> Result<()> {
        check_deployment_id(deployment_id)?;
        self.execute(
            Method::DELETE,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id]),
            discard,
        )
        .await
        .map_err(|e| e.with_context(format!("failed to delete deployment {:?}", deployment_id)))
    }

    // =========================================================================
    // Access tokens
    // =========================================================================

    pub async fn list_deployment_access_tokens(
        &self,
        deployment_id: &str,
    ) -> Result<Vec<AccessToken>> {
        check_deployment_id(deployment_id)?;
        self.execute(
            Method::GET,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "access_tokens"]),
            decode_json,
        )
        .await
    }

    /// Create an access token; the returned token carries the full secret
    pub async fn create_deployment_access_token(
        &self,
        deployment_id: &str,
        token: &AccessTokenCreateRequest,
    ) -> Result<AccessToken> {
        check_deployment_id(deployment_id)?;
        check_non_empty(&token.description, "access token description")?;
        check_tenant_id(&token.tenant_id)?;
        let body = RequestBody::json(token, "access token creation request")?;
        self.execute(
            Method::POST,
            Some(body),
            &api_path(&[DEPLOYMENTS, deployment_id, "access_tokens"]),
            decode_json,
        )
        .await
    }

    /// Fetch a token with its full secret value
    pub async fn reveal_deployment_access_token(
        &self,
        deployment_id: &str,
        token_id: &str,
    ) -> Result<AccessToken> {
        check_deployment_id(deployment_id)?;
        check_non_empty(token_id, "token ID")?;
        self.execute(
            Method::GET,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "access_tokens", token_id]),
            decode_json,
        )
        .await
    }

    pub async fn delete_deployment_access_token(
        &self,
        deployment_id: &str,
        token_id: &str,
    ) -> Result<()> {
        check_deployment_id(deployment_id)?;
        check_non_empty(token_id, "token ID")?;
        self.execute(
            Method::DELETE,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "access_tokens", token_id]),
            discard,
        )
        .await
        .map_err(|e| {
            e.with_context(format!(
                "failed to delete access token {:?} for deployment {:?}",
                token_id, deployment_id
            ))
        })
    }

    // =========================================================================
    // Alerting and recording rule files
    // =========================================================================

    pub async fn list_deployment_rule_file_names(&self, deployment_id: &str) -> Result<Vec<String>> {
        check_deployment_id(deployment_id)?;
        self.execute(
            Method::GET,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "rule-sets", "files"]),
            decode_json,
        )
        .await
    }

    /// Raw content of a rule file, returned verbatim
    pub async fn get_deployment_rule_file_content(
        &self,
        deployment_id: &str,
        file_name: &str,
    ) -> Result<String> {
        check_deployment_id(deployment_id)?;
        check_non_empty(file_name, "rule file name")?;
        self.execute(
            Method::GET,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "rule-sets", "files", file_name]),
            decode_text,
        )
        .await
    }

    pub async fn create_deployment_rule_file_content(
        &self,
        deployment_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<()> {
        self.put_rule_file(deployment_id, file_name, content)
            .await
            .map_err(|e| {
                e.with_context(format!(
                    "failed to create rule file {:?} for deployment {:?}",
                    file_name, deployment_id
                ))
            })
    }

    pub async fn update_deployment_rule_file_content(
        &self,
        deployment_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<()> {
        self.put_rule_file(deployment_id, file_name, content)
            .await
            .map_err(|e| {
                e.with_context(format!(
                    "failed to update rule file {:?} for deployment {:?}",
                    file_name, deployment_id
                ))
            })
    }

    pub async fn delete_deployment_rule_file(
        &self,
        deployment_id: &str,
        file_name: &str,
    ) -> Result<()> {
        check_deployment_id(deployment_id)?;
        check_non_empty(file_name, "rule file name")?;
        self.execute(
            Method::DELETE,
            None,
            &api_path(&[DEPLOYMENTS, deployment_id, "rule-sets", "files", file_name]),
            discard,
        )
        .await
        .map_err(|e| {
            e.with_context(format!(
                "failed to delete rule file {:?} for deployment {:?}",
                file_name, deployment_id
            ))
        })
    }

    /// Create and update share one upsert endpoint
    async fn put_rule_file(&self, deployment_id: &str, file_name: &str, content: &str) -> Result<()> {
        check_deployment_id(deployment_id)?;
        check_non_empty(file_name, "rule file name")?;
        self.execute(
            Method::PUT,
            Some(RequestBody::Text(content.to_string())),
            &api_path(&[DEPLOYMENTS, deployment_id, "rule-sets", "files", file_name]),
            discard,
        )
        .await
    }
}

/// Path segments under `api/v1`
fn api_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    let mut path = Vec::with_capacity(API_V1.len() + rest.len());
    path.extend_from_slice(&API_V1);
    path.extend_from_slice(rest);
    path
}

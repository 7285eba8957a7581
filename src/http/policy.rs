use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};

use crate::args::DEFAULT_USER_AGENT;
use crate::config::TargetSpec;
use crate::error::{AppError, AppResult, HttpError};

/// Connection handling rules for measured requests.
///
/// Keep-alive is always defeated: with a pooled connection only the first
/// request pays the connection-setup cost, which leaves the latency
/// distribution bimodal and misleadingly low. Every request opens and closes
/// its own connection; the small constant overhead is the price of a
/// comparable sample.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionPolicy {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ConnectionPolicy {
    /// Build a client that follows this policy.
    ///
    /// # Errors
    ///
    /// Returns an error when TLS/client setup fails or the proxy URL is
    /// invalid.
    pub fn build_client(&self, proxy: Option<(&str, &str)>) -> AppResult<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let mut builder = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));

        if let Some((target, proxy_url)) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|err| {
                AppError::http(HttpError::InvalidProxy {
                    url: proxy_url.to_owned(),
                    target: target.to_owned(),
                    source: err,
                })
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClient { source: err }))
    }
}

/// Clients for a run: one shared default client plus one per proxied target.
/// Connections themselves are never shared across work items; the policy
/// above forces a fresh connection per request even through a shared client.
#[derive(Debug)]
pub struct ClientSet {
    default: Client,
    by_target: HashMap<Arc<str>, Client>,
}

impl ClientSet {
    /// Build the client set for the selected targets.
    ///
    /// # Errors
    ///
    /// Fails before any work starts when any client cannot be built.
    pub fn build(policy: ConnectionPolicy, targets: &[Arc<TargetSpec>]) -> AppResult<Self> {
        let default = policy.build_client(None)?;
        let mut by_target = HashMap::new();
        for target in targets {
            if let Some(proxy_url) = target.proxy.as_deref() {
                let client = policy.build_client(Some((target.id.as_ref(), proxy_url)))?;
                by_target.insert(target.id.clone(), client);
            }
        }
        Ok(Self { default, by_target })
    }

    #[must_use]
    pub fn client_for(&self, target_id: &str) -> &Client {
        self.by_target.get(target_id).unwrap_or(&self.default)
    }
}

use std::time::Duration;

use crate::domain::entities::record::JsonRecord;
use crate::infra::config::settings::AppSettings;
use crate::infra::http::envelope::decode_records;
use crate::usecase::ports::fetcher::{FetchError, RecordSource};

const USER_AGENT: &str = concat!("contractorhub/", env!("CARGO_PKG_VERSION"));

/// `RecordSource` over the backend's REST API. No caching: every call is a
/// fresh GET.
pub struct HttpRecordSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(request_timeout)
            .timeout_write(request_timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(
            settings.api_base_url.clone(),
            Duration::from_millis(settings.connect_timeout_ms.max(1)),
            Duration::from_millis(settings.request_timeout_ms.max(1)),
        )
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch(&self, endpoint: &str, auth_token: Option<&str>) -> Result<Vec<JsonRecord>, FetchError> {
        let url = self.url_for(endpoint);
        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(token) = auth_token.filter(|token| !token.is_empty()) {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        log::debug!("GET {url}");
        let body = match request.call() {
            Ok(response) => response
                .into_string()
                .map_err(|err| FetchError::Network(format!("failed to read response body: {err}")))?,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                log::warn!("GET {url} returned {status}");
                return Err(FetchError::Status { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                log::warn!("GET {url} failed: {transport}");
                return Err(FetchError::Network(transport.to_string()));
            }
        };

        match decode_records(&body) {
            Ok(records) => Ok(records),
            Err(err) => {
                log::warn!("GET {url}: {err}; showing an empty result");
                Ok(Vec::new())
            }
        }
    }
}

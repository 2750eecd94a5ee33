use std::sync::Arc;

use crate::domain::entities::record::JsonRecord;
use crate::domain::entities::view_config::ViewConfig;
use crate::platform::desktop::blocking::run_blocking;
use crate::usecase::ports::fetcher::{FetchError, RecordSource};
use crate::usecase::services::report_session::ReportSession;
use crate::usecase::services::request_guard::{FetchTicket, RequestGuard};

pub struct FetchService {
    source: Arc<dyn RecordSource>,
    auth_token: Option<String>,
}

impl FetchService {
    pub fn new(source: Arc<dyn RecordSource>, auth_token: Option<String>) -> Self {
        Self { source, auth_token }
    }

    pub fn fetch(&self, config: &ViewConfig) -> Result<Vec<JsonRecord>, FetchError> {
        self.source.fetch(&config.endpoint, self.auth_token.as_deref())
    }

    /// Fetches `config` on a blocking worker. Returns `None` when `ticket` was
    /// superseded or its view closed before the response could be applied.
    pub async fn fetch_in_background(
        self: Arc<Self>,
        config: ViewConfig,
        guard: RequestGuard,
        ticket: FetchTicket,
    ) -> Option<Result<Vec<JsonRecord>, FetchError>> {
        let worker_guard = guard.clone();
        let result = run_blocking(move || {
            worker_guard
                .is_current(ticket)
                .then(|| self.fetch(&config))
        })
        .await;

        if !guard.is_current(ticket) {
            log::debug!("dropping response for superseded request {}", ticket.generation());
            return None;
        }
        match result {
            Ok(result) => result,
            Err(err) => Some(Err(FetchError::Network(format!("{err:#}")))),
        }
    }

    /// Re-fetches the session's view. Returns whether the response was applied.
    pub fn refresh(&self, session: &mut ReportSession<JsonRecord>) -> bool {
        session.load(self.source.as_ref(), self.auth_token.as_deref())
    }
}

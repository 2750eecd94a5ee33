use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::record::JsonRecord;
use crate::domain::entities::view_config::ViewConfig;
use crate::usecase::services::report_session::ReportSession;

pub struct AppState {
    pub views: Signal<Vec<ViewConfig>>,
    pub selected_view: Signal<String>,
    pub session: Signal<ReportSession<JsonRecord>>,
    pub search_input: Signal<String>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    /// Opens the first view, or transfers when `views` is empty.
    pub fn new(views: Vec<ViewConfig>) -> Self {
        let first = views
            .first()
            .cloned()
            .unwrap_or_else(ViewConfig::transfers);
        let selected = first.key.clone();
        Self {
            views: use_signal(move || views),
            selected_view: use_signal(move || selected),
            session: use_signal(move || ReportSession::new(first)),
            search_input: use_signal(String::new),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}

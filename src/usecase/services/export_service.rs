use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::entities::record::ReportRecord;
use crate::infra::export::csv::export_csv;
use crate::usecase::services::report_session::ReportSession;

pub struct ExportService {
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    /// Writes every filtered and sorted record of the session, not just the
    /// visible page, to `<view>_export.csv`. Returns the written path.
    pub fn export_session<R: ReportRecord + Clone>(&self, session: &ReportSession<R>) -> Result<PathBuf> {
        let config = session.config();
        let rows = session.export_rows();
        let contents = export_csv(&rows, &config.export_columns)?;

        std::fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("failed to create {}", self.export_dir.display()))?;
        let path = self.export_dir.join(config.export_file_name());
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;

        log::info!("exported {} {} rows to {}", rows.len(), config.key, path.display());
        Ok(path)
    }
}

use anyhow::{Context, Result};

/// Runs network or file work on tokio's blocking pool so the UI thread keeps
/// rendering while it waits.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("background task failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build")
    }

    #[test]
    fn work_runs_off_the_calling_thread() {
        let caller = std::thread::current().id();
        let worker = runtime()
            .block_on(run_blocking(|| std::thread::current().id()))
            .expect("task should finish");
        assert_ne!(caller, worker);
    }

    #[test]
    fn panicking_work_becomes_an_error() {
        let result = runtime().block_on(run_blocking(|| -> u32 { panic!("worker failed") }));
        assert!(result.is_err());
    }
}

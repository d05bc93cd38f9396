//! Batch loading
//!
//! Files are independent: each one is read on the async runtime and parsed
//! on the blocking pool, and each gets its own result.

use crate::load_str;
use anyhow::Context;
use gcodetools_core::Config;
use gcodetools_parser::Gcode;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load many files concurrently
///
/// Results come back in the order of `paths`. One failing file does not
/// affect the others.
pub async fn load_files<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
    config: Config,
) -> Vec<anyhow::Result<Gcode>> {
    let config = Arc::new(config);
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref().to_path_buf();
            let config = Arc::clone(&config);
            tokio::spawn(load_one(path, config))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::Error::new(e).context("Batch worker failed")),
        });
    }
    tracing::debug!(
        "Batch loaded {} files ({} failed)",
        results.len(),
        results.iter().filter(|r| r.is_err()).count()
    );
    results
}

async fn load_one(path: PathBuf, config: Arc<Config>) -> anyhow::Result<Gcode> {
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let gcode = tokio::task::spawn_blocking(move || load_str(&text, &config))
        .await
        .context("Parser task failed")?
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Loaded {} ({} blocks)", path.display(), gcode.len());
    Ok(gcode)
}

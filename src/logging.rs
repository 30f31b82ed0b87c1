use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `QUIZR_LOG=quizr=debug`.
pub const LOG_ENV: &str = "QUIZR_LOG";

/// Route tracing output to `path`. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr. Defaults to `info`.
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // An already installed subscriber wins
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("quizr.log");
        init(&path).unwrap();
        assert!(path.exists());

        // a second call is harmless
        init(&path).unwrap();
    }
}

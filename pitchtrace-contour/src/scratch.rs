//! Per-call scratch artifact for the estimator's output file

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

const OUTPUT_FILE_NAME: &str = "estimate.txt";

/// A uniquely named private directory holding one estimator output file.
///
/// The directory is removed by [`ScratchArtifact::release`] or, failing
/// that, on drop. Removal failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct ScratchArtifact {
    dir: Option<TempDir>,
    output_path: PathBuf,
}

impl ScratchArtifact {
    /// Create a fresh `pitchtrace-XXXXXX` directory under `root`.
    pub fn allocate(root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pitchtrace-")
            .tempdir_in(root)?;
        let output_path = dir.path().join(OUTPUT_FILE_NAME);
        debug!("Allocated scratch artifact {}", dir.path().display());

        Ok(Self {
            dir: Some(dir),
            output_path,
        })
    }

    /// Where the estimator should write its output.
    ///
    /// The file does not exist until the estimator creates it.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Delete the artifact now.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("Removed scratch artifact {}", path.display()),
                Err(e) => warn!("Failed to remove scratch artifact {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for ScratchArtifact {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_release_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchArtifact::allocate(root.path()).unwrap();
        let output = scratch.output_path().to_path_buf();

        std::fs::write(&output, "0.01 100\n").unwrap();
        assert!(output.exists());

        scratch.release();
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let output = {
            let scratch = ScratchArtifact::allocate(root.path()).unwrap();
            std::fs::write(scratch.output_path(), "").unwrap();
            scratch.output_path().to_path_buf()
        };
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_names_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = ScratchArtifact::allocate(root.path()).unwrap();
        let b = ScratchArtifact::allocate(root.path()).unwrap();
        assert_ne!(a.output_path(), b.output_path());
        assert!(a
            .output_path()
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("pitchtrace-")));
    }

    #[test]
    fn test_release_tolerates_vanished_directory() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchArtifact::allocate(root.path()).unwrap();
        let dir = scratch.output_path().parent().unwrap().to_path_buf();
        std::fs::remove_dir_all(&dir).unwrap();

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        // Logged, not raised
        tracing::subscriber::with_default(subscriber, || scratch.release());

        let logs = logs.contents();
        assert!(logs.contains("WARN"), "no warning logged: {logs}");
        assert!(logs.contains("Failed to remove scratch artifact"));
        assert!(logs.contains(&dir.display().to_string()));
    }
}

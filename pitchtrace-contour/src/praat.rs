//! Praat as the pitch estimator
//!
//! Praat is run once per call as
//!
//! ```text
//! praat --run extract_pitch.praat <audio> <output> \
//!     <time_step> <pitch_floor> <max_candidates> <very_accurate> \
//!     <silence_threshold> <voicing_threshold> <octave_cost> \
//!     <octave_jump_cost> <voiced_unvoiced_cost> <pitch_ceiling>
//! ```
//!
//! and writes one `time pitch` line per voiced frame to `<output>`, which
//! lives in a scratch artifact owned by the call.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use pitchtrace_params::ParameterSet;
use tracing::{debug, info, warn};

use crate::error::CollaboratorError;
use crate::estimate::SparseEstimate;
use crate::estimator::{EstimateRequest, PitchEstimator};
use crate::scratch::ScratchArtifact;

/// Praat executable looked up on `PATH`
pub const DEFAULT_PRAAT_BINARY: &str = "praat";

/// Upper bound on a single Praat run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Path of the extraction script shipped with this crate.
pub fn bundled_script_path() -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/praat/extract_pitch.praat"
    ))
}

/// How to launch Praat
#[derive(Debug, Clone, PartialEq)]
pub struct PraatConfig {
    /// Praat executable
    pub praat_binary: PathBuf,

    /// Arguments placed before the script path (default: `--run`)
    pub launch_args: Vec<String>,

    /// Extraction script
    pub script_path: PathBuf,

    /// Kill Praat if it runs longer than this
    pub timeout: Duration,

    /// Directory for scratch artifacts (None = platform scratch root)
    pub scratch_root: Option<PathBuf>,
}

impl Default for PraatConfig {
    fn default() -> Self {
        Self {
            praat_binary: PathBuf::from(DEFAULT_PRAAT_BINARY),
            launch_args: vec!["--run".to_string()],
            script_path: bundled_script_path(),
            timeout: DEFAULT_TIMEOUT,
            scratch_root: None,
        }
    }
}

impl PraatConfig {
    /// Set the Praat executable
    pub fn binary<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.praat_binary = path.into();
        self
    }

    /// Replace the arguments placed before the script path
    pub fn launch_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the extraction script
    pub fn script<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.script_path = path.into();
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the scratch root directory
    pub fn scratch_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.scratch_root = Some(path.into());
        self
    }
}

/// The ten positional parameters, formatted in the order the script expects.
pub fn estimator_args(params: &ParameterSet) -> Vec<String> {
    vec![
        format!("{:.10}", params.time_step),
        format!("{:.6}", params.pitch_floor),
        params.max_candidates.to_string(),
        u8::from(params.very_accurate).to_string(),
        format!("{:.10}", params.silence_threshold),
        format!("{:.10}", params.voicing_threshold),
        format!("{:.10}", params.octave_cost),
        format!("{:.10}", params.octave_jump_cost),
        format!("{:.10}", params.voiced_unvoiced_cost),
        format!("{:.6}", params.pitch_ceiling),
    ]
}

/// Runs Praat in a subprocess, one scratch artifact per call.
#[derive(Debug, Clone, Default)]
pub struct PraatEstimator {
    config: PraatConfig,
}

impl PraatEstimator {
    pub fn new(config: PraatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PraatConfig {
        &self.config
    }

    fn scratch_root(&self) -> Result<PathBuf, CollaboratorError> {
        match &self.config.scratch_root {
            Some(root) => Ok(root.clone()),
            None => pitchtrace_paths::scratch_root()
                .map_err(|e| CollaboratorError::Scratch(std::io::Error::other(format!("{:#}", e)))),
        }
    }

    fn command(&self, request: &EstimateRequest<'_>, output_path: &Path) -> Command {
        let mut command = Command::new(&self.config.praat_binary);
        command
            .args(&self.config.launch_args)
            .arg(&self.config.script_path)
            .arg(request.audio_path)
            .arg(output_path)
            .args(estimator_args(request.parameters))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }

    /// Run Praat to completion, writing into `output_path`.
    fn run(&self, request: &EstimateRequest<'_>, output_path: &Path) -> Result<(), CollaboratorError> {
        let program = self.config.praat_binary.display().to_string();
        let mut command = self.command(request, output_path);
        debug!("Running pitch estimator: {:?}", command);

        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let mut child = command.spawn().map_err(|source| CollaboratorError::Launch {
            program: program.clone(),
            source,
        })?;

        // Drained concurrently; a full stderr pipe would stall the estimator
        let stderr_rx = child.stderr.take().map(|mut pipe| {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                let _ = tx.send(text);
            });
            rx
        });

        let status = wait_until(&mut child, deadline).map_err(|e| match e {
            WaitError::TimedOut => {
                warn!(
                    "Pitch estimator exceeded {:?} on {}, killed",
                    self.config.timeout,
                    request.audio_path.display()
                );
                CollaboratorError::TimedOut {
                    timeout: self.config.timeout,
                }
            }
            WaitError::Io(source) => CollaboratorError::Launch {
                program: program.clone(),
                source,
            },
        })?;

        // A process left behind by the estimator may keep stderr open past
        // its exit; never wait for it beyond the deadline
        let stderr = match stderr_rx {
            Some(rx) => rx
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .unwrap_or_else(|_| {
                    debug!("Pitch estimator stderr still open at deadline, not waiting");
                    String::new()
                }),
            None => String::new(),
        };

        info!(
            "Pitch estimator finished in {:.2?} ({})",
            started.elapsed(),
            status
        );

        if !status.success() {
            return Err(CollaboratorError::Exited {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            debug!("Pitch estimator stderr: {}", stderr.trim());
        }

        Ok(())
    }
}

impl PitchEstimator for PraatEstimator {
    fn estimate(&self, request: &EstimateRequest<'_>) -> Result<SparseEstimate, CollaboratorError> {
        let root = self.scratch_root()?;
        let scratch = ScratchArtifact::allocate(&root).map_err(CollaboratorError::Scratch)?;

        let outcome = self
            .run(request, scratch.output_path())
            .and_then(|()| SparseEstimate::read(scratch.output_path()));

        scratch.release();
        outcome
    }
}

enum WaitError {
    TimedOut,
    Io(std::io::Error),
}

/// Poll `child` until it exits or `deadline` passes. Past the deadline the
/// child is killed and reaped.
fn wait_until(child: &mut Child, deadline: Instant) -> Result<ExitStatus, WaitError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(WaitError::TimedOut);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(WaitError::Io(e));
            }
        }
    }
}

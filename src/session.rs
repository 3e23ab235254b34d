//! One guest session: the frames captured after a trigger and the
//! composites rendered from them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::composite::LayoutKind;
use crate::controller::BoothState;
use crate::error::{BoothError, Result};

/// Timestamp format of session ids.
pub const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Session identifier, the local start time as `YYYYMMDD_HHMMSS`.
///
/// Ids sort lexicographically in start order, and every output file of a
/// session is prefixed with its id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self(at.format(ID_FORMAT).to_string())
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now().naive_local())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<output>/<id>_p<pose>.jpg`
    pub fn frame_path(&self, output: &Path, pose: u8) -> PathBuf {
        output.join(format!("{}_p{pose}.jpg", self.0))
    }

    /// `<output>/<id>_<layout>.jpg`
    pub fn composite_path(&self, output: &Path, layout: LayoutKind) -> PathBuf {
        output.join(format!("{}_{layout}.jpg", self.0))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s, ID_FORMAT)
            .map(|at| Self::from_datetime(&at))
            .map_err(|e| BoothError::Other(format!("invalid session id '{s}': {e}")))
    }
}

impl TryFrom<String> for SessionId {
    type Error = BoothError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// A captured still.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// 1-based shot number.
    pub pose: u8,
    pub path: PathBuf,
}

/// Session in progress.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    started: DateTime<Local>,
    output_dir: PathBuf,
    frames: Vec<Frame>,
    composites: Vec<PathBuf>,
    state: BoothState,
}

impl Session {
    /// Start a session now, writing into `output_dir`.
    pub fn start(output_dir: impl Into<PathBuf>) -> Self {
        let started = Local::now();
        Self::with_id(
            SessionId::from_datetime(&started.naive_local()),
            started,
            output_dir,
        )
    }

    pub fn with_id(id: SessionId, started: DateTime<Local>, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        debug!(%id, output = %output_dir.display(), "Session started");
        Self {
            id,
            started,
            output_dir,
            frames: Vec::new(),
            composites: Vec::new(),
            state: BoothState::Countdown(1),
        }
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    pub const fn started(&self) -> DateTime<Local> {
        self.started
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn composites(&self) -> &[PathBuf] {
        &self.composites
    }

    pub const fn state(&self) -> BoothState {
        self.state
    }

    pub fn set_state(&mut self, state: BoothState) {
        trace!(id = %self.id, from = %self.state, to = %state, "Session state");
        self.state = state;
    }

    /// Where shot `pose` is written.
    pub fn frame_path(&self, pose: u8) -> PathBuf {
        self.id.frame_path(&self.output_dir, pose)
    }

    /// Where the composite for `layout` is written.
    pub fn composite_path(&self, layout: LayoutKind) -> PathBuf {
        self.id.composite_path(&self.output_dir, layout)
    }

    pub fn record_frame(&mut self, frame: Frame) {
        trace!(id = %self.id, pose = frame.pose, "Frame recorded");
        self.frames.push(frame);
    }

    pub fn record_composite(&mut self, path: PathBuf) {
        trace!(id = %self.id, path = %path.display(), "Composite recorded");
        self.composites.push(path);
    }

    /// Frame paths in shot order.
    pub fn frame_paths(&self) -> Vec<PathBuf> {
        self.frames.iter().map(|f| f.path.clone()).collect()
    }

    /// Serializable record of the finished session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            started: self.started,
            frames: self.frame_paths(),
            composites: self.composites.clone(),
        }
    }
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub started: DateTime<Local>,
    pub frames: Vec<PathBuf>,
    pub composites: Vec<PathBuf>,
}

//! The booth state machine.
//!
//! ```text
//!  IntroBlink --snap--> Countdown(1) -> Capturing(1) -> Countdown(2) -> ...
//!      ^                                                    |
//!      |                                        Capturing(shot_count)
//!      |                                                    v
//!      +------------------ Review <------------------ Processing
//!
//!  IntroBlink --exit--> Exit        Review --single pass--> Exit
//! ```
//!
//! Everything runs on the calling thread. The only suspension points are
//! clock sleeps and bounded trigger polls, both of which end early with
//! `Interrupted` once the operator presses Ctrl-C.

use std::fmt;
use std::fs;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::capture::CaptureSequencer;
use crate::composite::CompositeRenderer;
use crate::config::{BoothConfig, ReviewMode};
use crate::device::DeviceContext;
use crate::error::{BoothError, Result, ResultExt};
use crate::input::InputMonitor;
use crate::overlay::{OverlayHandle, OverlayManager, Screen, ScreenTable};
use crate::session::{Session, SessionSummary};

/// Where the booth is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "pose", rename_all = "snake_case")]
pub enum BoothState {
    /// Idle, intro screen blinking, waiting for a trigger.
    IntroBlink,
    /// Pose prompt and countdown before shot `n`.
    Countdown(u8),
    /// Taking shot `n`.
    Capturing(u8),
    Processing,
    Review,
    Exit,
}

impl fmt::Display for BoothState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntroBlink => write!(f, "intro"),
            Self::Countdown(n) => write!(f, "countdown({n})"),
            Self::Capturing(n) => write!(f, "capturing({n})"),
            Self::Processing => write!(f, "processing"),
            Self::Review => write!(f, "review"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Idle-loop highlight toggle.
///
/// With period `k`, the `k`-th idle poll shows the highlight and the
/// `2k`-th hides it again, after which the count restarts.
#[derive(Debug, Clone, Copy)]
pub struct BlinkCadence {
    period: u32,
    count: u32,
}

impl BlinkCadence {
    pub const fn new(period: u32) -> Self {
        Self {
            period: if period == 0 { 1 } else { period },
            count: 0,
        }
    }

    /// Register one idle poll; returns the alpha to apply, if any.
    pub fn tick(&mut self) -> Option<u8> {
        self.count += 1;
        if self.count == self.period {
            Some(255)
        } else if self.count == 2 * self.period {
            self.count = 0;
            Some(0)
        } else {
            None
        }
    }
}

/// Intro screen: background plus the blinking highlight.
struct Intro {
    background: OverlayHandle,
    highlight: OverlayHandle,
}

/// Outcome of a booth run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub sessions: Vec<SessionSummary>,
    pub polls: u64,
    pub elapsed_secs: f64,
}

/// Drives the booth from trigger to review and back.
pub struct SessionController {
    config: BoothConfig,
    overlays: OverlayManager,
    input: InputMonitor,
    sequencer: CaptureSequencer,
    renderer: CompositeRenderer,
    state: BoothState,
    sessions: Vec<SessionSummary>,
}

impl SessionController {
    /// Controller for an effective (fast mode applied) configuration.
    pub fn new(config: BoothConfig) -> Self {
        let overlays = OverlayManager::new(ScreenTable::from_config(&config));
        let sequencer = CaptureSequencer::new(config.timing.countdown_from);
        let renderer = CompositeRenderer::from_config(&config);
        Self {
            config,
            overlays,
            input: InputMonitor::new(),
            sequencer,
            renderer,
            state: BoothState::IntroBlink,
            sessions: Vec::new(),
        }
    }

    /// Replace the composite renderer, e.g. with a seeded one.
    #[must_use]
    pub fn with_renderer(mut self, renderer: CompositeRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub const fn state(&self) -> BoothState {
        self.state
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    /// Whether the booth stops after its first session.
    pub const fn single_pass(&self) -> bool {
        self.config.fast
    }

    /// Run the booth until the exit trigger, or one session in fast mode.
    ///
    /// The caller owns `ctx` and releases it afterwards on every path.
    ///
    /// # Errors
    ///
    /// `Interrupted` on Ctrl-C; any asset, capture or device error aborts
    /// the run.
    pub fn run(&mut self, ctx: &mut DeviceContext) -> Result<RunSummary> {
        let started = Instant::now();
        let output = &self.config.paths.output;
        fs::create_dir_all(output)
            .with_context(|| format!("creating output directory {}", output.display()))?;

        ctx.start()?;
        info!(
            output = %output.display(),
            shots = self.config.capture.shot_count,
            mode = ?self.config.review.mode,
            "Booth ready"
        );

        let mut intro = None;
        let mut session = None;
        self.state = BoothState::IntroBlink;
        while self.state != BoothState::Exit {
            let next = self.step(ctx, &mut intro, &mut session)?;
            debug!(from = %self.state, to = %next, "Transition");
            if let Some(session) = session.as_mut() {
                session.set_state(next);
            }
            self.state = next;
        }

        Ok(RunSummary {
            sessions: self.sessions.clone(),
            polls: self.input.polls(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }

    fn step(
        &mut self,
        ctx: &mut DeviceContext,
        intro: &mut Option<Intro>,
        session: &mut Option<Session>,
    ) -> Result<BoothState> {
        match self.state {
            BoothState::IntroBlink => self.intro_blink(ctx, intro, session),
            BoothState::Countdown(pose) => {
                self.countdown(ctx, pose)?;
                Ok(BoothState::Capturing(pose))
            }
            BoothState::Capturing(pose) => {
                self.sequencer
                    .capture(ctx, &self.overlays, active(session)?, pose)?;
                if pose < self.config.capture.shot_count {
                    Ok(BoothState::Countdown(pose + 1))
                } else {
                    Ok(BoothState::Processing)
                }
            }
            BoothState::Processing => {
                self.process(ctx, active(session)?)?;
                Ok(BoothState::Review)
            }
            BoothState::Review => self.review(ctx, intro, session),
            BoothState::Exit => Ok(BoothState::Exit),
        }
    }

    fn show_intro(&mut self, ctx: &mut DeviceContext) -> Result<Intro> {
        let background = self.persistent(ctx, &Screen::IntroBackground)?;
        let highlight = self.persistent(ctx, &Screen::IntroHighlight)?;
        info!("Press the button to take a photo");
        Ok(Intro {
            background,
            highlight,
        })
    }

    fn remove_intro(&mut self, ctx: &mut DeviceContext, intro: Intro) -> Result<()> {
        self.overlays.remove(ctx, Some(intro.highlight))?;
        self.overlays.remove(ctx, Some(intro.background))
    }

    fn persistent(&mut self, ctx: &mut DeviceContext, screen: &Screen) -> Result<OverlayHandle> {
        self.overlays
            .show_screen(ctx, screen)?
            .ok_or_else(|| BoothError::Other(format!("screen {screen} is not persistent")))
    }

    fn intro_blink(
        &mut self,
        ctx: &mut DeviceContext,
        intro: &mut Option<Intro>,
        session: &mut Option<Session>,
    ) -> Result<BoothState> {
        let current = match intro.take() {
            Some(current) => current,
            None => self.show_intro(ctx)?,
        };
        let mut blink = BlinkCadence::new(self.config.trigger.blink_cadence);
        let timeout = self.config.trigger.poll_timeout();

        loop {
            match self.input.wait_for_trigger(ctx, timeout)? {
                None => {
                    if let Some(alpha) = blink.tick() {
                        self.overlays.set_alpha(ctx, &current.highlight, alpha)?;
                    }
                }
                Some(event) if event.is_exit() => {
                    info!("Exit trigger");
                    self.remove_intro(ctx, current)?;
                    return Ok(BoothState::Exit);
                }
                Some(_) => {
                    let started = Session::start(self.config.paths.output.clone());
                    info!(id = %started.id(), "Button pressed, session started");
                    *session = Some(started);
                    self.remove_intro(ctx, current)?;
                    return Ok(BoothState::Countdown(1));
                }
            }
        }
    }

    fn countdown(&mut self, ctx: &mut DeviceContext, pose: u8) -> Result<()> {
        self.overlays.show_screen(ctx, &Screen::Pose(pose))?;
        self.sequencer.countdown(ctx, &self.overlays, pose)
    }

    #[instrument(skip_all, fields(id = %session.id()))]
    fn process(&mut self, ctx: &mut DeviceContext, session: &mut Session) -> Result<()> {
        let backdrop = self.overlays.show_screen(ctx, &Screen::Backdrop)?;
        let processing = self.overlays.show_screen(ctx, &Screen::Processing)?;

        match self.config.review.mode {
            ReviewMode::Composite => {
                let started = Instant::now();
                let outputs = self
                    .renderer
                    .compose_session(session, &self.config.review.layouts)?;
                info!(
                    count = outputs.len(),
                    secs = started.elapsed().as_secs_f64(),
                    "Composites rendered"
                );
                self.overlays.remove(ctx, processing)?;
                for path in outputs {
                    self.overlays.show_screen(ctx, &Screen::Composite(path))?;
                }
            }
            ReviewMode::Playback => {
                self.overlays.remove(ctx, processing)?;
                let interval = self.config.timing.playback_interval();
                let mut previous = None;
                for path in session.frame_paths() {
                    let current = self.overlays.show_screen(ctx, &Screen::Frame(path))?;
                    // Next frame is up before the previous one goes.
                    self.overlays.remove(ctx, previous.take())?;
                    ctx.clock.sleep(interval)?;
                    previous = current;
                }
                self.overlays.remove(ctx, previous)?;
            }
        }

        self.overlays.remove(ctx, backdrop)
    }

    fn review(
        &mut self,
        ctx: &mut DeviceContext,
        intro: &mut Option<Intro>,
        session: &mut Option<Session>,
    ) -> Result<BoothState> {
        self.overlays.show_screen(ctx, &Screen::Done)?;

        if let Some(finished) = session.take() {
            info!(
                id = %finished.id(),
                frames = finished.frames().len(),
                composites = finished.composites().len(),
                "Session complete"
            );
            self.sessions.push(finished.summary());
        }

        if self.single_pass() {
            return Ok(BoothState::Exit);
        }
        *intro = Some(self.show_intro(ctx)?);
        self.input.discard_pending(ctx)?;
        Ok(BoothState::IntroBlink)
    }
}

fn active(session: &mut Option<Session>) -> Result<&mut Session> {
    session
        .as_mut()
        .ok_or_else(|| BoothError::Other("no active session".to_string()))
}

//! Live, animated chart view.
//!
//! A [`LiveView`] owns one render surface at the fixed render resolution, one
//! [`TransitionScheduler`] and one [`FrameLoop`]. Observer changes start a
//! transition and schedule a frame; each frame renders the interpolated state
//! and schedules the next one until the transition settles.

use std::sync::Arc;
use std::time::Duration;

use starfield::SkyData;
use tiny_skia::Pixmap;

use crate::error::Result;
use crate::frame_loop::{FrameLoop, FrameSource};
use crate::observer::ObserverState;
use crate::render::{new_surface, render_scene, RenderOptions, RENDER_RESOLUTION};
use crate::transition::{Frame, RequestOutcome, TransitionScheduler, TRANSITION_DURATION};

/// Largest on-screen edge length of the chart
pub const MAX_DISPLAY_SIZE: f64 = 800.0;

/// Share of the window height the chart may take
pub const DISPLAY_HEIGHT_FRACTION: f64 = 0.7;

/// On-screen edge length for a container width and window height.
///
/// Only scales the displayed image; the render surface keeps its fixed resolution.
pub fn display_size(container_width: f64, window_height: f64) -> f64 {
    container_width
        .min(window_height * DISPLAY_HEIGHT_FRACTION)
        .min(MAX_DISPLAY_SIZE)
}

/// An animated chart bound to one drawing surface.
pub struct LiveView {
    sky: Arc<SkyData>,
    surface: Pixmap,
    options: RenderOptions,
    scheduler: TransitionScheduler,
    frames: FrameLoop,
    last_frame: Option<Frame>,
    frames_rendered: u64,
    closed: bool,
}

impl LiveView {
    /// Create a view at the default resolution and transition length and draw
    /// the initial state.
    pub fn new(sky: Arc<SkyData>, initial: ObserverState, options: RenderOptions) -> Result<Self> {
        Self::with_settings(sky, initial, options, RENDER_RESOLUTION, TRANSITION_DURATION)
    }

    pub fn with_settings(
        sky: Arc<SkyData>,
        initial: ObserverState,
        options: RenderOptions,
        resolution: u32,
        transition: Duration,
    ) -> Result<Self> {
        let mut view = Self {
            sky,
            surface: new_surface(resolution)?,
            options,
            scheduler: TransitionScheduler::with_duration(initial, transition),
            frames: FrameLoop::new(),
            last_frame: None,
            frames_rendered: 0,
            closed: false,
        };
        view.redraw_settled()?;
        Ok(view)
    }

    fn redraw_settled(&mut self) -> Result<()> {
        let observer = *self.scheduler.settled();
        render_scene(&mut self.surface, &self.sky, &observer, &self.options)?;
        self.frames_rendered += 1;
        Ok(())
    }

    /// Point the view at a new observer state at clock reading `now`.
    ///
    /// A differing state starts a transition (superseding any in flight) and
    /// schedules a frame. Returning to the settled state mid-transition cancels
    /// the pending frame and redraws the settled chart.
    pub fn set_observer(&mut self, observer: ObserverState, now: Duration) -> Result<RequestOutcome> {
        if self.closed {
            return Ok(RequestOutcome::Unchanged);
        }
        let outcome = self.scheduler.request(observer, now);
        match outcome {
            RequestOutcome::Unchanged => {}
            RequestOutcome::Started | RequestOutcome::Superseded => {
                self.last_frame = None;
                self.frames.request_frame();
            }
            RequestOutcome::Reverted => {
                self.frames.cancel();
                self.last_frame = None;
                self.redraw_settled()?;
            }
        }
        Ok(outcome)
    }

    /// Change style options. An idle view redraws immediately; an animating
    /// view picks them up on its next frame.
    pub fn set_options(&mut self, options: RenderOptions) -> Result<()> {
        if options == self.options {
            return Ok(());
        }
        self.options = options;
        if !self.closed && !self.scheduler.is_animating() {
            self.redraw_settled()?;
        }
        Ok(())
    }

    /// Run the pending frame callback, if any, at clock reading `now`.
    ///
    /// Renders the interpolated state and schedules another frame while the
    /// transition is still running.
    pub fn on_frame(&mut self, now: Duration) -> Result<Option<Frame>> {
        if self.closed || self.frames.take_due().is_none() {
            return Ok(None);
        }

        let frame = self.scheduler.frame(now);
        render_scene(&mut self.surface, &self.sky, &frame.observer, &self.options)?;
        self.frames_rendered += 1;
        if !frame.finished {
            self.frames.request_frame();
        }
        self.last_frame = Some(frame);
        Ok(Some(frame))
    }

    /// Pump frames from `source` until no frame is pending or `max_frames` have run.
    ///
    /// Returns the number of frames rendered.
    pub fn run_until_idle<S: FrameSource>(&mut self, source: &mut S, max_frames: usize) -> Result<usize> {
        let mut rendered = 0;
        while rendered < max_frames && self.frames.is_pending() {
            let now = source.wait_next_frame();
            if self.on_frame(now)?.is_some() {
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    /// Tear the view down; the pending frame, if any, never runs.
    pub fn close(&mut self) {
        if let Some(handle) = self.frames.cancel() {
            log::debug!("Closing view, dropped pending frame {:?}", handle);
        }
        self.closed = true;
    }

    pub fn surface(&self) -> &Pixmap {
        &self.surface
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    pub fn sky(&self) -> &Arc<SkyData> {
        &self.sky
    }

    /// Most recent animation frame since the last transition started
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Total renders into the surface, including idle redraws
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frames.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

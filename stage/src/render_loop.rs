//! Render loop
//!
//! Every draw schedules the next one, so there is never more than one frame
//! request outstanding. [`RenderLoop::stop`] cancels that request.

use std::collections::VecDeque;

use log;

use crate::{
    gfx::{GraphicsResult, RenderBackend},
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn new(id: u64) -> FrameHandle {
        FrameHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The host's "call me before the next display refresh" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S) -> RenderLoop<S> {
        RenderLoop {
            scheduler,
            state: LoopState::Stopped,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The one outstanding frame request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames the loop actually drew.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Draws immediately and schedules the next frame. No-op when already running.
    pub fn start<R: RenderBackend>(&mut self, app: &mut AppState<R>) -> GraphicsResult<()> {
        if self.is_running() {
            return Ok(());
        }
        log::info!("Render loop started");
        self.state = LoopState::Running;
        self.tick(app).map(|_| ())
    }

    /// Handles a frame delivered by the scheduler. Stale or post-stop frames
    /// are ignored; returns whether anything was drawn.
    pub fn on_frame<R: RenderBackend>(
        &mut self,
        handle: FrameHandle,
        app: &mut AppState<R>,
    ) -> GraphicsResult<bool> {
        if !self.is_running() || self.pending != Some(handle) {
            log::trace!("Ignoring frame {:?}", handle);
            return Ok(false);
        }
        self.pending = None;
        self.tick(app)
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        if self.is_running() {
            log::info!("Render loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    /// Draws and schedules the next frame. Skipped draws (minimized window)
    /// still schedule, but are not counted.
    fn tick<R: RenderBackend>(&mut self, app: &mut AppState<R>) -> GraphicsResult<bool> {
        let drawn = match app.draw() {
            Ok(drawn) => drawn,
            Err(e) => {
                self.stop();
                return Err(e);
            }
        };
        if drawn {
            self.frames += 1;
        }
        debug_assert!(self.pending.is_none());
        self.pending = Some(self.scheduler.request_frame());
        Ok(drawn)
    }
}

/// Scheduler driven by hand: requests queue up until [`fire_next`](Self::fire_next)
/// hands them back. For headless hosts and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> ManualScheduler {
        Self::default()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queue.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

/// Fires up to `limit` queued frames. Returns how many of them drew.
pub fn pump<R: RenderBackend>(
    render_loop: &mut RenderLoop<ManualScheduler>,
    app: &mut AppState<R>,
    limit: usize,
) -> GraphicsResult<usize> {
    let mut drawn = 0;
    for _ in 0..limit {
        let handle = match render_loop.scheduler_mut().fire_next() {
            Some(handle) => handle,
            None => break,
        };
        if render_loop.on_frame(handle, app)? {
            drawn += 1;
        }
    }
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{GraphicsError, HeadlessRenderer, RendererCreateInfo, RenderingData},
        scene::{PerspectiveCamera, Scene},
        viewport::Viewport,
    };

    fn app() -> AppState<HeadlessRenderer> {
        AppState::new(
            Scene::default(),
            PerspectiveCamera::new(60.0, 4.0 / 3.0, 0.1, 100.0),
            HeadlessRenderer::new(&RendererCreateInfo::sized(800, 600)).unwrap(),
            Viewport::new(800, 600),
        )
    }

    #[test]
    fn start_draws_once_and_schedules_one_frame() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        assert_eq!(render_loop.state(), LoopState::Stopped);

        render_loop.start(&mut app).unwrap();
        assert!(render_loop.is_running());
        assert_eq!(app.renderer.frames(), 1);
        assert_eq!(render_loop.scheduler().queued(), 1);
        assert!(render_loop.pending().is_some());

        // Starting twice must not create a second outstanding request.
        render_loop.start(&mut app).unwrap();
        assert_eq!(app.renderer.frames(), 1);
        assert_eq!(render_loop.scheduler().queued(), 1);
    }

    #[test]
    fn each_draw_schedules_exactly_the_next() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        render_loop.start(&mut app).unwrap();

        for expected in 2..=10 {
            let drawn = pump(&mut render_loop, &mut app, 1).unwrap();
            assert_eq!(drawn, 1);
            assert_eq!(app.renderer.frames(), expected);
            assert_eq!(render_loop.scheduler().queued(), 1);
        }
        assert_eq!(render_loop.frames(), 10);
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        render_loop.start(&mut app).unwrap();
        let pending = render_loop.pending().unwrap();

        render_loop.stop();
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert_eq!(render_loop.pending(), None);
        assert_eq!(render_loop.scheduler().queued(), 0);
        assert_eq!(render_loop.scheduler().cancelled(), &[pending]);

        // A frame the host already dispatched before the cancel is ignored.
        assert!(!render_loop.on_frame(pending, &mut app).unwrap());
        assert_eq!(app.renderer.frames(), 1);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        render_loop.start(&mut app).unwrap();
        assert!(!render_loop
            .on_frame(FrameHandle::new(999), &mut app)
            .unwrap());
        assert_eq!(app.renderer.frames(), 1);
    }

    #[test]
    fn restart_after_stop_draws_again() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        render_loop.start(&mut app).unwrap();
        render_loop.stop();
        render_loop.start(&mut app).unwrap();
        assert_eq!(app.renderer.frames(), 2);
        assert_eq!(render_loop.scheduler().queued(), 1);
    }

    #[test]
    fn minimized_ticks_keep_scheduling_without_counting() {
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        render_loop.start(&mut app).unwrap();

        app.viewport = Viewport::new(0, 0);
        assert_eq!(pump(&mut render_loop, &mut app, 3).unwrap(), 0);
        assert_eq!(render_loop.frames(), 1);
        assert_eq!(app.renderer.frames(), 1);
        assert_eq!(render_loop.scheduler().queued(), 1);

        app.viewport = Viewport::new(800, 600);
        assert_eq!(pump(&mut render_loop, &mut app, 1).unwrap(), 1);
        assert_eq!(render_loop.frames(), 2);
    }

    struct FailingRenderer;

    impl RenderBackend for FailingRenderer {
        fn new(_: &RendererCreateInfo) -> GraphicsResult<Self> {
            Ok(FailingRenderer)
        }

        fn recreate(&mut self, _: &RendererCreateInfo) -> GraphicsResult<()> {
            Ok(())
        }

        fn render(&mut self, _: RenderingData) -> GraphicsResult<()> {
            Err(GraphicsError::Backend("device lost".into()))
        }
    }

    #[test]
    fn draw_error_stops_the_loop() {
        let mut app = AppState::new(
            Scene::default(),
            PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0),
            FailingRenderer,
            Viewport::new(64, 64),
        );
        let mut render_loop = RenderLoop::new(ManualScheduler::new());
        assert!(render_loop.start(&mut app).is_err());
        assert!(!render_loop.is_running());
        assert_eq!(render_loop.pending(), None);
        assert_eq!(render_loop.scheduler().queued(), 0);
    }
}

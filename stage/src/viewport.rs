//! Viewport manager

use log;

use crate::{
    gfx::{GraphicsResult, RenderBackend, RendererCreateInfo},
    AppState,
};

/// Drawable surface size in physical pixels, as reported by the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    /// Width over height; `1.0` for an empty surface.
    pub fn aspect(&self) -> f32 {
        match self.is_empty() {
            true => 1.0,
            false => self.width as f32 / self.height as f32,
        }
    }

    /// Minimized windows report a zero-sized surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Reacts to a window resize: resizes the surface, refits the camera and
/// draws straight away so the new framing shows without waiting for a tick.
pub fn on_resize<R: RenderBackend>(
    state: &mut AppState<R>,
    viewport: Viewport,
) -> GraphicsResult<()> {
    log::debug!("Window resized to {}x{}", viewport.width, viewport.height);
    state.viewport = viewport;
    if viewport.is_empty() {
        return Ok(());
    }

    state
        .renderer
        .recreate(&RendererCreateInfo::sized(viewport.width, viewport.height))?;
    state.camera.set_aspect(viewport.aspect());
    state.camera.update_projection();
    state.draw().map(|_| ())
}

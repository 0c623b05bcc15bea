//! Application state shared by the resize handler and the render loop.

use crate::{
    controls::OrbitControls,
    gfx::{GraphicsResult, RenderBackend, RenderingData},
    scene::{PerspectiveCamera, Scene},
    viewport::Viewport,
};

pub struct AppState<R: RenderBackend> {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub renderer: R,
    pub controls: OrbitControls,
    pub(crate) viewport: Viewport,
}

impl<R: RenderBackend> AppState<R> {
    pub fn new(
        scene: Scene,
        camera: PerspectiveCamera,
        renderer: R,
        viewport: Viewport,
    ) -> AppState<R> {
        let controls = OrbitControls::from_camera(&camera, None);
        AppState {
            scene,
            camera,
            renderer,
            controls,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draws one frame and returns whether it did. Nothing is drawn while the
    /// window is minimized.
    pub fn draw(&mut self) -> GraphicsResult<bool> {
        if self.viewport.is_empty() {
            return Ok(false);
        }
        if self.controls.damping_enabled() {
            self.controls.update(&mut self.camera);
        }
        let rendering_data = RenderingData::parse_scene(&self.scene, &self.camera);
        self.renderer.render(rendering_data)?;
        Ok(true)
    }
}

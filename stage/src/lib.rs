//! Stage Engine

mod color;
pub use color::Color;
pub mod config;
pub mod controls;
pub mod gfx;
pub mod loader;
pub mod render_loop;
pub mod scene;
mod state;
pub mod viewport;

pub use config::{CameraParams, ConfigError, ConfigParams, WindowParams};
pub use state::AppState;

use std::sync::Arc;

use thiserror::Error;
use winit::{
    dpi::PhysicalSize,
    error::OsError,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, StartCause, WindowEvent},
    event_loop::EventLoopBuilder,
    platform::run_return::EventLoopExtRunReturn,
    window::{Fullscreen, Window as WInitWindow, WindowBuilder},
};

use controls::OrbitControls;
use gfx::{GraphicsError, GraphicsResult, RenderBackend, RendererCreateInfo};
use loader::{ImageTextureLoader, PendingTextures, TextureLoader};
use render_loop::{FrameHandle, FrameScheduler, RenderLoop};
use scene::{material::SamplerInfo, Scene, SceneBuilder};
use viewport::Viewport;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{0}")]
    WInit(#[from] OsError),
    #[error("{0}")]
    Graphics(#[from] GraphicsError),
}

/// The host window. Frame requests map onto winit redraw requests.
pub struct Window {
    raw: WInitWindow,
    next_frame: u64,
}

impl Window {
    fn new(raw: WInitWindow) -> Window {
        Window { raw, next_frame: 0 }
    }

    pub fn inner_size(&self) -> (u32, u32) {
        let size = self.raw.inner_size();
        (size.width, size.height)
    }

    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.inner_size();
        Viewport::new(width, height)
    }
}

impl FrameScheduler for Window {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        self.raw.request_redraw();
        FrameHandle::new(self.next_frame)
    }

    // winit cannot retract a redraw request; the render loop drops the
    // handle, so the late RedrawRequested is ignored.
    fn cancel(&mut self, _handle: FrameHandle) {}
}

/// Posted by a texture worker once its result is ready.
#[derive(Debug, Clone, Copy)]
struct TextureSettled;

/// Builds the scene and starts the loop once every texture load has settled.
/// Returns whether that happened on this call.
fn finish_loading<R: RenderBackend, S: FrameScheduler>(
    pending: &mut Option<PendingTextures>,
    scene_builder: &SceneBuilder,
    app: &mut AppState<R>,
    render_loop: &mut RenderLoop<S>,
) -> GraphicsResult<bool> {
    let settled = pending.as_mut().map_or(false, PendingTextures::poll);
    match pending.take() {
        Some(loads) if settled => {
            app.scene = scene_builder.build(&loads.into_resolved());
            render_loop.start(app)?;
            Ok(true)
        }
        loads => {
            *pending = loads;
            Ok(false)
        }
    }
}

/// Opens the window, loads textures in the background, builds the scene once
/// they have settled and then keeps drawing until the window closes.
pub fn launch<R: RenderBackend>(params: ConfigParams) -> Result<(), LaunchError> {
    let ConfigParams {
        window: window_params,
        camera: camera_params,
        scene: scene_builder,
    } = params;

    let mut event_loop = EventLoopBuilder::<TextureSettled>::with_user_event().build();
    let fullscreen = match window_params.fullscreen {
        true => Some(Fullscreen::Borderless(None)),
        false => None,
    };
    let raw = WindowBuilder::new()
        .with_title(window_params.title.clone())
        .with_inner_size(PhysicalSize::new(window_params.width, window_params.height))
        .with_fullscreen(fullscreen)
        .with_resizable(window_params.resizeable)
        .build(&event_loop)?;
    let window = Window::new(raw);
    let initial = window.viewport();

    let renderer = R::new(&RendererCreateInfo::sized(
        initial.width.max(1),
        initial.height.max(1),
    ))?;
    let camera = camera_params.build(initial.aspect());
    let mut app = AppState::new(Scene::default(), camera, renderer, initial);
    app.controls = OrbitControls::from_camera(&app.camera, camera_params.damping);

    let loader: Arc<dyn TextureLoader> = Arc::new(ImageTextureLoader::new(SamplerInfo::default()));
    let proxy = event_loop.create_proxy();
    let mut pending = Some(PendingTextures::spawn_notifying(
        loader,
        scene_builder.texture_paths(),
        move || {
            let _ = proxy.send_event(TextureSettled);
        },
    ));
    let mut render_loop = RenderLoop::new(window);
    let mut result: Result<(), LaunchError> = Ok(());

    event_loop.run_return(|event, _, ctrl_flow| {
        let mut failure: Option<GraphicsError> = None;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("Close requested");
                    render_loop.stop();
                    ctrl_flow.set_exit();
                }
                WindowEvent::Resized(size) => {
                    let resized = Viewport::new(size.width, size.height);
                    failure = viewport::on_resize(&mut app, resized).err();
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    let resized = Viewport::new(new_inner_size.width, new_inner_size.height);
                    failure = viewport::on_resize(&mut app, resized).err();
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => app.controls.pointer_down(),
                    ElementState::Released => app.controls.pointer_up(),
                },
                WindowEvent::CursorMoved { position, .. } => {
                    app.controls.pointer_moved(position.x as f32, position.y as f32);
                    if !app.controls.damping_enabled() {
                        app.controls.update(&mut app.camera);
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                    };
                    app.controls.scroll(lines);
                    if !app.controls.damping_enabled() {
                        app.controls.update(&mut app.camera);
                    }
                }
                _ => (),
            },
            Event::NewEvents(StartCause::Init) => {
                ctrl_flow.set_wait();
                failure =
                    finish_loading(&mut pending, &scene_builder, &mut app, &mut render_loop).err();
            }
            Event::UserEvent(TextureSettled) => {
                failure =
                    finish_loading(&mut pending, &scene_builder, &mut app, &mut render_loop).err();
            }
            Event::RedrawRequested(_) => {
                if let Some(handle) = render_loop.pending() {
                    failure = render_loop.on_frame(handle, &mut app).err();
                }
            }
            _ => (),
        }

        if let Some(e) = failure {
            log::error!("Rendering error: {}", e);
            render_loop.stop();
            result = Err(e.into());
            ctrl_flow.set_exit();
        }
    });

    render_loop.stop();
    log::info!("Event loop exited after {} frames", render_loop.frames());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::HeadlessRenderer,
        render_loop::ManualScheduler,
        scene::{material::{Texture, TextureError}, ContentElement, PerspectiveCamera},
    };
    use crossbeam::channel::{self, Receiver};

    /// Holds every load until the test releases it.
    struct GatedLoader {
        gate: Receiver<()>,
    }

    impl TextureLoader for GatedLoader {
        fn load(&self, path: &str) -> Result<Arc<Texture>, TextureError> {
            let _ = self.gate.recv();
            Err(TextureError::UnsupportedUri(path.to_string()))
        }
    }

    fn app() -> AppState<HeadlessRenderer> {
        AppState::new(
            Scene::default(),
            PerspectiveCamera::new(60.0, 4.0 / 3.0, 0.1, 100.0),
            HeadlessRenderer::new(&RendererCreateInfo::sized(800, 600)).unwrap(),
            Viewport::new(800, 600),
        )
    }

    #[test]
    fn scene_waits_for_every_texture() {
        let mut builder = SceneBuilder::minimal();
        builder.content.push(ContentElement::Textured {
            texture: "gated.png".into(),
            size: [1.0; 3],
            position: [0.0; 3],
        });
        let (release, gate) = channel::unbounded();
        let (notify_tx, notified) = channel::unbounded();
        let mut pending = Some(PendingTextures::spawn_notifying(
            Arc::new(GatedLoader { gate }),
            builder.texture_paths(),
            move || {
                let _ = notify_tx.send(());
            },
        ));
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());

        assert!(!finish_loading(&mut pending, &builder, &mut app, &mut render_loop).unwrap());
        assert!(pending.is_some());
        assert!(app.scene.is_empty());
        assert!(!render_loop.is_running());

        release.send(()).unwrap();
        notified.recv().unwrap();
        assert!(finish_loading(&mut pending, &builder, &mut app, &mut render_loop).unwrap());
        assert!(pending.is_none());
        assert_eq!(app.scene.len(), 3);
        assert!(render_loop.is_running());
        assert_eq!(app.renderer.frames(), 1);

        // Late notifications after the build change nothing.
        assert!(!finish_loading(&mut pending, &builder, &mut app, &mut render_loop).unwrap());
        assert_eq!(app.renderer.frames(), 1);
    }

    #[test]
    fn no_textures_builds_on_first_call() {
        let builder = SceneBuilder::minimal();
        let loader: Arc<dyn TextureLoader> =
            Arc::new(ImageTextureLoader::new(SamplerInfo::default()));
        let mut pending = Some(PendingTextures::spawn(loader, builder.texture_paths()));
        let mut app = app();
        let mut render_loop = RenderLoop::new(ManualScheduler::new());

        assert!(finish_loading(&mut pending, &builder, &mut app, &mut render_loop).unwrap());
        assert_eq!(app.scene.len(), 3);
        assert_eq!(render_loop.scheduler().queued(), 1);
    }
}

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use stage::{
    gfx::{HeadlessRenderer, RenderBackend, RendererCreateInfo},
    loader::{ImageTextureLoader, NoTextures, PendingTextures, ResolvedTextures, TextureLoader},
    render_loop::{pump, ManualScheduler, RenderLoop},
    scene::{
        factory::{self, Placement},
        material::{Material, SamplerInfo},
        ContentElement, ObjectRole, PerspectiveCamera, Scene, SceneBuilder, SceneParams,
    },
    viewport::{self, Viewport},
    AppState, Color,
};
use stage_geom::Vec3;

fn crate_texture_path() -> String {
    format!(
        "{}/../assets/textures/crate.png",
        env!("CARGO_MANIFEST_DIR")
    )
}

fn app(scene: Scene, width: u32, height: u32) -> AppState<HeadlessRenderer> {
    let viewport = Viewport::new(width, height);
    let mut camera = PerspectiveCamera::new(60.0, viewport.aspect(), 0.1, 100.0);
    camera.set_position(Vec3::new(0.0, 2.0, 8.0));
    camera.look_at(Vec3::zero());
    AppState::new(
        scene,
        camera,
        HeadlessRenderer::new(&RendererCreateInfo::sized(width, height)).unwrap(),
        viewport,
    )
}

#[test]
fn floor_and_one_box_make_two_objects() {
    let mut scene = Scene::new(SceneParams::default());
    scene.add(factory::floor(10.0, 10.0, Color::hex(0x999999)).unwrap());
    scene.add(
        factory::box_mesh(
            1.0,
            1.0,
            1.0,
            Arc::new(Material::standard(Color::hex(0x44aa88))),
            Placement::at(Vec3::new(0.0, 0.5, 0.0)),
        )
        .unwrap(),
    );
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.count_role(ObjectRole::Floor), 1);
}

#[test]
fn showcase_without_textures_still_builds() {
    let scene = SceneBuilder::showcase().build(&NoTextures);
    assert!(scene.len() >= 9, "only {} objects", scene.len());
    assert_eq!(scene.count_role(ObjectRole::Floor), 1);
    assert!(scene.count_role(ObjectRole::Light) >= 1);
    assert!(scene.find_by_name("textured").is_none());
    assert!(scene.find_by_name("particles").is_some());
}

#[test]
fn repeated_builds_agree_on_counts() {
    let builder = SceneBuilder::showcase();
    let first = builder.build(&NoTextures);
    let second = builder.build(&NoTextures);
    for role in &[ObjectRole::Floor, ObjectRole::Light, ObjectRole::Content] {
        assert_eq!(first.count_role(*role), second.count_role(*role));
    }
    assert_eq!(first.len(), second.len());
}

#[test]
fn textured_element_uses_the_loaded_image() {
    let path = crate_texture_path();
    let mut builder = SceneBuilder::minimal();
    builder.content.push(ContentElement::Textured {
        texture: path.clone(),
        size: [1.0, 1.0, 1.0],
        position: [2.0, 0.5, 0.0],
    });

    let loader: Arc<dyn TextureLoader> = Arc::new(ImageTextureLoader::new(SamplerInfo::default()));
    let textures = PendingTextures::spawn(loader, builder.texture_paths()).wait();
    assert_eq!(textures.failed_count(), 0);

    let scene = builder.build(&textures);
    let textured = scene.find_by_name("textured").unwrap();
    let map = textured.material().unwrap().map.clone().unwrap();
    assert_eq!(map.dimensions(), (64, 64));
    assert_eq!(scene.len(), 4);
}

#[test]
fn missing_texture_drops_only_that_element() {
    let mut builder = SceneBuilder::minimal();
    builder.content.push(ContentElement::Textured {
        texture: "no/such/texture.png".into(),
        size: [1.0, 1.0, 1.0],
        position: [2.0, 0.5, 0.0],
    });
    let loader = ImageTextureLoader::new(SamplerInfo::default());
    let textures = ResolvedTextures::load_all(&loader, &builder.texture_paths());
    assert_eq!(textures.failed_count(), 1);

    let scene = builder.build(&textures);
    assert_eq!(scene.count_role(ObjectRole::Floor), 1);
    assert_eq!(scene.count_role(ObjectRole::Light), 1);
    assert_eq!(scene.count_role(ObjectRole::Content), 1);
    assert!(scene.find_by_name("textured").is_none());
}

#[test]
fn particle_cloud_stays_inside_its_cube() {
    let mut rng = StdRng::seed_from_u64(42);
    let cloud = factory::particle_cloud(5000, 30.0, 0.05, Color::white(), &mut rng).unwrap();
    let positions = match cloud.kind() {
        stage::scene::ObjectKind::Points { positions, .. } => positions.clone(),
        other => panic!("expected points, got {:?}", other),
    };
    assert_eq!(positions.len(), 5000);
    assert!(positions.iter().all(|p| p.max_abs() <= 15.0));
}

#[test]
fn loop_draws_through_resizes_and_stops_cleanly() {
    let scene = SceneBuilder::showcase().build(&NoTextures);
    let expected_draws = scene.len() - scene.count_role(ObjectRole::Light);
    let mut app = app(scene, 800, 600);
    let mut render_loop = RenderLoop::new(ManualScheduler::new());

    render_loop.start(&mut app).unwrap();
    assert_eq!(pump(&mut render_loop, &mut app, 5).unwrap(), 5);
    assert_eq!(render_loop.scheduler().queued(), 1);

    viewport::on_resize(&mut app, Viewport::new(1920, 1080)).unwrap();
    assert_eq!(app.camera.aspect(), 1920.0 / 1080.0);
    assert_eq!(app.renderer.frames(), 7);
    // The resize draw does not add a second outstanding frame.
    assert_eq!(render_loop.scheduler().queued(), 1);

    pump(&mut render_loop, &mut app, 1).unwrap();
    let frame = *app.renderer.last_frame().unwrap();
    assert_eq!((frame.width, frame.height), (1920, 1080));
    assert!(frame.lights >= 1);
    assert!(frame.shadow_casters >= 1);
    assert_eq!(frame.double_sided, 1);
    assert_eq!(frame.draw_calls, expected_draws);

    render_loop.stop();
    assert_eq!(render_loop.scheduler().queued(), 0);
    assert_eq!(pump(&mut render_loop, &mut app, 10).unwrap(), 0);
    assert_eq!(app.renderer.frames(), 8);
}

#[test]
fn minimized_window_pauses_drawing() {
    let mut app = app(SceneBuilder::minimal().build(&NoTextures), 640, 480);
    let mut render_loop = RenderLoop::new(ManualScheduler::new());
    render_loop.start(&mut app).unwrap();

    viewport::on_resize(&mut app, Viewport::new(0, 0)).unwrap();
    pump(&mut render_loop, &mut app, 3).unwrap();
    assert_eq!(app.renderer.frames(), 1);
    assert_eq!(app.camera.aspect(), 640.0 / 480.0);

    viewport::on_resize(&mut app, Viewport::new(640, 480)).unwrap();
    assert_eq!(app.renderer.frames(), 2);
    assert!(render_loop.is_running());
}

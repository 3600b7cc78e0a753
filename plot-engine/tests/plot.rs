use glam::{Vec3, Vec4Swizzles};
use plot_engine::{
    control::{
        camera::{CameraKind, CameraSettings},
        controller::{keyboard::Keyboard, mouse::Mouse, Controller},
        InputState, Keys,
    },
    plot::{MovingBump, Plot, PlotDescriptor, Resolution, Spans},
    render::model_view_projection,
    scene::{Frame, Scene},
    scene_cameras,
};

fn default_plot() -> Plot {
    Plot::new(&PlotDescriptor::default(), Box::new(MovingBump)).unwrap()
}

#[test]
fn default_scene_geometry() {
    let plot = default_plot();

    assert_eq!(plot.grid().boundary_segments().len(), 24);
    assert_eq!(plot.grid().grid_lines().len(), 12 * 9);
    assert_eq!(plot.mesh().vertices().len(), 100 * 100);
    assert_eq!(plot.mesh().indices().len(), 99 * 99 * 6);
    assert_eq!(plot.center(), Vec3::new(4.5, 4.5, 8.0));
}

#[test]
fn surface_stays_inside_the_box() {
    let mut plot = default_plot();

    let mut regenerations = 0;
    for _ in 0..64 {
        if plot.advance(1.0 / 64.0) {
            regenerations += 1;
        }
    }
    assert_eq!(regenerations, 8);

    let spans = plot.grid().spans();
    for &[x, y, z] in plot.mesh().vertices() {
        assert!((0.0..=spans.x + 1e-4).contains(&x));
        assert!((0.0..=spans.y).contains(&y));
        assert!((0.0..=spans.z + 1e-4).contains(&z));
    }
    assert!(plot.mesh().vertices().iter().any(|v| v[1] > 0.0));
}

#[test]
fn invalid_descriptors_are_rejected() {
    let no_tiles = PlotDescriptor {
        tile_count: 0,
        ..PlotDescriptor::default()
    };
    assert!(Plot::new(&no_tiles, Box::new(MovingBump)).is_err());

    let flat = PlotDescriptor {
        spans: Spans::new(1.0, -1.0, 1.0),
        ..PlotDescriptor::default()
    };
    assert!(Plot::new(&flat, Box::new(MovingBump)).is_err());

    let line = PlotDescriptor {
        resolution: Resolution { x: 100, z: 1 },
        ..PlotDescriptor::default()
    };
    assert!(Plot::new(&line, Box::new(MovingBump)).is_err());
}

#[test]
fn centered_camera_keeps_the_plot_in_view() {
    let plot = default_plot();
    let mut cameras = scene_cameras(
        plot.center(),
        16.0 / 9.0,
        CameraSettings::default(),
        CameraKind::Centered,
    );

    let held = InputState {
        held: Keys::A.union(Keys::E),
        ..InputState::default()
    };
    for _ in 0..30 {
        cameras.active_mut().update(1.0 / 30.0, &held);
    }

    let clip = model_view_projection(cameras.active()) * plot.center().extend(1.0);
    let ndc = clip.xyz() / clip.w;
    assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    assert!((0.0..=1.0).contains(&ndc.z));
}

#[test]
fn keyboard_frames_drive_the_scene() {
    let plot = default_plot();
    let cameras = scene_cameras(
        plot.center(),
        1.0,
        CameraSettings::default(),
        CameraKind::Centered,
    );
    let mut scene = Scene::new(plot, cameras);

    let mut keyboard = Keyboard::default();
    keyboard.set_key(Keys::C, true);
    keyboard.set_key(Keys::C, false);
    let mut controllers: Vec<Box<dyn Controller>> = vec![Box::new(keyboard)];

    let input = Scene::gather_input(&mut controllers);
    assert!(matches!(scene.step(0.0, &input), Frame::Continue { .. }));
    assert_eq!(scene.cameras().active_kind(), CameraKind::Flying);

    // The release was consumed by the previous frame.
    let input = Scene::gather_input(&mut controllers);
    scene.step(0.0, &input);
    assert_eq!(scene.cameras().active_kind(), CameraKind::Flying);

    let escape = InputState {
        held: Keys::ESCAPE,
        ..InputState::default()
    };
    assert_eq!(scene.step(0.0, &escape), Frame::Exit);
}

#[test]
fn flying_camera_moves_along_its_front() {
    let mut cameras = scene_cameras(
        Vec3::new(4.5, 4.5, 8.0),
        1.0,
        CameraSettings::default(),
        CameraKind::Flying,
    );
    assert_eq!(cameras.active_kind(), CameraKind::Flying);

    let forward = InputState {
        held: Keys::W,
        ..InputState::default()
    };
    cameras.active_mut().update(1.0, &forward);

    let position = cameras.active().position();
    assert!((position - Vec3::new(0.0, 0.0, 1.5)).length() < 1e-4);
}

#[test]
fn scroll_zooms_the_centered_camera() {
    let mut cameras = scene_cameras(
        Vec3::new(4.5, 4.5, 8.0),
        1.0,
        CameraSettings::default(),
        CameraKind::Centered,
    );
    let mut mouse = Mouse::default();
    let center = Vec3::new(4.5, 4.5, 8.0);
    let before = cameras.active().position().distance(center);

    mouse.scroll(-1.0);
    let mut input = InputState::default();
    mouse.fetch_input(&mut input);
    cameras.active_mut().update(0.0, &input);

    let after = cameras.active().position().distance(center);
    assert!(after < before);
}

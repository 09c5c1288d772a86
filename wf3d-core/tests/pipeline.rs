use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use wf3d_core::{
    load_geo, Camera, Command, Object3D, Placement, Point, Scene, Transform, ViewerConfig,
};

const PYRAMID: &str = "5
-0.5 -0.5 -0.5
 0.5 -0.5 -0.5
 0.5 -0.5  0.5
-0.5 -0.5  0.5
 0    0.5  0
6
1 2 3
1 3 4
1 5 2
2 5 3
3 5 4
4 5 1
";

fn scene_with(text: &str, config: &ViewerConfig) -> Scene {
    let camera = Camera::with_config(800, 600, config.camera.clone());
    let mut scene = Scene::new(camera);
    let mut placement = Placement::new();
    for object in load_geo("pyramid.geo", text, &mut placement, config.object_spacing).unwrap() {
        scene.add_object(object);
    }
    scene
}

#[test]
fn test_full_frame_from_geo() {
    let mut scene = scene_with(PYRAMID, &ViewerConfig::default());
    scene.update();
    let edges = scene.frame();
    assert!(!edges.is_empty());
    for edge in &edges {
        for p in [edge.from, edge.to] {
            assert!(p[0].abs() <= 1.0 + 1e-4 && p[1].abs() <= 1.0 + 1e-4);
        }
    }
}

#[test]
fn test_turning_away_hides_everything() {
    let config = ViewerConfig::from_toml_str("[camera]\nturn_speed = 10.0\n").unwrap();
    let mut scene = scene_with(PYRAMID, &config);
    scene.update();
    assert!(!scene.frame().is_empty());

    // Half a turn around Y leaves the pyramid behind the camera.
    scene.press(Command::TurnYUp);
    for _ in 0..18 {
        scene.update();
    }
    scene.release(Command::TurnYUp);
    assert!(scene.frame().is_empty());

    scene.press(Command::Reset);
    scene.update();
    assert!(!scene.frame().is_empty());
}

#[test]
fn test_far_objects_are_clipped_away() {
    let mut scene = Scene::new(Camera::new(800, 600));
    let mut cube = Object3D::cube(1.0);
    cube.set_position(Point::new(0.0, 0.0, -200.0));
    scene.add_object(cube);
    scene.update();
    assert!(scene.frame().is_empty());
}

#[test]
fn test_edges_straddling_the_screen_edge_are_clipped() {
    let mut scene = Scene::new(Camera::new(800, 600));
    // Wider than the field of view at this depth.
    let mut wall = Object3D::new("wall", Point::new(0.0, 0.0, -2.0));
    wall.add_vertex(-50.0, -0.5, 0.0);
    wall.add_vertex(50.0, -0.5, 0.0);
    wall.add_vertex(0.0, 0.5, 0.0);
    wall.add_face(0, 1, 2).unwrap();
    scene.add_object(wall);
    scene.update();

    let edges = scene.frame();
    assert_eq!(edges.len(), 3);
    let xs: Vec<f32> = edges.iter().flat_map(|e| [e.from[0], e.to[0]]).collect();
    let max = xs.iter().cloned().fold(f32::MIN, f32::max);
    let min = xs.iter().cloned().fold(f32::MAX, f32::min);
    assert_abs_diff_eq!(max, 1.0, epsilon = 1e-3);
    assert_abs_diff_eq!(min, -1.0, epsilon = 1e-3);
}

#[test]
fn test_concat_applies_right_operand_first() {
    let translate = Transform::translation(10.0, 0.0, 0.0);
    let scale = Transform::scale(5.0, 2.0, 3.0);
    let p = Point::new(10.0, 10.0, 10.0);
    assert_eq!(translate.apply(&p), Point::new(20.0, 10.0, 10.0));
    assert_eq!(scale.apply(&p), Point::new(50.0, 20.0, 30.0));
    assert_eq!(translate.concat(&scale).apply(&p), Point::new(60.0, 20.0, 30.0));
}

/// WF3D Web - WASM front-end drawing the wireframe scene on a 2D canvas
///
/// The page forwards `keydown`/`keyup` key names to [`WebViewer::press`] and
/// [`WebViewer::release`], then calls `update` and `render` once per
/// animation frame.
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wf3d_core::{
    load_geo, projection::to_screen, Camera, Command, Object3D, Placement, Scene, ViewerConfig,
};

#[wasm_bindgen]
pub struct WebViewer {
    scene: Scene,
    placement: Placement,
    spacing: f32,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebViewer {
        Self::from_config(width, height, ViewerConfig::default())
    }

    /// Viewer configured from TOML text.
    pub fn with_config(width: u32, height: u32, toml: &str) -> Result<WebViewer, JsValue> {
        let config = ViewerConfig::from_toml_str(toml).map_err(to_js)?;
        Ok(Self::from_config(width, height, config))
    }

    /// Add every object of a `.geo` file and return how many were added.
    pub fn load_geo(&mut self, name: &str, text: &str) -> Result<usize, JsValue> {
        let objects = load_geo(name, text, &mut self.placement, self.spacing).map_err(to_js)?;
        let count = objects.len();
        for object in objects {
            self.scene.add_object(object);
        }
        Ok(count)
    }

    pub fn add_cube(&mut self, size: f32) {
        self.scene.add_object(Object3D::cube(size));
    }

    /// Returns false for keys without a binding.
    pub fn press(&mut self, key: &str) -> bool {
        match Command::from_key(key) {
            Some(command) => {
                self.scene.press(command);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, key: &str) -> bool {
        match Command::from_key(key) {
            Some(command) => {
                self.scene.release(command);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self) {
        self.scene.update();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera_mut().set_viewport(width, height);
    }

    /// Visible edges as flat `[x0, y0, x1, y1, ...]` canvas coordinates.
    pub fn segments(&self) -> Vec<f32> {
        let camera = self.scene.camera();
        let (width, height) = (camera.width(), camera.height());
        self.scene
            .frame()
            .iter()
            .flat_map(|edge| {
                let from = to_screen(edge.from, width, height);
                let to = to_screen(edge.to, width, height);
                [from[0], from[1], to[0], to[1]]
            })
            .collect()
    }

    /// Clear the canvas and stroke the current frame onto it.
    pub fn render(&self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id}")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        context.set_stroke_style_str("#00ffff");
        context.begin_path();
        for line in self.segments().chunks_exact(4) {
            context.move_to(line[0] as f64, line[1] as f64);
            context.line_to(line[2] as f64, line[3] as f64);
        }
        context.stroke();
        Ok(())
    }

    pub fn fov(&self) -> f32 {
        self.scene.camera().fov()
    }
}

impl WebViewer {
    fn from_config(width: u32, height: u32, config: ViewerConfig) -> Self {
        Self {
            scene: Scene::new(Camera::with_config(width, height, config.camera)),
            placement: Placement::new(),
            spacing: config.object_spacing,
        }
    }
}

fn to_js(err: wf3d_core::LoadError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "3\n-1 -1 0\n1 -1 0\n0 1 0\n1\n1 2 3\n";

    #[test]
    fn test_segments_in_canvas_space() {
        let mut viewer = WebViewer::new(640, 480);
        assert_eq!(viewer.load_geo("triangle.geo", TRIANGLE).unwrap(), 1);
        viewer.update();
        let segments = viewer.segments();
        assert_eq!(segments.len(), 3 * 4);
        for (i, value) in segments.iter().enumerate() {
            let limit = if i % 2 == 0 { 640.0 } else { 480.0 };
            assert!((0.0..=limit).contains(value));
        }
    }

    #[test]
    fn test_keys() {
        let mut viewer = WebViewer::new(640, 480);
        viewer.add_cube(1.0);
        assert!(viewer.press("z"));
        viewer.update();
        assert!(viewer.fov() > 80.0);
        assert!(viewer.release("z"));
        assert!(!viewer.press("Enter"));
    }
}

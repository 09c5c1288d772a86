/// Terminal front-end: crossterm event loop driving a wireframe scene
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wf3d_core::{Camera, Command, Object3D, Scene, ViewerConfig};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    frame_rate: u32,
    /// Whether the terminal reports key releases.
    key_releases: bool,
    /// Commands to release after the next update, when key releases are not reported.
    pending_release: Vec<Command>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(objects: Vec<Object3D>, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let camera = Camera::with_config(
            width as u32,
            height as u32 * CELL_ASPECT,
            config.camera.clone(),
        );
        let mut scene = Scene::new(camera);
        for object in objects {
            scene.add_object(object);
        }

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            frame_rate: config.frame_rate.max(1),
            key_releases: false,
            pending_release: Vec::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_releases {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!(
            "terminal viewer started ({} objects, key releases {})",
            self.scene.objects().len(),
            if self.key_releases { "reported" } else { "emulated" }
        );

        let result = self.main_loop();

        // Cleanup
        if self.key_releases {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.frame_rate as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("terminal viewer stopped");
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                let quit = code == KeyCode::Esc
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    self.running = false;
                    return;
                }
                let Some(command) = command_for(code) else {
                    return;
                };
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        self.scene.press(command);
                        if !self.key_releases {
                            self.pending_release.push(command);
                        }
                    }
                    KeyEventKind::Release => self.scene.release(command),
                }
            }
            Event::Resize(width, height) => {
                debug!("terminal resized to {width}x{height}");
                self.renderer.resize(width as usize, height as usize);
                self.scene
                    .camera_mut()
                    .set_viewport(width as u32, height as u32 * CELL_ASPECT);
            }
            _ => {}
        }
    }

    pub fn update(&mut self) {
        self.scene.update();
        for command in self.pending_release.drain(..) {
            self.scene.release(command);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render scene
        let edges = self.scene.frame();
        self.renderer.render_edges(&edges);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "WF3D | FPS: {:.1} | FOV: {:.1} | Arrows=Move W/S A/D Q/E=Turn Z/X=Zoom Space=Reset Esc=Quit",
                self.fps,
                self.scene.camera().fov()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Key binding: arrows move, characters follow [`Command::from_char`].
pub fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Char(c) => Command::from_char(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_for() {
        assert_eq!(command_for(KeyCode::Up), Some(Command::MoveUp));
        assert_eq!(command_for(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(command_for(KeyCode::Char('a')), Some(Command::TurnYUp));
        assert_eq!(command_for(KeyCode::Char(' ')), Some(Command::Reset));
        assert_eq!(command_for(KeyCode::Tab), None);
    }
}

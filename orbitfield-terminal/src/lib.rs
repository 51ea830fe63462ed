/// Terminal front end: crossterm event loop around the orbitfield scene
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use orbitfield_core::{DebugPanel, FrameClock, Scene, SceneConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod input;
pub mod renderer;

pub use input::{map_event, Input};
pub use renderer::AsciiRenderer;

/// Width of a terminal cell relative to its height.
pub const CELL_ASPECT: f32 = 0.5;

/// Main application struct for the terminal scene
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    panel: DebugPanel,
    clock: FrameClock,
    started: Instant,
    target_frame_time: Duration,
    running: bool,
    last_fps_update: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// App sized to the current terminal.
    pub fn new(config: &SceneConfig, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, target_fps, width, height))
    }

    pub fn with_size(config: &SceneConfig, target_fps: u32, width: u16, height: u16) -> Self {
        let now = Instant::now();

        Self {
            scene: Scene::new(config, width as u32, height as u32, CELL_ASPECT),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            panel: DebugPanel::new(),
            clock: FrameClock::new(),
            started: now,
            target_frame_time: Duration::from_secs(1) / target_fps.max(1),
            running: true,
            last_fps_update: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let result = execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )
        .and_then(|_| self.main_loop());

        // Cleanup runs even when the loop failed
        let restored = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )
        .and(terminal::disable_raw_mode());

        if let Err(err) = &result {
            tracing::error!(error = %err, "terminal loop failed");
        }
        result.and(restored)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        tracing::info!(
            frame_time_ms = self.target_frame_time.as_millis() as u64,
            "terminal loop started"
        );

        while self.running {
            let frame_start = Instant::now();

            // Drain everything queued since the last frame
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                if let Some(input) = map_event(&event) {
                    self.handle_input(input);
                }
            }
            if !self.running {
                break;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_update).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_update).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_update = now;
            }
        }

        tracing::info!("terminal loop stopped");
        Ok(())
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Wheel(delta) => self.scene.on_wheel(delta),
            Input::Pointer { column, row } => {
                self.scene.on_pointer_move(column as f32, row as f32);
            }
            Input::Resize(width, height) => {
                self.scene.on_resize(width as u32, height as u32);
                self.renderer.resize(width as usize, height as usize);
            }
            Input::TogglePanel => self.panel.toggle(),
            Input::SelectNext => self.panel.select_next(),
            Input::SelectPrevious => self.panel.select_previous(),
            Input::Adjust(steps) => self.panel.adjust(&mut self.scene.material, steps),
            Input::Quit => self.running = false,
        }
    }

    fn update(&mut self) {
        let dt = self.clock.delta(self.started.elapsed().as_secs_f64());
        self.scene.frame(dt);
    }

    fn render(&mut self) -> io::Result<()> {
        self.scene.render(self.renderer.frame_mut());

        let mut stdout = stdout();
        self.renderer.draw(
            &mut stdout,
            self.scene.material.color,
            self.scene.particles.color,
        )?;

        // Draw UI overlay
        let width = self.renderer.frame().width();
        let status = format!(
            "orbitfield | FPS: {:.1} | speed: {:+.4} | Controls: Wheel=Orbit Mouse=Camera G=Panel Q=Quit",
            self.fps,
            self.scene.angular().speed
        );
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(truncate(&status, width)),
            ResetColor
        )?;

        if self.panel.visible {
            let lines = self.panel.lines(&self.scene.material);
            let panel_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
            let column = width.saturating_sub(panel_width) as u16;
            queue!(stdout, SetForegroundColor(Color::White))?;
            for (row, line) in lines.iter().enumerate() {
                let row = row as u16 + 1;
                if row as usize >= self.renderer.frame().height() {
                    break;
                }
                queue!(
                    stdout,
                    cursor::MoveTo(column, row),
                    Print(truncate(&format!(" {line} "), width))
                )?;
            }
            queue!(stdout, ResetColor)?;
        }

        stdout.flush()?;
        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

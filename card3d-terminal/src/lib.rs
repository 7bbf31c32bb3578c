/// Terminal frontend for the interactive card
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use card3d_core::{screen_to_ndc, CardController, CardEvent, CardWidget, Camera, Mesh};

pub mod renderer;
pub mod texture;

pub use renderer::AsciiRenderer;
use texture::{face_label, BackTexture, FrontTexture};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Camera orbit per arrow-key press, in radians.
const ORBIT_STEP: f32 = 0.1;

/// Frontend settings that are not part of the card itself
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Pixel width assumed per terminal column, used for breakpoint sizing.
    pub cell_px: f32,
    pub target_fps: u32,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            cell_px: 8.0,
            target_fps: 30,
        }
    }
}

/// Main application struct for the terminal card
pub struct TerminalApp {
    widget: CardWidget,
    mesh: Mesh,
    camera: Camera,
    renderer: AsciiRenderer,
    options: AppOptions,
    running: bool,
    front_texture: FrontTexture,
    /// Pointer cell in renderer coordinates.
    mouse: Option<(u16, u16)>,
    /// Column of the last drag sample while orbiting the camera.
    orbit_drag: Option<u16>,
    status: String,
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Build the app around `widget`, sizing it to the current terminal.
    pub fn new(mut widget: CardWidget, options: AppOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        widget
            .resize(viewport_px(width, options.cell_px))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mesh = widget.surface().to_mesh();
        let front_texture = FrontTexture::new(widget.controller().current_face());

        Ok(Self {
            widget,
            mesh,
            front_texture,
            camera: camera_for(width, height, options.cell_px),
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            options,
            running: true,
            mouse: None,
            orbit_drag: None,
            status: String::new(),
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.options.target_fps.max(1)));
        self.last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event; the latest pointer position wins.
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            let dt = frame_start.duration_since(self.last_tick).as_secs_f32();
            self.last_tick = frame_start;
            self.update(dt);

            self.render()?;
            self.update_hover();

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.handle_resize(width, height)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('f') => {
                if !self.widget.controller_mut().request_flip() {
                    self.status = "already flipping".into();
                }
            }
            KeyCode::Left => self.camera.orbit(-ORBIT_STEP),
            KeyCode::Right => self.camera.orbit(ORBIT_STEP),
            KeyCode::Char('c') => {
                if let Err(err) = self.widget.controller_mut().request_face_change() {
                    tracing::warn!(%err, "card change refused");
                    self.status = err.to_string();
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        // Row 0 is the status line; the card is drawn from row 1 down.
        let Some(row) = row.checked_sub(1) else {
            self.mouse = None;
            return;
        };
        self.mouse = Some((column, row));
        let pointer = screen_to_ndc(
            column as f32 + 0.5,
            row as f32 + 0.5,
            self.renderer.width() as f32,
            self.renderer.height() as f32,
        );
        let on_card = self.renderer.covers(column as usize, row as usize);
        let card = self.widget.controller_mut();
        card.set_pointer(pointer.x, pointer.y);

        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if on_card {
                    card.pointer_down();
                } else {
                    self.orbit_drag = Some(column);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(last) = self.orbit_drag.replace(column) {
                    let dx = f32::from(column) - f32::from(last);
                    let per_column = std::f32::consts::TAU / self.renderer.width().max(1) as f32;
                    self.camera.orbit(-dx * per_column);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                card.pointer_up();
                self.orbit_drag = None;
            }
            _ => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        match self.widget.resize(viewport_px(width, self.options.cell_px)) {
            Ok(true) => self.mesh = self.widget.surface().to_mesh(),
            Ok(false) => {}
            Err(err) => {
                tracing::error!(%err, "resize failed");
                self.status = err.to_string();
            }
        }
        let azimuth = self.camera.azimuth();
        self.camera = camera_for(width, height, self.options.cell_px);
        self.camera.set_azimuth(azimuth);
        self.renderer = AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize);
        queue!(stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn update_hover(&mut self) {
        let over = self
            .mouse
            .is_some_and(|(x, y)| self.renderer.covers(x as usize, y as usize));
        reconcile_hover(self.widget.controller_mut(), over);
    }

    fn update(&mut self, dt: f32) {
        for event in self.widget.update(dt) {
            match event {
                CardEvent::FlipCompleted => {
                    self.status.clear();
                }
                CardEvent::FaceChanged { current, .. } => {
                    tracing::info!(face = %current, "showing new card");
                    self.front_texture.set_face(&current);
                    self.status = format!("now showing {}", face_label(&current));
                }
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (front, back) = self.widget.face_matrices();

        // Clear renderer
        self.renderer.clear();

        // Render both faces; culling keeps only the one facing the camera
        self.renderer
            .render_mesh(&self.mesh, &front, &self.camera, &self.front_texture);
        self.renderer
            .render_mesh(&self.mesh, &back, &self.camera, &BackTexture);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let card = self.widget.controller();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Card3D | {} | scale {:.2} | flip {:>3.0}° | FPS {:.1} | F=Flip C=Change card ←/→=Orbit Q=Quit {}",
                face_label(card.current_face()),
                card.scale(),
                card.flip_angle().to_degrees(),
                self.fps,
                self.status,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Bring the controller's hover flag in line with what is under the pointer.
///
/// Runs every frame rather than on transitions: a leave refused while the
/// card is flipping is sent again once the flip is over.
pub fn reconcile_hover(card: &mut CardController, over: bool) {
    let pointer_over = card.interaction().pointer_over;
    if over && !pointer_over {
        card.pointer_enter();
    } else if !over && pointer_over {
        card.pointer_leave();
    }
}

/// Viewport width in pixels for a terminal `columns` wide.
pub fn viewport_px(columns: u16, cell_px: f32) -> f32 {
    f32::from(columns) * cell_px
}

fn camera_for(width: u16, height: u16, cell_px: f32) -> Camera {
    let rows = height.saturating_sub(1).max(1);
    Camera::new(
        f32::from(width) * cell_px,
        f32::from(rows) * cell_px * CELL_ASPECT,
    )
}

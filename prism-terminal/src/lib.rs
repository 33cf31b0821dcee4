//! Terminal front end for the trackball prism viewer
//!
//! Mouse drags rotate the prism through the shared [`Rotator`], the scroll
//! wheel zooms through [`ZoomPolicy`], and every change is repainted with
//! the ASCII rasterizer.

use std::cell::RefCell;
use std::io::{self, stdout, Write};
use std::rc::Rc;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use prism_core::{Renderer, Rotator, SceneConfig, Surface, ViewError, ZoomPolicy};
use thiserror::Error;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Wheel delta reported for one scroll notch, in browser units.
const SCROLL_NOTCH: f64 = 100.0;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid view: {0}")]
    View(#[from] ViewError),
}

/// The terminal grid seen as a pointer surface.
///
/// Rows are counted twice so the trackball stays circular on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalSurface {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSurface {
    /// Pointer position at the centre of a cell, top-left origin.
    pub fn pointer(column: u16, row: u16) -> (f64, f64) {
        (
            column as f64 + 0.5,
            (row as f64 + 0.5) * renderer::CELL_ASPECT as f64,
        )
    }
}

impl Surface for TerminalSurface {
    fn client_size(&self) -> (f64, f64) {
        (
            self.columns as f64,
            self.rows as f64 * renderer::CELL_ASPECT as f64,
        )
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    config: SceneConfig,
    rotator: Rotator,
    zoom: ZoomPolicy,
    renderer: Rc<RefCell<AsciiRenderer>>,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: SceneConfig) -> Result<Self, TerminalError> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width, height)
    }

    /// Build the app for a terminal of the given size. The bottom row is
    /// kept for the status line.
    pub fn with_size(config: SceneConfig, columns: u16, rows: u16) -> Result<Self, TerminalError> {
        let surface = TerminalSurface {
            columns,
            rows: rows.saturating_sub(1),
        };
        let renderer = Rc::new(RefCell::new(AsciiRenderer::new(
            surface.columns as usize,
            surface.rows as usize,
            &config,
        )));

        let repaint_target = Rc::clone(&renderer);
        let rotator = Rotator::new(&surface, config.view.options())?.with_repaint(move |view| {
            // Infallible: the CPU rasterizer has no failure modes.
            let _ = repaint_target.borrow_mut().draw(view);
        });

        let mut app = Self {
            zoom: config.zoom.policy(),
            config,
            rotator,
            renderer,
            running: true,
        };
        app.rotator.notify_repaint();
        Ok(app)
    }

    pub fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), TerminalError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<(), TerminalError> {
        self.present()?;
        while self.running {
            // Static scene: block until the next input event
            let event = event::read()?;
            if self.handle_event(&event) {
                self.present()?;
            }
        }
        Ok(())
    }

    /// Apply one terminal event. Returns whether the frame needs presenting.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                kind: KeyEventKind::Press,
                ..
            }) => {
                self.running = false;
                false
            }
            Event::Resize(columns, rows) => {
                let surface = TerminalSurface {
                    columns: *columns,
                    rows: rows.saturating_sub(1),
                };
                self.renderer
                    .borrow_mut()
                    .resize(surface.columns as usize, surface.rows as usize);
                // The grid itself changed size, so the trackball follows it.
                self.rotator.resize_control_region(&surface);
                self.rotator.notify_repaint();
                true
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let (x, y) = TerminalSurface::pointer(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.rotator.pointer_down(x, y);
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => self.rotator.pointer_move(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                self.rotator.pointer_up();
                false
            }
            MouseEventKind::ScrollDown => self.zoom_by(SCROLL_NOTCH),
            MouseEventKind::ScrollUp => self.zoom_by(-SCROLL_NOTCH),
            _ => false,
        }
    }

    fn zoom_by(&mut self, delta_y: f64) -> bool {
        let distance = self.zoom.apply(self.rotator.view_distance(), delta_y);
        self.rotator.set_view_distance(distance);
        log::debug!("zoom distance {distance:.2}");
        self.rotator.notify_repaint();
        true
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.borrow().present(&mut stdout)?;

        // Draw status line
        let (_, rows) = self.renderer.borrow().viewport_size();
        queue!(
            stdout,
            cursor::MoveTo(0, rows as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Prism {}x{}x{} | distance {:.1} | drag=rotate wheel=zoom q=quit",
                self.config.prism.width,
                self.config.prism.height,
                self.config.prism.depth,
                self.rotator.view_distance()
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect as ScreenRect,
    widgets::Widget,
    Terminal,
};

use crate::animation::AnimationLoop;
use crate::demo::{demo_layout, Autopilot};
use crate::input::{InputEvent, InputHandler};
use crate::layout::{create_layout_queue, LayoutEvent, LayoutReceiver, LayoutWatcher, PageLayout};
use crate::render::{CaptionLog, CaptionLogWidget, FieldWidget, PathWidget, Projection, RobotWidget, StatusBar};
use crate::sim::{SimConfig, Simulation};

/// Trailing delay before a terminal resize re-places the robot
const RESIZE_SETTLE: Duration = Duration::from_millis(250);

/// Resize smaller than this many cells is treated as noise
const RESIZE_SIGNIFICANT_CELLS: u16 = 4;

/// Rows of recent captions drawn above the status bar
const CAPTION_LOG_ROWS: u16 = 3;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub layout_path: Option<PathBuf>,
    pub demo_mode: bool,
    pub autopilot: bool,
    pub cell_size: f32,
    pub show_grid: bool,
    pub show_path: bool,
    pub show_regions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout_path: None,
            demo_mode: false,
            autopilot: false,
            cell_size: crate::grid::DEFAULT_CELL_SIZE,
            show_grid: false,
            show_path: true,
            show_regions: true,
        }
    }
}

/// Main application state
pub struct App {
    config: AppConfig,
    sim: Simulation,
    animation_loop: AnimationLoop,
    input_handler: InputHandler,
    caption_log: CaptionLog,
    autopilot: Option<Autopilot>,

    // Display toggles
    show_grid: bool,
    show_path: bool,
    show_regions: bool,

    // Last drawn field area, for pointer mapping
    field_area: ScreenRect,

    // Resize debouncing
    pending_resize: Option<(u16, u16, Instant)>,
    terminal_size: (u16, u16),

    // Rising-edge detection for the caption log
    last_caption_visible: bool,
    last_caption_text: String,

    paused: bool,
    running: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let layout = if config.demo_mode {
            demo_layout()
        } else if let Some(ref path) = config.layout_path {
            PageLayout::load(path)?
        } else {
            return Err("either a layout file or demo mode is required".into());
        };

        let sim = Simulation::new(
            layout,
            SimConfig {
                cell_size: config.cell_size,
                ..SimConfig::default()
            },
        );
        let autopilot = config.autopilot.then(|| Autopilot::new(0xB07));

        Ok(Self {
            show_grid: config.show_grid,
            show_path: config.show_path,
            show_regions: config.show_regions,
            sim,
            autopilot,
            animation_loop: AnimationLoop::new(),
            input_handler: InputHandler::new(),
            caption_log: CaptionLog::new(50),
            field_area: ScreenRect::new(0, 0, 0, 0),
            pending_resize: None,
            terminal_size: (0, 0),
            last_caption_visible: false,
            last_caption_text: String::new(),
            paused: false,
            running: true,
            config,
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let size = terminal.size()?;
        self.terminal_size = (size.width, size.height);

        // Watch the layout file so edits move the obstacles live
        let (layout_tx, mut layout_rx) = create_layout_queue();
        let _watcher = match self.config.layout_path {
            Some(ref path) if !self.config.demo_mode => {
                Some(
                    LayoutWatcher::new(path, layout_tx.inner())
                        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
                )
            }
            _ => None,
        };

        // Initial placement and greeting
        self.sim.place_robot(self.animation_loop.now_ms());

        // Main loop
        while self.running {
            self.handle_input();
            self.process_layout_events(&mut layout_rx);
            self.settle_resize();

            if self.animation_loop.should_render() {
                let dt = self.animation_loop.delta_time();
                let now_ms = self.animation_loop.now_ms();

                if !self.paused {
                    if let Some(pilot) = self.autopilot.as_mut() {
                        let target = pilot.tick(dt, &self.sim.layout);
                        self.sim.set_target(target);
                    }
                    self.sim.tick(dt, now_ms);
                }
                self.record_new_captions();

                terminal.draw(|frame| {
                    let area = frame.area();
                    self.field_area = ScreenRect::new(
                        area.x,
                        area.y,
                        area.width,
                        area.height.saturating_sub(1),
                    );
                    self.render(area, frame.buffer_mut());
                })?;

                self.animation_loop.frame_rendered();
            }

            // Small sleep to prevent busy loop
            tokio::time::sleep(self.animation_loop.time_until_next_frame()).await;
        }

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn projection(&self) -> Projection {
        Projection::new(self.sim.viewport, self.field_area)
    }

    /// Handle user input
    fn handle_input(&mut self) {
        let timeout = Duration::from_millis(1);
        let now_ms = self.animation_loop.now_ms();

        if let Some(event) = self.input_handler.poll(timeout) {
            match event {
                InputEvent::Quit => self.running = false,

                InputEvent::TogglePause => self.paused = !self.paused,

                InputEvent::Scroll(rows) => {
                    let row_px = self.sim.viewport.height() / self.field_area.height.max(1) as f32;
                    self.sim.scroll_by(rows as f32 * row_px, now_ms);
                }

                InputEvent::ScrollHome => {
                    let back_to_top = -self.sim.viewport.top;
                    self.sim.scroll_by(back_to_top, now_ms);
                }

                InputEvent::ToggleGrid => self.show_grid = !self.show_grid,
                InputEvent::TogglePath => self.show_path = !self.show_path,
                InputEvent::ToggleRegions => self.show_regions = !self.show_regions,

                InputEvent::Respawn => self.sim.place_robot(now_ms),

                InputEvent::PointerMove { x, y } => {
                    if self.field_area.contains(ratatui::layout::Position { x, y }) {
                        let world = self.projection().to_world(x, y);
                        self.sim.set_target(world);
                    }
                }

                InputEvent::Resize { width, height } => {
                    self.pending_resize = Some((width, height, Instant::now()));
                }

                InputEvent::None => {}
            }
        }
    }

    /// Apply a settled resize: rebuild obstacles and, when the jump was
    /// significant, re-place the robot the way a fresh load would
    fn settle_resize(&mut self) {
        let Some((width, height, at)) = self.pending_resize else {
            return;
        };
        if at.elapsed() < RESIZE_SETTLE {
            return;
        }
        self.pending_resize = None;

        let (old_w, old_h) = self.terminal_size;
        self.terminal_size = (width, height);
        let now_ms = self.animation_loop.now_ms();
        self.sim.request_rebuild(now_ms);

        let significant = old_w.abs_diff(width) > RESIZE_SIGNIFICANT_CELLS
            || old_h.abs_diff(height) > RESIZE_SIGNIFICANT_CELLS;
        if significant {
            self.sim.place_robot(now_ms);
        }
    }

    /// Process incoming layout reloads from the watcher
    fn process_layout_events(&mut self, rx: &mut LayoutReceiver) {
        while let Ok(event) = rx.try_recv() {
            match event {
                LayoutEvent::Reloaded(layout) => {
                    self.sim.replace_layout(layout);
                }
            }
        }
    }

    /// Append newly fired captions to the log (rising edge on visibility or
    /// a text swap while visible)
    fn record_new_captions(&mut self) {
        let narrator = &self.sim.narrator;
        if narrator.visible
            && (!self.last_caption_visible || narrator.text != self.last_caption_text)
        {
            self.caption_log.add(narrator.text.clone());
            self.last_caption_text = narrator.text.clone();
        }
        self.last_caption_visible = narrator.visible;
    }

    /// Render the frame: field, path overlay, robot and bubble, caption log,
    /// status bar
    fn render(&self, area: ScreenRect, buf: &mut Buffer) {
        let projection = self.projection();

        FieldWidget::new(&self.sim.grid, &self.sim.layout, projection)
            .show_grid(self.show_grid)
            .show_regions(self.show_regions)
            .render(self.field_area, buf);

        if self.show_path && self.sim.robot.freeze_timer <= 0.0 {
            PathWidget::new(&self.sim.robot.waypoints, projection)
                .current_index(self.sim.robot.waypoint_index)
                .render(self.field_area, buf);
        }

        RobotWidget::new(&self.sim.robot, &self.sim.narrator, projection)
            .render(self.field_area, buf);

        if self.field_area.height > CAPTION_LOG_ROWS {
            let log_area = ScreenRect::new(
                self.field_area.x + 1,
                self.field_area.bottom() - CAPTION_LOG_ROWS,
                self.field_area.width.saturating_sub(2).min(46),
                CAPTION_LOG_ROWS,
            );
            CaptionLogWidget::new(&self.caption_log).render(log_area, buf);
        }

        let status_area = ScreenRect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        StatusBar::new(&self.sim.robot)
            .fps(self.animation_loop.fps())
            .paused(self.paused)
            .caption(self.sim.narrator.visible.then(|| self.sim.narrator.text.as_str()))
            .render(status_area, buf);
    }
}

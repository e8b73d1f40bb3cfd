use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use softbuffer::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::Window;

use cellchain::cli::StartupConfig;
use cellchain::commands::Cmd;
use cellchain::config::AppConfig;
use cellchain::messages::{AppMsg, CanvasMsg, MenuMsg, Msg};
use cellchain::model::AppModel;
use cellchain::update::update;

use super::input::handle_key;
use crate::view::Renderer;

/// Interval between frame ticks (load merge + one overlap step)
const TICK_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    model: AppModel,
    renderer: Option<Renderer>,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    last_tick: Instant,
    modifiers: ModifiersState,
    mouse_position: (f64, f64),
    should_quit: bool,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl App {
    pub fn new(
        window_width: u32,
        window_height: u32,
        config: AppConfig,
        startup: StartupConfig,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let mut model = AppModel::new(window_width, window_height, config);

        if let Some(path) = startup.state_path {
            model.state_path = path;
        }

        if startup.restore && model.state_path.exists() {
            update(&mut model, Msg::App(AppMsg::LoadState));
        }
        if !startup.files.is_empty() {
            update(&mut model, Msg::Canvas(CanvasMsg::OpenFiles(startup.files)));
        }
        if let Some(cell) = startup.select {
            update(&mut model, Msg::Canvas(CanvasMsg::SelectCell { panel: 0, cell }));
        }

        Self {
            model,
            renderer: None,
            window: None,
            context: None,
            last_tick: Instant::now(),
            modifiers: ModifiersState::empty(),
            mouse_position: (0.0, 0.0),
            should_quit: false,
            msg_tx,
            msg_rx,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.model.window_size;
        let window_attributes = Window::default_attributes()
            .with_title("Cellchain")
            .with_inner_size(LogicalSize::new(width, height));

        let window = Rc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );
        let context = Context::new(Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create graphics context: {}", e))?;

        let config = &self.model.config;
        let renderer = Renderer::new(
            Rc::clone(&window),
            &context,
            config.font_path.as_deref(),
            config.font_size,
        )?;

        let size = window.inner_size();
        self.model.window_size = (size.width, size.height);
        self.renderer = Some(renderer);
        self.window = Some(window);
        self.context = Some(context);
        Ok(())
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Option<Cmd> {
        match event {
            WindowEvent::Resized(size) => {
                update(&mut self.model, Msg::resize(size.width, size.height))
            }
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                handle_key(
                    &mut self.model,
                    event.logical_key.clone(),
                    self.modifiers.control_key(),
                    self.modifiers.super_key(),
                )
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x, position.y);
                update(
                    &mut self.model,
                    Msg::Canvas(CanvasMsg::PointerMoved {
                        x: position.x,
                        y: position.y,
                    }),
                )
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.mouse_position;
                let msg = match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => CanvasMsg::LeftPress { x, y },
                    (MouseButton::Left, ElementState::Released) => CanvasMsg::LeftRelease { x, y },
                    (MouseButton::Right, ElementState::Pressed) => CanvasMsg::RightPress { x, y },
                    (MouseButton::Right, ElementState::Released) => {
                        CanvasMsg::RightRelease { x, y }
                    }
                    _ => return None,
                };
                update(&mut self.model, Msg::Canvas(msg))
            }
            WindowEvent::DroppedFile(path) => update(
                &mut self.model,
                Msg::Canvas(CanvasMsg::OpenFiles(vec![path.clone()])),
            ),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!("Render failed: {:#}", e);
                }
                None
            }
            _ => None,
        }
    }

    fn render(&mut self) -> Result<()> {
        if let Some(renderer) = &mut self.renderer {
            renderer.render(&self.model)?;
        }
        Ok(())
    }

    fn tick(&mut self) -> bool {
        let mut needs_redraw = false;
        for msg in [Msg::tick(), Msg::App(AppMsg::BlinkCaret)] {
            if let Some(cmd) = update(&mut self.model, msg) {
                needs_redraw |= cmd.needs_redraw();
                self.process_cmd(cmd);
            }
        }
        needs_redraw
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Redraw => {}
            Cmd::Quit => self.should_quit = true,
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }

            // =====================================================================
            // File Dialogs (using rfd)
            // =====================================================================
            Cmd::ShowOpenPanelDialog {
                world_x,
                world_y,
                start_dir,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let mut dlg = csv_dialog();
                    if let Some(dir) = start_dir {
                        dlg = dlg.set_directory(dir);
                    }
                    let path = dlg.pick_file();
                    let _ = tx.send(Msg::Menu(MenuMsg::LoadDialogResult {
                        path,
                        world_x,
                        world_y,
                    }));
                });
            }

            Cmd::ShowSavePanelDialog {
                panel,
                suggested_path,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let mut dlg = csv_dialog();
                    if let Some(ref path) = suggested_path {
                        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                            dlg = dlg.set_directory(dir);
                        }
                        if let Some(name) = path.file_name() {
                            dlg = dlg.set_file_name(name.to_string_lossy());
                        }
                    }
                    let path: Option<PathBuf> = dlg.save_file();
                    let _ = tx.send(Msg::Menu(MenuMsg::SaveDialogResult { panel, path }));
                });
            }
        }
    }

    fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            if let Some(cmd) = update(&mut self.model, msg) {
                if cmd.needs_redraw() {
                    needs_redraw = true;
                }
                self.process_cmd(cmd);
            }
        }
        needs_redraw
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn csv_dialog() -> rfd::FileDialog {
    rfd::FileDialog::new()
        .add_filter("Delimited text", &["csv", "tsv", "psv", "txt"])
        .add_filter("All files", &["*"])
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let should_exit = matches!(event, WindowEvent::CloseRequested);
        let is_ours = self
            .window
            .as_ref()
            .is_some_and(|window| window.id() == window_id);
        let should_redraw = if is_ours && !should_exit {
            match self.handle_event(&event) {
                Some(cmd) => {
                    let needs_redraw = cmd.needs_redraw();
                    self.process_cmd(cmd);
                    needs_redraw
                }
                None => false,
            }
        } else {
            false
        };

        if should_exit || self.should_quit {
            event_loop.exit();
        } else if should_redraw {
            self.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.process_async_messages() {
            self.request_redraw();
        }

        let now = Instant::now();
        if now.duration_since(self.last_tick) >= TICK_INTERVAL {
            self.last_tick = now;
            if self.tick() {
                self.request_redraw();
            }
        }

        if self.should_quit {
            event_loop.exit();
        }
    }
}

//! Core application state and lifecycle.

use crate::events::{cursor_icon, key_identifier, mouse_button, wheel_delta};
use kurbo::{Point, Size};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tileplan_core::input::{KeyEvent, PointerEvent};
use tileplan_core::{ConfigError, PlannerConfig, Session, SessionEvent};
use tileplan_render::{FrameStyle, RenderResult, RendererError, VelloSurface, render_frame};
use vello::util::{RenderContext, RenderSurface};
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Environment variable naming a JSON planner config file.
pub const CONFIG_ENV_VAR: &str = "TILEPLAN_CONFIG";

/// Application errors. All of these are fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("No drawing surface available: {0}")]
    Surface(String),
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub style: FrameStyle,
    pub planner: PlannerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "TilePlan".to_string(),
            width: 1280,
            height: 800,
            style: FrameStyle::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the planner config loaded from `path` if given.
    pub fn from_config_path(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let planner = match path {
            Some(path) => PlannerConfig::load(path)?,
            None => PlannerConfig::default(),
        };
        Ok(Self {
            planner,
            ..Self::default()
        })
    }

    /// Defaults, with the planner config loaded from [`CONFIG_ENV_VAR`] if set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config_path(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }
}

/// Runtime state that exists once a surface is available.
struct AppState {
    window: Arc<Window>,
    surface: RenderSurface<'static>,
    renderer: vello::Renderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,
    draw_surface: VelloSurface,
    session: Session,
    last_frame: Instant,
}

impl AppState {
    /// React to what a session handler changed.
    fn apply(&self, event: SessionEvent) {
        if let SessionEvent::ToolChanged(style) = event {
            self.window.set_cursor(cursor_icon(style));
        }
    }

    /// Run the frame driver and present the result.
    fn redraw(&mut self, render_cx: &RenderContext, style: &FrameStyle) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let viewport = Size::new(
            self.surface.config.width as f64,
            self.surface.config.height as f64,
        );
        render_frame(&mut self.session, &mut self.draw_surface, viewport, style, dt);

        if let Err(e) = self.present(render_cx) {
            log::warn!("{}", e);
        }
        self.window.request_redraw();
    }

    fn present(&mut self, render_cx: &RenderContext) -> RenderResult<()> {
        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(format!("Failed to get surface texture: {e:?}")))?;

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.draw_surface.background(),
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello writes through storage bindings, which WebGPU only allows on
        // Rgba8Unorm; the result is blitted to the surface format afterwards.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.renderer
            .render_to_texture(
                device,
                queue,
                self.draw_surface.scene(),
                &render_texture_view,
                &params,
            )
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("blit encoder"),
        });
        self.texture_blitter
            .copy(device, &mut encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(encoder.finish()));

        surface_texture.present();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
type SurfaceResult = Result<(RenderContext, RenderSurface<'static>), AppError>;
#[cfg(target_arch = "wasm32")]
type PendingSurface = std::rc::Rc<std::cell::RefCell<Option<SurfaceResult>>>;

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: RenderContext,
    /// Window waiting for async surface creation (WASM only).
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    pending_surface: PendingSurface,
    /// Fatal error that stopped the event loop.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: RenderContext::new(),
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            pending_surface: Default::default(),
            error: None,
        }
    }

    /// Run the application until the window closes or setup fails.
    pub async fn run(config: AppConfig) -> Result<(), AppError> {
        config.planner.validate()?;
        let event_loop = EventLoop::new()?;
        let app = App::new(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
            return Ok(());
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
            return match app.error.take() {
                Some(e) => Err(e),
                None => Ok(()),
            };
        }
    }

    /// Log a fatal error and stop the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn window_attributes(&self) -> Result<WindowAttributes, AppError> {
        Ok(Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height)))
    }

    /// On WASM, attach a full-viewport canvas to the page.
    #[cfg(target_arch = "wasm32")]
    fn window_attributes(&self) -> Result<WindowAttributes, AppError> {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let no_canvas = |what: &str| AppError::Surface(format!("{what} unavailable"));
        let web_window = web_sys::window().ok_or_else(|| no_canvas("window"))?;
        let document = web_window.document().ok_or_else(|| no_canvas("document"))?;

        let canvas = document
            .get_element_by_id("tileplan-canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .or_else(|| {
                let body = document.body()?;
                let canvas = document.create_element("canvas").ok()?;
                canvas.set_id("tileplan-canvas");
                body.append_child(&canvas).ok()?;
                canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
            })
            .ok_or_else(|| no_canvas("canvas"))?;

        let (width, height) = self.browser_viewport();
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("display", "block");
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("top", "0");
        let _ = style.set_property("left", "0");

        log::info!("Canvas created: {}x{}", width, height);

        Ok(Window::default_attributes()
            .with_title(&self.config.title)
            .with_canvas(Some(canvas)))
    }

    /// Browser viewport in physical pixels.
    #[cfg(target_arch = "wasm32")]
    fn browser_viewport(&self) -> (u32, u32) {
        let Some(web_window) = web_sys::window() else {
            return (self.config.width, self.config.height);
        };
        let dpr = web_window.device_pixel_ratio();
        let width = web_window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(self.config.width as f64);
        let height = web_window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(self.config.height as f64);
        ((width * dpr) as u32, (height * dpr) as u32)
    }

    /// Create the window and start surface creation.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");
        let window = Arc::new(event_loop.create_window(self.window_attributes()?)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let surface = pollster::block_on(self.render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .map_err(|e| AppError::Surface(e.to_string()))?;
            return self.finish_init(window, surface);
        }

        // On WASM, create the surface asynchronously and pick it up from
        // `window_event` once ready.
        #[cfg(target_arch = "wasm32")]
        {
            let slot = self.pending_surface.clone();
            let target = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let mut render_cx = RenderContext::new();
                let surface = render_cx
                    .create_surface(target.clone(), width, height, PresentMode::AutoVsync)
                    .await;
                let result = match surface {
                    Ok(surface) => Ok((render_cx, surface)),
                    Err(e) => Err(AppError::Surface(e.to_string())),
                };
                *slot.borrow_mut() = Some(result);
                target.request_redraw();
            });
            self.pending_window = Some(window);
            return Ok(());
        }
    }

    /// Finish a pending async surface creation, if it has completed.
    #[cfg(target_arch = "wasm32")]
    fn poll_pending_surface(&mut self) -> Result<(), AppError> {
        let ready = self.pending_surface.borrow_mut().take();
        let Some(result) = ready else {
            return Ok(());
        };
        let (render_cx, surface) = result?;
        self.render_cx = render_cx;
        let window = self
            .pending_window
            .take()
            .ok_or_else(|| AppError::Surface("surface created without a window".to_string()))?;
        log::info!("Surface created successfully");
        self.finish_init(window, surface)
    }

    /// Finish initialization after surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> Result<(), AppError> {
        let device = &self.render_cx.devices[surface.dev_id].device;

        let renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut session = Session::from_config(&self.config.planner)?;
        session.set_viewport_size(surface.config.width as f64, surface.config.height as f64);
        window.set_cursor(cursor_icon(session.cursor()));

        log::info!(
            "TilePlan initialized - {}x{}, grid {}x{} cells of {}",
            surface.config.width,
            surface.config.height,
            session.grid.cols(),
            session.grid.rows(),
            session.grid.cell_size(),
        );

        window.request_redraw();
        self.state = Some(AppState {
            window,
            surface,
            renderer,
            texture_blitter,
            draw_surface: VelloSurface::new(),
            session,
            last_frame: Instant::now(),
        });
        self.pending_window = None;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Err(e) = self.poll_pending_surface() {
                self.fail(event_loop, e);
                return;
            }
        }

        let Some(state) = self.state.as_mut() else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Closing with {} placed entities", state.session.placements.len());
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state.session.set_viewport_size(size.width as f64, size.height as f64);
                self.render_cx.resize_surface(&mut state.surface, size.width, size.height);
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.redraw(&self.render_cx, &self.config.style);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = state.session.handle_pointer(PointerEvent::Move {
                    position: Point::new(position.x, position.y),
                });
                state.apply(event);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let Some(button) = mouse_button(button) else {
                    return;
                };
                let position = state.session.input.pointer_position;
                let pointer = match button_state {
                    ElementState::Pressed => PointerEvent::Down { position, button },
                    ElementState::Released => PointerEvent::Up { position, button },
                };
                let event = state.session.handle_pointer(pointer);
                state.apply(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = state.session.handle_pointer(PointerEvent::Wheel {
                    position: state.session.input.pointer_position,
                    delta: wheel_delta(delta),
                });
                state.apply(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let Some(key) = key_identifier(&event.logical_key) else {
                    return;
                };
                log::debug!("Key pressed: {}", key);
                let event = state.session.handle_key_event(&KeyEvent::Pressed(key));
                state.apply(event);
            }

            WindowEvent::Focused(false) => {
                state.session.input.release_all();
            }

            _ => {}
        }
    }
}

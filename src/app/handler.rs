use std::sync::Arc;

use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::app::app::App;
use crate::error::GlobeError;
use crate::picture::ColorField;
use crate::settings::Settings;

pub struct AppHandler {
    pub app: Option<App>,
    pub field: ColorField,
    pub dataset_label: String,
    pub settings: Settings,
    pub runtime: Runtime,
    /// Set when the window or GPU could not be created; checked after the loop exits.
    pub startup_error: Option<GlobeError>,
}

impl AppHandler {
    pub fn new(field: ColorField, dataset_label: String, settings: Settings, runtime: Runtime) -> Self {
        Self {
            app: None,
            field,
            dataset_label,
            settings,
            runtime,
            startup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<App, GlobeError> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("earthpic-rs - {}", self.dataset_label))
            .with_inner_size(winit::dpi::LogicalSize::new(800.0, 800.0));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.runtime.block_on(App::new(
            window,
            &self.field,
            self.dataset_label.clone(),
            self.settings.clone(),
        ))
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(app) => {
                app.window.request_redraw();
                self.app = Some(app);
            }
            Err(err) => {
                log::error!("Failed to start viewer: {err}");
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
    }
}

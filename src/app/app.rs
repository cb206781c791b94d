use std::sync::Arc;
use std::time::Instant;

use egui_wgpu::ScreenDescriptor;
use egui_winit::State;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use crate::error::GlobeError;
use crate::globe::{GlobeController, GlobeMesh, Tick};
use crate::picture::ColorField;
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::ui::{Ui, UiActions, UiStatus};

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

impl EventResponse {
    fn idle() -> Self {
        Self {
            repaint: false,
            exit: false,
        }
    }

    fn repaint() -> Self {
        Self {
            repaint: true,
            exit: false,
        }
    }

    fn exit() -> Self {
        Self {
            repaint: false,
            exit: true,
        }
    }
}

pub struct App {
    pub window: Arc<Window>,
    ui: Ui,
    renderer: Renderer,
    controller: GlobeController,
    dataset_label: String,
    sample_count: usize,
    row_count: usize,
    cursor_pos: Option<[f64; 2]>,
    active_touch: Option<u64>,
    egui_state: State,
    egui_wants_pointer: bool,
    settings: Settings,
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        field: &ColorField,
        dataset_label: String,
        settings: Settings,
    ) -> Result<Self, GlobeError> {
        let mut renderer = Renderer::new(window.clone(), &settings.display).await?;

        let egui_ctx = renderer.egui_context();
        let egui_state = State::new(
            egui_ctx,
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let globe = &settings.globe;
        let mesh = GlobeMesh::build(
            field,
            globe.lookup,
            globe.radius,
            globe.width_segments,
            globe.height_segments,
        );
        renderer.upload_mesh(&mesh);

        let controller = GlobeController::new(
            settings.interaction.pixels_per_radian,
            settings.interaction.recenter_duration(),
        );

        Ok(Self {
            window,
            ui: Ui::new(),
            renderer,
            controller,
            dataset_label,
            sample_count: field.sample_count(),
            row_count: field.row_count(),
            cursor_pos: None,
            active_touch: None,
            egui_state,
            egui_wants_pointer: false,
            settings,
        })
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> EventResponse {
        let egui_response = self.egui_state.on_window_event(&self.window, event);
        let egui_repaint = EventResponse {
            repaint: egui_response.repaint,
            exit: false,
        };

        match event {
            WindowEvent::CloseRequested => return EventResponse::exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if egui_response.consumed || event.state != ElementState::Pressed {
                    return egui_repaint;
                }
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => return EventResponse::exit(),
                    Key::Character(c) if c.eq_ignore_ascii_case("r") && !event.repeat => {
                        if self.controller.recenter(Instant::now()) {
                            return EventResponse::repaint();
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
                return EventResponse::repaint();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    match err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            self.renderer.resize(self.window.inner_size());
                        }
                        other => log::error!("Render error: {other:?}"),
                    }
                }
                // Keep frames coming while the recenter animation runs
                return EventResponse {
                    repaint: self.controller.is_animating(),
                    exit: false,
                };
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if self.egui_wants_pointer && *state == ElementState::Pressed {
                    return egui_repaint;
                }
                match state {
                    ElementState::Pressed => {
                        if let Some(pos) = self.cursor_pos {
                            self.controller.on_pointer_down(pos);
                        }
                    }
                    ElementState::Released => self.controller.on_pointer_up(),
                }
                return EventResponse::repaint();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = [position.x, position.y];
                self.cursor_pos = Some(pos);
                if self.controller.on_pointer_move(pos) {
                    return EventResponse::repaint();
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_pos = None;
            }
            WindowEvent::Touch(touch) => {
                let pos = [touch.location.x, touch.location.y];
                match touch.phase {
                    TouchPhase::Started => {
                        if self.active_touch.is_none() && !self.egui_wants_pointer {
                            self.active_touch = Some(touch.id);
                            self.controller.on_pointer_down(pos);
                        }
                    }
                    TouchPhase::Moved => {
                        if self.active_touch == Some(touch.id) {
                            self.controller.on_pointer_move(pos);
                        }
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        if self.active_touch == Some(touch.id) {
                            self.active_touch = None;
                            self.controller.on_pointer_up();
                        }
                    }
                }
                return EventResponse::repaint();
            }
            _ => {}
        }

        if egui_response.repaint {
            egui_repaint
        } else {
            EventResponse::idle()
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.controller.tick(Instant::now()) == Tick::Finished {
            log::debug!("Recenter finished");
        }

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.renderer.egui_context();

        let status = UiStatus {
            dataset: &self.dataset_label,
            samples: self.sample_count,
            rows: self.row_count,
            animating: self.controller.is_animating(),
            dragging: self.controller.is_dragging(),
        };
        let mut actions = UiActions::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            actions = self.ui.show(ctx, &status, &mut self.settings);
        });

        // Update egui pointer state for next frame
        self.egui_wants_pointer = egui_ctx.wants_pointer_input();

        if actions.recenter {
            self.controller.recenter(Instant::now());
        }
        if actions.display_changed {
            self.renderer.update_display(&self.settings.display);
        }

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [self.window.inner_size().width, self.window.inner_size().height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let model = self.controller.orientation().to_f32();
        self.renderer
            .render(&model, paint_jobs, full_output.textures_delta, screen_descriptor)
    }
}

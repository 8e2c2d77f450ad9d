use egui::epaint::Shadow;

use super::session::DwellStatus;
use super::zone::{Pose, Transition};

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub resolution: (u32, u32),
    pub pose: Pose,
    pub frames: u64,
}

/// What the player sees on top of the 3D view.
pub struct HudView<'a> {
    /// `None` once the letter is revealed.
    pub zone_title: Option<&'a str>,
    pub dwell: Option<DwellStatus>,
    pub pointer_captured: bool,
    /// Title of the room behind the door under the crosshair.
    pub hovered_door: Option<&'a str>,
    pub letter: Option<&'a str>,
}

/// What the player asked for through the HUD this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudResponse {
    /// "Back to the museum" on the letter page.
    pub restart: bool,
}

pub struct Hud {
    pub stats_visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

fn dwell_label(status: &DwellStatus) -> &'static str {
    match status.transition {
        Transition::EnterZone(_) => "Entering",
        Transition::ExitToParent => "Back to the corridor",
        Transition::RevealContent => "Opening",
    }
}

impl Hud {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(14.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // overlay pass has no depth attachment
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            stats_visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame: zone title and hints, the hovered door, dwell
    /// progress, the letter once revealed, and the F3 stats panel when
    /// `stats` is `Some`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        hud: &HudView<'_>,
        stats: Option<&DebugStats>,
    ) -> HudResponse {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut response = HudResponse::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── Letter: replaces the 3D HUD entirely ─────────────────────────
            if let Some(letter) = hud.letter {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading("To my partner in crime,");
                        ui.add_space(20.0);
                        ui.label(letter);
                        ui.add_space(30.0);
                        if ui.button("Back to the museum").clicked() {
                            response.restart = true;
                        }
                    });
                });
                return;
            }

            // ── Zone title and controls ──────────────────────────────────────
            egui::Area::new(egui::Id::new("zone_hud"))
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                        .inner_margin(egui::Margin::same(8.0))
                        .rounding(4.0)
                        .show(ui, |ui: &mut egui::Ui| {
                            if let Some(title) = hud.zone_title {
                                ui.label(title);
                            }
                            ui.label("WASD - walk");
                            if hud.pointer_captured {
                                ui.label("MOUSE - look around (Esc to release)");
                            } else {
                                ui.label("CLICK - enable mouse-look");
                            }
                            ui.label("CLICK DOORS - enter rooms");
                        });
                });

            // ── Hovered door ─────────────────────────────────────────────────
            if let Some(title) = hud.hovered_door {
                egui::Area::new(egui::Id::new("door_hint"))
                    .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 40.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(6.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(title);
                                ui.label("click to enter");
                            });
                    });
            }

            // ── Dwell progress ───────────────────────────────────────────────
            if let Some(status) = &hud.dwell {
                egui::Area::new(egui::Id::new("dwell_hud"))
                    .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
                    .show(ctx, |ui| {
                        ui.set_width(240.0);
                        ui.add(
                            egui::ProgressBar::new(status.progress)
                                .text(dwell_label(status)),
                        );
                    });
            }

            // ── F3: stats panel ──────────────────────────────────────────────
            if let Some(stats) = stats {
                egui::Area::new(egui::Id::new("stats_panel"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!("Frame: {:.2} ms", stats.frame_time_avg_ms));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                                let p = stats.pose.position;
                                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                                ui.label(format!(
                                    "Yaw: {:.1}°  Pitch: {:.1}°",
                                    stats.pose.yaw.to_degrees(),
                                    stats.pose.pitch.to_degrees()
                                ));
                                ui.label(format!("Steps: {}", stats.frames));
                            });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        response
    }
}

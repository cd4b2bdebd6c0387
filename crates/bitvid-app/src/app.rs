use crate::playback::Playback;
use crate::playback::file_source::FileSource;
use anyhow::Context as _;
use bitvid_core::prelude::*;
use egui::{Color32, ColorImage, TextureHandle, TextureOptions};
use log::{error, info};
use std::path::Path;

// Set bits render as dark pixels on a pale background, like the
// monochrome LCDs this format was made for.
const PIXEL_ON: Color32 = Color32::from_rgb(0x20, 0x29, 0x20);
const PIXEL_OFF: Color32 = Color32::from_rgb(0xC5, 0xD1, 0xB5);

enum State {
    Waiting,
    Playing(Playback),
    Error(String),
}

pub struct App {
    state: State,
    texture: Option<TextureHandle>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: State::Waiting,
            texture: None,
        }
    }

    /// Starts out playing the stream at `path` (command-line launch).
    pub fn with_stream_path(path: impl AsRef<Path>) -> Self {
        let mut app = Self::new();
        app.load_path(path.as_ref());
        app
    }

    fn load_path(&mut self, path: &Path) {
        match Self::open_playback(path) {
            Ok(playback) => {
                info!("playing {}", path.display());
                self.state = State::Playing(playback);
            }
            Err(err) => {
                error!("failed to open {}: {err:#}", path.display());
                self.state = State::Error(format!("{err:#}"));
            }
        }
    }

    fn open_playback(path: &Path) -> anyhow::Result<Playback> {
        let source = FileSource::open(path)
            .with_context(|| format!("Failed to open stream '{}'", path.display()))?;
        Ok(Playback::new(Box::new(source)))
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let mut quit = false;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                quit = true;
            }
            if i.key_pressed(egui::Key::Space)
                && let State::Playing(playback) = &mut self.state
            {
                playback.toggle_paused();
            }
            if i.key_pressed(egui::Key::R) && matches!(self.state, State::Error(_)) {
                self.state = State::Waiting;
            }
        });
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Runs the tick-driven decode loop and schedules the repaint that
    /// will land on the next tick. A decode failure ends playback for
    /// good and surfaces in the error view.
    fn pump_playback(&mut self, ctx: &egui::Context) {
        if let State::Playing(playback) = &mut self.state {
            match playback.pump() {
                Ok(delay) => ctx.request_repaint_after(delay),
                Err(err) => {
                    error!("playback stopped: {err}");
                    self.state = State::Error(err.to_string());
                }
            }
        }
    }

    fn render_display(&mut self, ui: &mut egui::Ui) {
        let State::Playing(playback) = &self.state else {
            return;
        };

        // Expand the packed bitmap to egui's ColorImage
        let frame = playback.frame();
        let mut rgba = Vec::with_capacity(WIDTH * HEIGHT * 4);
        for &byte in frame.as_bytes().iter() {
            for bit in 0..8 {
                let color = if byte & (0x80 >> bit) != 0 {
                    PIXEL_ON
                } else {
                    PIXEL_OFF
                };
                rgba.extend_from_slice(&[color.r(), color.g(), color.b(), 255]);
            }
        }
        let color_image = ColorImage::from_rgba_unmultiplied([WIDTH, HEIGHT], &rgba);

        // Create or update texture
        let texture = self.texture.get_or_insert_with(|| {
            ui.ctx().load_texture(
                "bitvid_frame",
                color_image.clone(),
                TextureOptions::NEAREST, // Pixel-perfect scaling
            )
        });
        texture.set(color_image, TextureOptions::NEAREST);

        // Display the texture, scaled to fill available space
        let available_size = ui.available_size();
        let aspect_ratio = WIDTH as f32 / HEIGHT as f32;

        let (width, height) = if available_size.x / available_size.y > aspect_ratio {
            // limit by height
            (available_size.y * aspect_ratio, available_size.y)
        } else {
            // limit by width
            (available_size.x, available_size.x / aspect_ratio)
        };

        ui.centered_and_justified(|ui| {
            ui.image((texture.id(), egui::vec2(width, height)));
        });
    }

    fn render_ui(&mut self, ctx: &egui::Context) {
        match &self.state {
            State::Waiting => {
                let mut picked = None;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.heading("Open a Stream");
                            ui.add_space(10.0);

                            if ui.button("Browse for stream...").clicked()
                                && let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Encoded video", &["enc"])
                                    .pick_file()
                            {
                                picked = Some(path);
                            }
                            ui.add_space(10.0);

                            ui.label("Or drag and drop an .enc file");
                        });
                    });
                });
                if let Some(path) = picked {
                    self.load_path(&path);
                }
            }
            State::Playing(_) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.render_display(ui);
                });

                if let State::Playing(playback) = &self.state
                    && playback.paused()
                {
                    egui::Window::new("Paused")
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .collapsible(false)
                        .resizable(false)
                        .show(ctx, |ui| {
                            ui.label("Press Space to resume");
                        });
                }
            }
            State::Error(msg) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.heading("Playback Error");
                            ui.add_space(10.0);

                            ui.label(egui::RichText::new(msg).color(egui::Color32::RED));
                            ui.add_space(10.0);

                            ui.label("Press R to go back");
                        });
                    });
                });
            }
        }

        self.handle_file_drop(ctx);
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        // Preview hovering files
        if !ctx.input(|i| i.raw.hovered_files.is_empty()) {
            use egui::*;

            let painter =
                ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));

            let content_rect = ctx.content_rect();
            painter.rect_filled(content_rect, 0.0, Color32::from_black_alpha(192));
            painter.text(
                content_rect.center(),
                Align2::CENTER_CENTER,
                "Drop stream file here",
                FontId::proportional(40.0),
                Color32::WHITE,
            );
        }

        // Handle dropped files
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            info!("received drop file event: {}", path.display());
            self.load_path(&path);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.pump_playback(ctx);
        self.render_ui(ctx);
    }
}

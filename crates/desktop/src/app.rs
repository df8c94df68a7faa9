//! LifeOS Desktop — egui app state and UI.

use chrono::Utc;
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

use lib::config::Config;
use lib::conversation::Notifier;
use lib::message::Message;
use lib::platform::{AppPlatform, DesktopPlatform};
use lib::present;
use lib::view::{InputState, Tab, ViewController};

const CHAT_INPUT_HEIGHT: f32 = 48.0;
/// The input grows with its line count up to this height, then scrolls.
const CHAT_INPUT_MAX_HEIGHT: f32 = 120.0;
const SEND_BUTTON_WIDTH: f32 = 64.0;
const CHAT_MESSAGES_MIN_HEIGHT: f32 = 80.0;
/// Bubbles take at most this share of the thread width.
const BUBBLE_MAX_WIDTH: f32 = 0.8;
/// Repaint cadence while a reply is pending (spinner, and a fallback if a wake-up is missed).
const PENDING_REPAINT: Duration = Duration::from_millis(250);

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

pub struct LifeOsApp {
    view: ViewController,
    app_name: String,
    /// Dropped after `view` so a pending reply is cancelled before the runtime shuts down.
    _runtime: tokio::runtime::Runtime,
}

impl LifeOsApp {
    /// Space between the header and the content below.
    const SCREEN_TITLE_BOTTOM_SPACING: f32 = 12.0;

    pub fn new(cc: &eframe::CreationContext<'_>, runtime: tokio::runtime::Runtime) -> Self {
        let (config, config_path) = match lib::config::load_config(None) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("failed to load config, using defaults: {}", e);
                (Config::default(), lib::config::default_config_path())
            }
        };

        let ctx = cc.egui_ctx.clone();
        let notifier: Notifier = Arc::new(move || ctx.request_repaint());
        let platform: Arc<dyn AppPlatform> = Arc::new(DesktopPlatform::new(
            config.install.app_name.clone(),
            DesktopPlatform::default_launcher_path(),
            lib::config::assets_dir(&config_path),
        ));
        let view = ViewController::from_config(
            &config,
            &config_path,
            runtime.handle().clone(),
            Some(platform),
            Some(notifier),
        );
        log::info!("desktop started");

        Self {
            view,
            app_name: config.install.app_name,
            _runtime: runtime,
        }
    }

    fn ui_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("LifeOS");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(self.view.header_title()).weak());
            });
        });
        ui.add_space(8.0);
    }

    fn ui_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.columns(2, |columns| {
            for (column, tab) in columns.iter_mut().zip([Tab::Contexts, Tab::Chat]) {
                column.vertical_centered(|ui| {
                    let selected = self.view.active_tab() == tab;
                    if ui.selectable_label(selected, tab.label()).clicked() {
                        self.view.select_tab(tab);
                    }
                });
            }
        });
        ui.add_space(4.0);
    }

    fn ui_install_banner(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(format!("Install {}", self.app_name)).strong());
                ui.label(
                    egui::RichText::new("Add to your launcher for quick access")
                        .small()
                        .weak(),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").clicked() {
                    self.view.dismiss_install();
                }
                if self.view.install_prompting() {
                    ui.spinner();
                } else if ui
                    .add_enabled(self.view.can_install(), egui::Button::new("Install"))
                    .clicked()
                {
                    self.view.install();
                }
            });
        });
        ui.add_space(6.0);
    }

    fn ui_contexts(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("Contexts");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+ New").clicked() {
                    self.view.open_dialog();
                }
            });
        });
        ui.add_space(Self::SCREEN_TITLE_BOTTOM_SPACING);

        let rows = self.view.context_rows(Utc::now());
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in &rows {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new(&row.label).strong());
                            ui.label(egui::RichText::new(&row.age).small().weak());
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(&row.description).small().weak());
                        });
                    });
                    ui.separator();
                }
                if rows.is_empty() {
                    ui.label("No contexts yet. Create one with + New.");
                }
            });
    }

    /// Renders one message as a bubble: user messages on the right, assistant on the left.
    fn render_message(ui: &mut egui::Ui, m: &Message) {
        let max_width = ui.available_width() * BUBBLE_MAX_WIDTH;
        let (fill, text_color, stroke) = {
            let visuals = ui.visuals();
            if m.is_user() {
                (USER_BUBBLE, egui::Color32::WHITE, egui::Stroke::NONE)
            } else {
                (
                    visuals.extreme_bg_color,
                    visuals.text_color(),
                    visuals.widgets.noninteractive.bg_stroke,
                )
            }
        };
        let layout = if m.is_user() {
            egui::Layout::right_to_left(egui::Align::TOP)
        } else {
            egui::Layout::left_to_right(egui::Align::TOP)
        };
        ui.with_layout(layout, |ui| {
            egui::Frame::none()
                .fill(fill)
                .stroke(stroke)
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&m.content).color(text_color));
                        ui.label(
                            egui::RichText::new(present::message_time(m.timestamp))
                                .small()
                                .color(text_color.gamma_multiply(0.7)),
                        );
                    });
                });
        });
    }

    /// Thread fills the space above a fixed input row; Enter sends, Shift+Enter adds a line.
    fn ui_chat(&mut self, ui: &mut egui::Ui) {
        let input_id = egui::Id::new("chat_input");
        let row_height = ui.text_style_height(&egui::TextStyle::Body);
        let input_height = chat_input_height(&self.view.input, row_height);
        let bottom_section_height = input_height + 48.0;
        let messages_height =
            (ui.available_height() - bottom_section_height).max(CHAT_MESSAGES_MIN_HEIGHT);

        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .max_height(messages_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for m in self.view.messages() {
                    Self::render_message(ui, m);
                    ui.add_space(8.0);
                }
                if self.view.input_state() == InputState::Pending {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(egui::RichText::new("AI is thinking...").weak());
                    });
                }
            });

        ui.separator();

        // Take plain Enter before the text edit sees it; Shift+Enter falls through as a newline.
        let focused = ui.memory(|m| m.has_focus(input_id));
        let enter = focused
            && ui.input_mut(|i| {
                !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
            });

        let mut send_now = enter;
        ui.horizontal(|ui| {
            let input_width = (ui.available_width() - SEND_BUTTON_WIDTH - 8.0).max(0.0);
            ui.add_sized(
                [input_width, input_height],
                egui::TextEdit::multiline(&mut self.view.input)
                    .id(input_id)
                    .hint_text("Type your message here...")
                    .desired_rows(1),
            );
            let send = ui.add_enabled(
                self.view.can_submit(),
                egui::Button::new("Send").min_size(egui::vec2(SEND_BUTTON_WIDTH, input_height)),
            );
            if send.clicked() {
                send_now = true;
            }
        });
        if send_now {
            self.view.submit_input();
        }

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Press Enter to send, Shift+Enter for new line")
                    .small()
                    .weak(),
            );
        });
    }

    fn ui_new_context_dialog(&mut self, ctx: &egui::Context) {
        let mut create = false;
        let mut cancel = false;
        egui::Window::new("New context")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if let Some(draft) = self.view.dialog_mut() {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut draft.name);
                    let slug = lib::context::slugify(&draft.name);
                    if !slug.is_empty() {
                        ui.label(egui::RichText::new(format!("#{}", slug)).small().weak());
                    }
                    ui.add_space(6.0);
                    ui.label("Description");
                    ui.text_edit_singleline(&mut draft.description);
                }
                ui.add_space(8.0);
                let can_create = self
                    .view
                    .dialog()
                    .is_some_and(|d| !d.name.trim().is_empty());
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                    if ui.add_enabled(can_create, egui::Button::new("Create")).clicked() {
                        create = true;
                    }
                });
            });
        if cancel {
            self.view.cancel_dialog();
        } else if create {
            self.view.create_context();
        }
    }
}

impl eframe::App for LifeOsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.view.poll();
        if self.view.input_state() == InputState::Pending {
            ctx.request_repaint_after(PENDING_REPAINT);
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.ui_header(ui));
        egui::TopBottomPanel::bottom("tab_bar").show(ctx, |ui| self.ui_tab_bar(ui));
        if self.view.install_banner_visible() {
            egui::TopBottomPanel::bottom("install_banner").show(ctx, |ui| self.ui_install_banner(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none()
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| match self.view.active_tab() {
                    Tab::Contexts => self.ui_contexts(ui),
                    Tab::Chat => self.ui_chat(ui),
                });
        });

        if self.view.is_dialog_open() {
            self.ui_new_context_dialog(ctx);
        }
    }
}

/// Height of the chat input for `text`: one row per line plus padding, clamped to
/// `CHAT_INPUT_HEIGHT..=CHAT_INPUT_MAX_HEIGHT`. A trailing newline counts as a line.
fn chat_input_height(text: &str, row_height: f32) -> f32 {
    let lines = text.split('\n').count().max(1) as f32;
    (lines * row_height + 16.0).clamp(CHAT_INPUT_HEIGHT, CHAT_INPUT_MAX_HEIGHT)
}

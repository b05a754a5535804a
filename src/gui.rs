use crate::desktop::SystemDesktop;
use crate::fields::WindowSize;
use crate::hotkey::HotkeyTrigger;
use crate::launcher::{DispatchResult, Launcher, Outcome};
use crate::settings::Settings;
use crate::theme::{parse_color, Palette};
use crate::visibility::{apply_visibility, handle_visibility_trigger};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use global_hotkey::GlobalHotKeyManager;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

const BANNER: &str = "\u{00AF}\\_(\u{30C4})_/\u{00AF}";
const TOAST_SECONDS: f64 = 5.0;

fn color32(value: &str, fallback: egui::Color32) -> egui::Color32 {
    parse_color(value)
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(fallback)
}

fn palette_visuals(palette: &Palette) -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    let accent = color32(&palette.accent, visuals.selection.bg_fill);
    visuals.panel_fill = color32(&palette.background, visuals.panel_fill);
    visuals.window_fill = visuals.panel_fill;
    visuals.extreme_bg_color = color32(&palette.entry, visuals.extreme_bg_color);
    visuals.override_text_color = Some(color32(&palette.text, egui::Color32::WHITE));
    visuals.selection.bg_fill = accent;
    visuals.widgets.hovered.bg_stroke.color = accent;
    visuals.widgets.active.bg_stroke.color = accent;
    visuals
}

fn error_toast(text: String) -> Toast {
    Toast {
        text: text.into(),
        kind: ToastKind::Error,
        options: ToastOptions::default().duration_in_seconds(TOAST_SECONDS),
    }
}

pub struct LauncherApp {
    launcher: Launcher<SystemDesktop>,
    visible: Arc<AtomicBool>,
    last_visible: bool,
    exit_flag: Arc<AtomicBool>,
    trigger: Option<HotkeyTrigger>,
    _hotkeys: Option<GlobalHotKeyManager>,
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    tray: Option<crate::tray::TrayHandle>,
    toasts: Toasts,
    applied_theme: Option<String>,
    last_size: WindowSize,
    focus_main: bool,
    focus_field: Option<usize>,
}

impl LauncherApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        base_dir: PathBuf,
        settings_path: PathBuf,
        startup_errors: Vec<String>,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let hotkey = settings.hotkey();
        #[cfg(any(target_os = "windows", target_os = "macos"))]
        let tray_icon = settings.tray_icon(&base_dir);

        let launcher =
            Launcher::new(settings, &base_dir, SystemDesktop).with_settings_path(settings_path);
        let mut toasts = Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]);
        for e in startup_errors {
            toasts.add(error_toast(e));
        }

        let exit_flag = Arc::new(AtomicBool::new(false));

        let (hotkeys, trigger) = match GlobalHotKeyManager::new() {
            Ok(manager) => {
                let trigger = HotkeyTrigger::new(hotkey);
                let repaint = ctx.clone();
                match trigger.start_listener(&manager, move || repaint.request_repaint()) {
                    Ok(()) => (Some(manager), Some(trigger)),
                    Err(e) => {
                        tracing::error!("failed to register hotkey: {e:#}");
                        toasts.add(error_toast(format!("Hotkey: {e:#}")));
                        (Some(manager), None)
                    }
                }
            }
            Err(e) => {
                tracing::error!("hotkey manager unavailable: {e}");
                toasts.add(error_toast(format!("Hotkey: {e}")));
                (None, None)
            }
        };

        #[cfg(any(target_os = "windows", target_os = "macos"))]
        let tray = match crate::tray::TrayHandle::new(crate::icon::load_icon_or_fallback(&tray_icon))
        {
            Ok(handle) => {
                let repaint = ctx.clone();
                handle.start_listener(exit_flag.clone(), move || repaint.request_repaint());
                Some(handle)
            }
            Err(e) => {
                tracing::error!("tray icon unavailable: {e:#}");
                None
            }
        };
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        tracing::info!("tray icon is not supported on this platform");

        Self {
            last_size: launcher.window_size(),
            launcher,
            visible: Arc::new(AtomicBool::new(true)),
            last_visible: false,
            exit_flag,
            trigger,
            _hotkeys: hotkeys,
            #[cfg(any(target_os = "windows", target_os = "macos"))]
            tray,
            toasts,
            applied_theme: None,
            focus_main: true,
            focus_field: None,
        }
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    fn apply_result(&mut self, result: &DispatchResult) {
        if let Outcome::Flow(_) = result.outcome {
            self.focus_field = self.launcher.fields().len().checked_sub(1);
        } else {
            self.focus_main = true;
        }
        if result.handled && result.hide {
            self.hide();
        }
    }

    /// Close the window and drop the tray icon. Also reached from the tray
    /// menu through `exit_flag`.
    fn cleanup(&mut self, ctx: &egui::Context) {
        tracing::info!("shutting down launcher");
        #[cfg(any(target_os = "windows", target_os = "macos"))]
        {
            self.tray = None;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn show_overlay(&mut self, ctx: &egui::Context) {
        let Some(overlay) = self.launcher.overlay().cloned() else {
            return;
        };
        let builder = egui::ViewportBuilder::default()
            .with_title(overlay.title.clone())
            .with_position(egui::pos2(overlay.anchor.0, overlay.anchor.1))
            .with_decorations(false)
            .with_always_on_top()
            .with_inner_size([360.0, 24.0 + 18.0 * (overlay.lines.len() as f32 + 2.0)]);
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("help_overlay"),
            builder,
            |ctx, class| {
                let body = |ui: &mut egui::Ui| {
                    ui.label(egui::RichText::new(&overlay.title).strong());
                    ui.add_space(6.0);
                    for line in &overlay.lines {
                        ui.label(line);
                    }
                };
                match class {
                    egui::ViewportClass::Embedded => {
                        egui::Window::new(&overlay.title)
                            .title_bar(false)
                            .fixed_pos(egui::pos2(0.0, 0.0))
                            .show(ctx, body);
                    }
                    _ => {
                        egui::CentralPanel::default().show(ctx, body);
                    }
                }
            },
        );
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(trigger) = &self.trigger {
            if handle_visibility_trigger(trigger, &self.visible) {
                self.focus_main = true;
            }
        }
        if self.exit_flag.load(Ordering::SeqCst) {
            self.launcher.request_exit();
        }
        if self.launcher.exit_requested() {
            self.cleanup(ctx);
            return;
        }

        // The window manager's close button only hides the launcher.
        if ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.hide();
        }

        if self.applied_theme.as_deref() != Some(self.launcher.theme()) {
            ctx.set_visuals(palette_visuals(self.launcher.palette()));
            self.applied_theme = Some(self.launcher.theme().to_string());
        }

        let size = self.launcher.window_size();
        let should_be_visible = self.visible.load(Ordering::SeqCst);
        if self.last_visible != should_be_visible {
            tracing::debug!("gui thread -> visible: {}", should_be_visible);
            let monitor = ctx.input(|i| i.viewport().monitor_size);
            apply_visibility(should_be_visible, ctx, size, monitor);
            self.last_visible = should_be_visible;
            self.last_size = size;
        } else if size != self.last_size {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                size.width as f32,
                size.height as f32,
            )));
            self.last_size = size;
        }

        for notice in self.launcher.take_notices() {
            self.toasts.add(error_toast(notice));
        }

        let border = color32(&self.launcher.palette().border, egui::Color32::GRAY);
        let frame = egui::Frame::central_panel(&ctx.style()).stroke(egui::Stroke::new(1.0, border));
        let mut main_submitted = false;
        let mut field_submitted = None;

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(BANNER).size(16.0));
            });
            ui.add_space(4.0);

            let tone = color32(self.launcher.input().tone.color(), egui::Color32::GRAY);
            let placeholder = self.launcher.input().placeholder.clone();
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.launcher.input_mut().text)
                    .hint_text(egui::RichText::new(placeholder).color(tone))
                    .desired_width(f32::INFINITY),
            );
            if self.focus_main {
                input.request_focus();
                self.focus_main = false;
            }
            if input.changed() {
                self.launcher.note_keystroke();
            }
            if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                main_submitted = true;
            }

            let value_prompt = self.launcher.locale().value_prompt();
            for ordinal in 0..self.launcher.fields().len() {
                let Some(field) = self.launcher.fields_mut().get_mut(ordinal) else {
                    continue;
                };
                ui.add_space(6.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&field.label)
                            .size(16.0)
                            .color(color32(&field.color, egui::Color32::WHITE)),
                    );
                });
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut field.value)
                        .hint_text(value_prompt)
                        .desired_width(f32::INFINITY),
                );
                if self.focus_field == Some(ordinal) {
                    resp.request_focus();
                    self.focus_field = None;
                }
                if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    field_submitted = Some(ordinal);
                }
            }
        });

        if let Some(ordinal) = field_submitted {
            if let Some(result) = self.launcher.submit_field(ordinal) {
                self.apply_result(&result);
            }
        } else if main_submitted {
            let result = self.launcher.submit();
            self.apply_result(&result);
        }

        self.show_overlay(ctx);
        self.toasts.show(ctx);
    }
}

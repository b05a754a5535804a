use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::fields::WindowSize;
use crate::hotkey::HotkeyTrigger;
use eframe::egui;

/// The parts of `egui::Context` used to show and hide the window.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// Toggle the visibility flag when the given hotkey trigger fires.
pub fn handle_visibility_trigger(trigger: &HotkeyTrigger, visibility: &Arc<AtomicBool>) -> bool {
    if trigger.take() {
        let old = visibility.load(Ordering::SeqCst);
        let next = !old;
        tracing::debug!(from=?old, to=?next, "visibility updated");
        visibility.store(next, Ordering::SeqCst);
        true
    } else {
        false
    }
}

/// Top-left corner that centres a window of `size` on a monitor.
pub fn centered_position(size: WindowSize, monitor: Option<egui::Vec2>) -> Option<egui::Pos2> {
    let monitor = monitor?;
    let x = ((monitor.x - size.width as f32) / 2.0).max(0.0);
    let y = ((monitor.y - size.height as f32) / 2.0).max(0.0);
    Some(egui::pos2(x.floor(), y.floor()))
}

/// Send the viewport commands that show (centred and focused) or hide the
/// window.
pub fn apply_visibility<C: ViewportCtx>(
    visible: bool,
    ctx: &C,
    size: WindowSize,
    monitor: Option<egui::Vec2>,
) {
    if visible {
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
            size.width as f32,
            size.height as f32,
        )));
        if let Some(pos) = centered_position(size, monitor) {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    } else {
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
    }
    ctx.request_repaint();
}

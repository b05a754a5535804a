use cmd_launcher::fields::WindowSize;
use cmd_launcher::hotkey::{Hotkey, HotkeyTrigger};
use cmd_launcher::visibility::{apply_visibility, centered_position, handle_visibility_trigger};
use eframe::egui;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use mock_ctx::MockCtx;

const SIZE: WindowSize = WindowSize {
    width: 240,
    height: 100,
};

#[test]
fn hotkey_toggles_visibility() {
    let trigger = HotkeyTrigger::new(Hotkey::default());
    let visibility = Arc::new(AtomicBool::new(false));

    assert!(!handle_visibility_trigger(&trigger, &visibility));
    assert!(!visibility.load(Ordering::SeqCst));

    *trigger.open.lock().unwrap() = true;
    assert!(handle_visibility_trigger(&trigger, &visibility));
    assert!(visibility.load(Ordering::SeqCst));

    *trigger.open.lock().unwrap() = true;
    assert!(handle_visibility_trigger(&trigger, &visibility));
    assert!(!visibility.load(Ordering::SeqCst));
}

#[test]
fn showing_centres_and_focuses() {
    let ctx = MockCtx::default();
    apply_visibility(true, &ctx, SIZE, Some(egui::vec2(1920.0, 1080.0)));

    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 4);
    match cmds[0] {
        egui::ViewportCommand::InnerSize(s) => assert_eq!(s, egui::vec2(240.0, 100.0)),
        _ => panic!("unexpected command"),
    }
    match cmds[1] {
        egui::ViewportCommand::OuterPosition(p) => assert_eq!(p, egui::pos2(840.0, 490.0)),
        _ => panic!("unexpected command"),
    }
    match cmds[2] {
        egui::ViewportCommand::Visible(v) => assert!(v),
        _ => panic!("unexpected command"),
    }
    match cmds[3] {
        egui::ViewportCommand::Focus => {}
        _ => panic!("unexpected command"),
    }
    assert_eq!(*ctx.repaints.lock().unwrap(), 1);
}

#[test]
fn unknown_monitor_skips_position() {
    let ctx = MockCtx::default();
    apply_visibility(true, &ctx, SIZE, None);
    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 3);
    assert!(!cmds
        .iter()
        .any(|c| matches!(c, egui::ViewportCommand::OuterPosition(_))));
    assert_eq!(centered_position(SIZE, None), None);
}

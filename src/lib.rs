pub mod desktop;
pub mod directive;
pub mod fields;
pub mod flows;
pub mod gui;
pub mod hotkey;
pub mod icon;
pub mod launcher;
pub mod logging;
pub mod messages;
pub mod registry;
pub mod script;
pub mod settings;
pub mod theme;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub mod tray;
pub mod visibility;

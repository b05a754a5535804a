use crate::icon::IconPixels;
use anyhow::Context;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Tray icon with a single "Exit" entry. Dropping it removes the icon.
pub struct TrayHandle {
    _icon: TrayIcon,
    exit_id: MenuId,
}

impl TrayHandle {
    pub fn new(pixels: IconPixels) -> anyhow::Result<Self> {
        let icon = Icon::from_rgba(pixels.rgba, pixels.width, pixels.height)
            .context("invalid tray icon")?;
        let menu = Menu::new();
        let exit = MenuItem::new("Exit", true, None);
        menu.append(&exit).context("building tray menu")?;

        let tray = TrayIconBuilder::new()
            .with_tooltip("Launcher")
            .with_icon(icon)
            .with_menu(Box::new(menu))
            .build()
            .context("failed to create tray icon")?;

        Ok(Self {
            _icon: tray,
            exit_id: exit.id().clone(),
        })
    }

    /// Forward "Exit" clicks into `exit` from a background thread.
    pub fn start_listener<F>(&self, exit: Arc<AtomicBool>, on_exit: F)
    where
        F: Fn() + Send + 'static,
    {
        let exit_id = self.exit_id.clone();
        thread::spawn(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if event.id == exit_id {
                    tracing::info!("exit selected from tray");
                    exit.store(true, Ordering::SeqCst);
                    on_exit();
                }
            }
        });
    }
}

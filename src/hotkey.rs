use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Digit(u8),
    F(u8),
    Space,
    Tab,
    Return,
    Escape,
    Delete,
    Backspace,
    CapsLock,
    Home,
    End,
    PageUp,
    PageDown,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub win: bool,
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            key: Key::CapsLock,
            ctrl: true,
            shift: false,
            alt: false,
            win: false,
        }
    }
}

/// Parse a hotkey string like "Ctrl+Shift+Space" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut win = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "WIN" | "SUPER" | "CMD" => win = true,
            "" => {}
            _ => key = Some(parse_key(&upper)?),
        }
    }

    key.map(|k| Hotkey {
        key: k,
        ctrl,
        shift,
        alt,
        win,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "ENTER" | "RETURN" => Some(Key::Return),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "CAPSLOCK" => Some(Key::CapsLock),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "LEFT" | "LEFTARROW" => Some(Key::LeftArrow),
        "RIGHT" | "RIGHTARROW" => Some(Key::RightArrow),
        "UP" | "UPARROW" => Some(Key::UpArrow),
        "DOWN" | "DOWNARROW" => Some(Key::DownArrow),
        _ if upper.len() > 1 && upper.starts_with('F') => match upper[1..].parse::<u8>() {
            Ok(n @ 1..=12) => Some(Key::F(n)),
            _ => None,
        },
        _ => {
            let mut chars = upper.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if c.is_ascii_digit() {
                Some(Key::Digit(c as u8 - b'0'))
            } else if c.is_ascii_alphabetic() {
                Some(Key::Letter(c))
            } else {
                None
            }
        }
    }
}

fn key_code(key: Key) -> Option<Code> {
    let code = match key {
        Key::Space => Code::Space,
        Key::Tab => Code::Tab,
        Key::Return => Code::Enter,
        Key::Escape => Code::Escape,
        Key::Delete => Code::Delete,
        Key::Backspace => Code::Backspace,
        Key::CapsLock => Code::CapsLock,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::LeftArrow => Code::ArrowLeft,
        Key::RightArrow => Code::ArrowRight,
        Key::UpArrow => Code::ArrowUp,
        Key::DownArrow => Code::ArrowDown,
        Key::F(n) => match n {
            1 => Code::F1,
            2 => Code::F2,
            3 => Code::F3,
            4 => Code::F4,
            5 => Code::F5,
            6 => Code::F6,
            7 => Code::F7,
            8 => Code::F8,
            9 => Code::F9,
            10 => Code::F10,
            11 => Code::F11,
            12 => Code::F12,
            _ => return None,
        },
        Key::Digit(d) => match d {
            0 => Code::Digit0,
            1 => Code::Digit1,
            2 => Code::Digit2,
            3 => Code::Digit3,
            4 => Code::Digit4,
            5 => Code::Digit5,
            6 => Code::Digit6,
            7 => Code::Digit7,
            8 => Code::Digit8,
            9 => Code::Digit9,
            _ => return None,
        },
        Key::Letter(c) => match c {
            'A' => Code::KeyA,
            'B' => Code::KeyB,
            'C' => Code::KeyC,
            'D' => Code::KeyD,
            'E' => Code::KeyE,
            'F' => Code::KeyF,
            'G' => Code::KeyG,
            'H' => Code::KeyH,
            'I' => Code::KeyI,
            'J' => Code::KeyJ,
            'K' => Code::KeyK,
            'L' => Code::KeyL,
            'M' => Code::KeyM,
            'N' => Code::KeyN,
            'O' => Code::KeyO,
            'P' => Code::KeyP,
            'Q' => Code::KeyQ,
            'R' => Code::KeyR,
            'S' => Code::KeyS,
            'T' => Code::KeyT,
            'U' => Code::KeyU,
            'V' => Code::KeyV,
            'W' => Code::KeyW,
            'X' => Code::KeyX,
            'Y' => Code::KeyY,
            'Z' => Code::KeyZ,
            _ => return None,
        },
    };
    Some(code)
}

impl Hotkey {
    /// Convert to the OS-level hotkey understood by `global-hotkey`.
    pub fn to_global(&self) -> Option<HotKey> {
        let mut mods = Modifiers::empty();
        if self.ctrl {
            mods |= Modifiers::CONTROL;
        }
        if self.shift {
            mods |= Modifiers::SHIFT;
        }
        if self.alt {
            mods |= Modifiers::ALT;
        }
        if self.win {
            mods |= Modifiers::SUPER;
        }
        let mods = if mods.is_empty() { None } else { Some(mods) };
        key_code(self.key).map(|code| HotKey::new(mods, code))
    }
}

// Shared signal to toggle the launcher
pub struct HotkeyTrigger {
    pub open: Arc<Mutex<bool>>,
    pub hotkey: Hotkey,
}

impl HotkeyTrigger {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            open: Arc::new(Mutex::new(false)),
            hotkey,
        }
    }

    /// Register the hotkey with `manager` and forward presses into the
    /// trigger flag from a background thread. `on_fire` runs on that thread
    /// after the flag is set.
    pub fn start_listener<F>(&self, manager: &GlobalHotKeyManager, on_fire: F) -> anyhow::Result<()>
    where
        F: Fn() + Send + 'static,
    {
        let Some(global) = self.hotkey.to_global() else {
            anyhow::bail!("hotkey {:?} has no OS key code", self.hotkey);
        };
        let id = global.id();
        manager.register(global)?;
        let open = self.open.clone();
        tracing::debug!("starting hotkey listener for {:?}", self.hotkey);
        thread::spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if event.id() != id || event.state() != HotKeyState::Pressed {
                    continue;
                }
                tracing::debug!("hotkey match -> open=true");
                if let Ok(mut flag) = open.lock() {
                    *flag = true;
                }
                on_fire();
            }
            tracing::warn!("hotkey event channel closed; listener exiting");
        });
        Ok(())
    }

    pub fn take(&self) -> bool {
        match self.open.lock() {
            Ok(mut open) => std::mem::take(&mut *open),
            Err(_) => false,
        }
    }
}

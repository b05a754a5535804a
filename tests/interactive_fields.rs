use cmd_launcher::fields::Continuation;
use cmd_launcher::launcher::{Launcher, Outcome};
use cmd_launcher::settings::{LookupFlow, Settings};
use std::fs;
use tempfile::TempDir;

use mock_desktop::{Effect, MockDesktop};

fn settings_in(dir: &TempDir) -> Settings {
    let commands = dir.path().join("commands");
    let themes = dir.path().join("themes");
    fs::create_dir_all(&commands).unwrap();
    fs::create_dir_all(&themes).unwrap();
    Settings {
        commands_dir: Some(commands.to_string_lossy().into_owned()),
        themes_dir: Some(themes.to_string_lossy().into_owned()),
        ..Settings::default()
    }
}

#[test]
fn cnpj_lookup_opens_url_and_restores_layout() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::default());
    let base = l.window_size();

    l.input_mut().text = "in".into();
    let r = l.submit();
    assert!(r.handled);
    assert!(!r.hide);
    assert_eq!(r.outcome, Outcome::Flow("in".into()));
    assert!(l.input().text.is_empty());
    assert_eq!(l.fields().len(), 1);
    let field = l.fields().get(0).unwrap();
    assert_eq!(field.label, "CNPJ");
    assert_eq!(l.window_size().height, base.height + 70);

    l.fields_mut().get_mut(0).unwrap().value = "  12345678000190 \n".into();
    let r = l.submit_field(0).expect("field exists");
    assert!(r.handled);
    assert!(r.hide);
    assert_eq!(r.outcome, Outcome::Field(0));
    assert_eq!(
        l.desktop().effects,
        vec![Effect::Url(
            "https://intranet.lzt.com.br/cliente/pesquisar/12345678000190".into()
        )]
    );
    assert!(l.fields().is_empty());
    assert_eq!(l.window_size(), base);
}

#[test]
fn field_continuation_runs_once() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::default());
    l.dispatch("in");
    l.fields_mut().get_mut(0).unwrap().value = "42".into();

    assert!(l.submit_field(0).is_some());
    assert!(l.submit_field(0).is_none());
    assert_eq!(l.desktop().effects.len(), 1);
}

#[test]
fn repeated_trigger_stacks_fields() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::default());
    l.dispatch("in");
    l.dispatch("tema");
    assert_eq!(l.fields().len(), 2);
    let ordinals: Vec<usize> = l.fields().iter().map(|f| f.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1]);
    assert_eq!(l.fields().get(1).unwrap().continuation, Continuation::SelectTheme);
    assert_eq!(l.window_size().height, 100 + 2 * 70);
}

#[test]
fn configured_lookup_uses_custom_template() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        lookups: vec![LookupFlow {
            trigger: "os".into(),
            label: "Ordem".into(),
            color: "yellow".into(),
            url: "https://tickets.example/REPLACEME/view".into(),
        }],
        ..settings_in(&dir)
    };
    let mut l = Launcher::new(settings, dir.path(), MockDesktop::default());

    assert!(matches!(l.dispatch("in").outcome, Outcome::NotFound(_)));
    assert_eq!(l.dispatch("os").outcome, Outcome::Flow("os".into()));
    l.fields_mut().get_mut(0).unwrap().value = "77".into();
    l.submit_field(0);
    assert_eq!(
        l.desktop().effects,
        vec![Effect::Url("https://tickets.example/77/view".into())]
    );
}

#[test]
fn desktop_failure_is_reported_and_layout_reset() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::failing());
    l.dispatch("in");
    l.fields_mut().get_mut(0).unwrap().value = "1".into();
    let r = l.submit_field(0).unwrap();
    assert!(r.handled);
    assert_eq!(l.take_notices().len(), 1);
    assert!(l.fields().is_empty());
}

#[test]
fn theme_field_switches_and_persists() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.json");
    let settings = settings_in(&dir);
    fs::write(
        dir.path().join("themes").join("solar.json"),
        r##"{"background":"#002b36","accent":"#b58900"}"##,
    )
    .unwrap();
    let mut l =
        Launcher::new(settings, dir.path(), MockDesktop::default()).with_settings_path(&settings_path);
    assert_eq!(l.theme(), "blue");

    l.dispatch("tema");
    l.fields_mut().get_mut(0).unwrap().value = " solar ".into();
    let r = l.submit_field(0).unwrap();
    assert!(r.handled);
    assert!(!r.hide);
    assert_eq!(l.theme(), "solar");
    assert_eq!(l.palette().accent, "#b58900");
    assert_eq!(l.palette().background, "#002b36");
    assert!(l.take_notices().is_empty());

    let saved = Settings::load(&settings_path.to_string_lossy()).unwrap();
    assert_eq!(saved.theme, "solar");
}

#[test]
fn unknown_theme_keeps_palette() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::default());
    let before = l.palette().clone();

    l.dispatch("tema");
    l.fields_mut().get_mut(0).unwrap().value = "purple-haze".into();
    l.submit_field(0);
    assert_eq!(l.theme(), "blue");
    assert_eq!(l.palette(), &before);
    let notices = l.take_notices();
    assert_eq!(notices, vec!["Tema 'purple-haze' não encontrado".to_string()]);
}

#[test]
fn builtin_themes_switch_without_files() {
    let dir = TempDir::new().unwrap();
    let mut l = Launcher::new(settings_in(&dir), dir.path(), MockDesktop::default());
    l.select_theme("green").unwrap();
    assert_eq!(l.theme(), "green");
    assert_eq!(l.palette().accent, "#2fa572");
}

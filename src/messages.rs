use serde::{Deserialize, Serialize};

/// Language of the user-facing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn prompt(self) -> &'static str {
        match self {
            Locale::PtBr => "Digite o comando...",
            Locale::En => "Type a command...",
        }
    }

    pub fn value_prompt(self) -> &'static str {
        match self {
            Locale::PtBr => "Digite o valor...",
            Locale::En => "Type a value...",
        }
    }

    pub fn not_found(self, command: &str) -> String {
        match self {
            Locale::PtBr => format!("Comando '{command}' não encontrado"),
            Locale::En => format!("Command '{command}' not found"),
        }
    }

    pub fn help_title(self) -> &'static str {
        match self {
            Locale::PtBr => "Comandos disponíveis:",
            Locale::En => "Available commands:",
        }
    }

    pub fn no_description(self) -> &'static str {
        match self {
            Locale::PtBr => "Sem descrição",
            Locale::En => "No description",
        }
    }

    pub fn description_unavailable(self) -> &'static str {
        match self {
            Locale::PtBr => "Erro ao obter descrição",
            Locale::En => "Failed to read description",
        }
    }

    pub fn command_failed(self, command: &str, err: &dyn std::fmt::Display) -> String {
        match self {
            Locale::PtBr => format!("Erro ao executar comando '{command}': {err}"),
            Locale::En => format!("Error running command '{command}': {err}"),
        }
    }

    pub fn theme_label(self) -> &'static str {
        match self {
            Locale::PtBr => "Tema",
            Locale::En => "Theme",
        }
    }

    pub fn unknown_theme(self, theme: &str) -> String {
        match self {
            Locale::PtBr => format!("Tema '{theme}' não encontrado"),
            Locale::En => format!("Theme '{theme}' not found"),
        }
    }
}

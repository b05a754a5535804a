use crate::fields::{Continuation, FieldStack};
use crate::messages::Locale;
use crate::settings::LookupFlow;

/// Trigger that opens the theme field.
pub const THEME_TRIGGER: &str = "tema";

/// A multi-step command: typing its trigger appends fields to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Lookup(LookupFlow),
    Theme,
}

impl Flow {
    /// Append this flow's fields.
    pub fn build(&self, fields: &mut FieldStack, locale: Locale) {
        match self {
            Flow::Lookup(lookup) => {
                fields.add_field(
                    lookup.label.clone(),
                    lookup.color.clone(),
                    Continuation::OpenUrl {
                        template: lookup.url.clone(),
                    },
                );
            }
            Flow::Theme => {
                fields.add_field(locale.theme_label(), "lime", Continuation::SelectTheme);
            }
        }
    }
}

/// Interactive triggers by name.
#[derive(Debug, Clone, Default)]
pub struct FlowSet {
    flows: Vec<(String, Flow)>,
}

impl FlowSet {
    /// The theme flow plus every configured lookup. A lookup reusing a
    /// trigger name replaces the earlier flow.
    pub fn new(lookups: &[LookupFlow]) -> Self {
        let mut set = Self::default();
        set.insert(THEME_TRIGGER, Flow::Theme);
        for lookup in lookups {
            set.insert(&lookup.trigger, Flow::Lookup(lookup.clone()));
        }
        set
    }

    pub fn insert(&mut self, trigger: &str, flow: Flow) {
        let trigger = trigger.trim().to_lowercase();
        if trigger.is_empty() {
            tracing::warn!("ignoring interactive flow with an empty trigger");
            return;
        }
        self.flows.retain(|(name, _)| *name != trigger);
        self.flows.push((trigger, flow));
    }

    pub fn find(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.flows.iter().map(|(n, _)| n.as_str())
    }
}

use crate::settings::REPLACE_MARKER;

/// What happens with the value typed into an interactive field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Replace [`REPLACE_MARKER`] in `template` with the value and open it.
    OpenUrl { template: String },
    /// Switch the active palette to the typed theme identifier.
    SelectTheme,
}

impl Continuation {
    pub fn url_for(template: &str, value: &str) -> String {
        template.replace(REPLACE_MARKER, value)
    }
}

#[derive(Debug, Clone)]
pub struct InteractiveField {
    pub ordinal: usize,
    pub label: String,
    pub color: String,
    /// Text currently typed into the field.
    pub value: String,
    pub continuation: Continuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Extra input fields appended below the main entry.
#[derive(Debug, Clone)]
pub struct FieldStack {
    fields: Vec<InteractiveField>,
    base: WindowSize,
    field_height: u32,
}

impl FieldStack {
    pub fn new(base: WindowSize, field_height: u32) -> Self {
        Self {
            fields: Vec::new(),
            base,
            field_height,
        }
    }

    /// Append a field and return its ordinal.
    pub fn add_field(
        &mut self,
        label: impl Into<String>,
        color: impl Into<String>,
        continuation: Continuation,
    ) -> usize {
        let ordinal = self.fields.len();
        let label = label.into();
        tracing::info!(ordinal, %label, "adding interactive field");
        self.fields.push(InteractiveField {
            ordinal,
            label,
            color: color.into(),
            value: String::new(),
            continuation,
        });
        ordinal
    }

    pub fn reset(&mut self) {
        if !self.fields.is_empty() {
            tracing::debug!(count = self.fields.len(), "dropping interactive fields");
        }
        self.fields.clear();
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&InteractiveField> {
        self.fields.get(ordinal)
    }

    pub fn get_mut(&mut self, ordinal: usize) -> Option<&mut InteractiveField> {
        self.fields.get_mut(ordinal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractiveField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut InteractiveField> {
        self.fields.iter_mut()
    }

    pub fn base_size(&self) -> WindowSize {
        self.base
    }

    /// Window size needed to show every field.
    pub fn window_size(&self) -> WindowSize {
        WindowSize {
            width: self.base.width,
            height: self.base.height + self.fields.len() as u32 * self.field_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> FieldStack {
        FieldStack::new(
            WindowSize {
                width: 240,
                height: 100,
            },
            70,
        )
    }

    #[test]
    fn ordinals_follow_count_and_reset() {
        let mut s = stack();
        assert_eq!(s.add_field("a", "white", Continuation::SelectTheme), 0);
        assert_eq!(s.add_field("b", "white", Continuation::SelectTheme), 1);
        assert_eq!(s.window_size().height, 240);
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.window_size(), s.base_size());
        assert_eq!(s.add_field("c", "white", Continuation::SelectTheme), 0);
    }

    #[test]
    fn url_template_replaces_marker() {
        assert_eq!(
            Continuation::url_for("https://x/REPLACEME?q=REPLACEME", "42"),
            "https://x/42?q=42"
        );
    }
}

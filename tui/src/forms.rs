//! Form state for the add/update device and work-order pages.
//!
//! A [`FormState`] is an ordered list of named fields — free-text inputs
//! and fixed-option selects — with one focused field at a time. Select
//! fields back the cascading dropdowns: when a manufacturer or facility
//! selection changes, the page swaps the dependent field's options via
//! [`FormState::set_options`], which also drops a now-invalid value.

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// What kind of input a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free-text entry.
    Text,
    /// One of a fixed option list. An empty list means "select the
    /// parent field first" for cascading dropdowns.
    Select(Vec<String>),
}


/// One named form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Stable identifier used by pages to read values back.
    pub name: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
}

impl FormField {
    pub fn text(name: &'static str, label: &'static str, required: bool) -> Self {
        FormField {
            name,
            label,
            kind: FieldKind::Text,
            value: String::new(),
            required,
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: Vec<String>,
        required: bool,
    ) -> Self {
        FormField {
            name,
            label,
            kind: FieldKind::Select(options),
            value: String::new(),
            required,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }
}


// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

/// An ordered set of fields plus focus tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    fields: Vec<FormField>,
    focus: usize,
}


impl FormState {
    pub fn new(fields: Vec<FormField>) -> Self {
        FormState { fields, focus: 0 }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> &FormField {
        &self.fields[self.focus]
    }

    /// Move focus to the next field, wrapping at the end.
    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    /// Move focus to the previous field, wrapping at the start.
    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Current value of the named field, empty string if absent.
    pub fn value(&self, name: &str) -> &str {
        self.index_of(name)
            .map(|i| self.fields[i].value.as_str())
            .unwrap_or("")
    }

    /// The named field's value with the empty-means-absent convention
    /// applied: whitespace-only input becomes `None`.
    pub fn optional_value(&self, name: &str) -> Option<String> {
        optional(self.value(name))
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(i) = self.index_of(name) {
            self.fields[i].value = value.to_string();
        }
    }

    /// Replace a select field's options. If the current value is no
    /// longer among them it is cleared — this is what empties a model
    /// dropdown when the manufacturer changes.
    pub fn set_options(&mut self, name: &str, options: Vec<String>) {
        if let Some(i) = self.index_of(name) {
            if let FieldKind::Select(_) = self.fields[i].kind {
                if !options.contains(&self.fields[i].value) {
                    self.fields[i].value.clear();
                }
                self.fields[i].kind = FieldKind::Select(options);
            }
        }
    }

    /// Append a character to the focused text field. Ignored on selects.
    pub fn insert_char(&mut self, ch: char) {
        let field = &mut self.fields[self.focus];
        if field.kind == FieldKind::Text {
            field.value.push(ch);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn backspace(&mut self) {
        let field = &mut self.fields[self.focus];
        if field.kind == FieldKind::Text {
            field.value.pop();
        }
    }

    /// Step the focused select field through its options. Returns the
    /// field name when the value changed, so pages can cascade.
    pub fn cycle_select(&mut self, forward: bool) -> Option<&'static str> {
        let field = &mut self.fields[self.focus];
        let options = match &field.kind {
            FieldKind::Select(options) if !options.is_empty() => options,
            _ => return None,
        };

        let current = options.iter().position(|o| *o == field.value);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
            (None, true) => 0,
            (None, false) => options.len() - 1,
        };
        if field.value == options[next] {
            return None;
        }
        field.value = options[next].clone();
        Some(field.name)
    }

    /// Labels of required fields that are still blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required && f.value.trim().is_empty())
            .map(|f| f.label)
            .collect()
    }
}


/// Apply the canonical optional-field convention: trimmed-empty input is
/// absent, anything else is kept verbatim.
pub fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

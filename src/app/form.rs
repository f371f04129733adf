//! Add-character form state and validation.

use crate::domain::{CharacterFields, HanziError, Result};

/// Input fields of the add-character form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Character,
    Pinyin,
    Meaning,
    Example,
    ExampleMeaning,
}

impl FormField {
    pub const ALL: [Self; 5] = [
        Self::Character,
        Self::Pinyin,
        Self::Meaning,
        Self::Example,
        Self::ExampleMeaning,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Pinyin => "Pinyin",
            Self::Meaning => "Meaning",
            Self::Example => "Example",
            Self::ExampleMeaning => "Example meaning",
        }
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Character | Self::Pinyin | Self::Meaning)
    }

    const fn index(self) -> usize {
        match self {
            Self::Character => 0,
            Self::Pinyin => 1,
            Self::Meaning => 2,
            Self::Example => 3,
            Self::ExampleMeaning => 4,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw text of the five inputs plus the focused field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: [String; 5],
    pub focus: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: Default::default(),
            focus: FormField::Character,
        }
    }
}

impl FormState {
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn set_value(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Appends a character to the focused field.
    pub fn push_char(&mut self, c: char) {
        self.values[self.focus.index()].push(c);
    }

    /// Removes the last character of the focused field.
    pub fn pop_char(&mut self) {
        self.values[self.focus.index()].pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Clears every input and moves focus back to the first field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Trims every field and checks the required ones.
    ///
    /// Does not modify the form; a failed validation leaves the user's input
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::Validation`] naming the empty required fields.
    pub fn validate(&self) -> Result<CharacterFields> {
        let trimmed = |field: FormField| self.value(field).trim().to_string();
        let optional = |field: FormField| Some(trimmed(field)).filter(|v| !v.is_empty());

        let missing: Vec<&str> = FormField::ALL
            .iter()
            .filter(|field| field.is_required() && trimmed(**field).is_empty())
            .map(|field| field.label())
            .collect();

        if !missing.is_empty() {
            return Err(HanziError::Validation(format!(
                "Fill in the required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(CharacterFields {
            character: trimmed(FormField::Character),
            pinyin: trimmed(FormField::Pinyin),
            meaning: trimmed(FormField::Meaning),
            example: optional(FormField::Example),
            example_meaning: optional(FormField::ExampleMeaning),
        })
    }
}

//! # Form & Selection Primitives
//!
//! Chat-SDK-independent abstractions for multi-field input and result
//! picking. A `Form` asks one field per message and yields a value map on
//! completion; a `Selection` offers a numbered option list. The router owns
//! all chat I/O, so these stay pure and fully testable.

use std::collections::HashMap;

/// A single input field of a form.
#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_len: usize,
    /// Accepted answers (case-insensitive). Empty means free text.
    pub one_of: &'static [&'static str],
}

/// Reply to a user's answer for the current field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormStep {
    /// Ask the next field.
    Prompt(String),
    /// All fields collected.
    Complete(HashMap<String, String>),
}

/// Why an answer was rejected. The form stays on the same field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Required(&'static str),
    TooLong { label: &'static str, max: usize },
    Invalid {
        label: &'static str,
        expected: &'static [&'static str],
    },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Required(label) => write!(f, "{label} is required"),
            FieldError::TooLong { label, max } => {
                write!(f, "{label} must be at most {max} characters")
            }
            FieldError::Invalid { label, expected } => {
                write!(f, "{label} must be one of: {}", expected.join(", "))
            }
        }
    }
}

/// An in-progress form: an ordered field list plus collected values.
/// Optional fields may be skipped by answering `-`.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    index: usize,
    values: HashMap<String, String>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            index: 0,
            values: HashMap::new(),
        }
    }

    /// Prompt for the field currently awaiting an answer.
    pub fn prompt(&self) -> String {
        match self.fields.get(self.index) {
            Some(field) => field_prompt(field),
            None => String::new(),
        }
    }

    /// Record an answer for the current field and advance.
    pub fn answer(&mut self, input: &str) -> Result<FormStep, FieldError> {
        let Some(field) = self.fields.get(self.index).copied() else {
            return Ok(FormStep::Complete(std::mem::take(&mut self.values)));
        };
        let input = input.trim();
        let skipped = input == "-" || input.is_empty();

        if skipped {
            if field.required {
                return Err(FieldError::Required(field.label));
            }
        } else {
            if input.chars().count() > field.max_len {
                return Err(FieldError::TooLong {
                    label: field.label,
                    max: field.max_len,
                });
            }
            if !field.one_of.is_empty()
                && !field
                    .one_of
                    .iter()
                    .any(|option| option.eq_ignore_ascii_case(input))
            {
                return Err(FieldError::Invalid {
                    label: field.label,
                    expected: field.one_of,
                });
            }
            self.values.insert(field.key.to_string(), input.to_string());
        }

        self.index += 1;
        if self.index >= self.fields.len() {
            Ok(FormStep::Complete(std::mem::take(&mut self.values)))
        } else {
            Ok(FormStep::Prompt(self.prompt()))
        }
    }
}

fn field_prompt(field: &FormField) -> String {
    if field.required {
        format!("**{}**?", field.label)
    } else {
        format!("**{}**? (`-` to skip)", field.label)
    }
}

/// A numbered option list awaiting a pick.
#[derive(Debug, Clone)]
pub struct Selection {
    options: Vec<String>,
}

impl Selection {
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Render as a numbered markdown list.
    pub fn render(&self) -> String {
        self.options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {}", i + 1, option))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve a 1-based numeric reply to its option.
    pub fn pick(&self, input: &str) -> Option<&str> {
        let n: usize = input.trim().parse().ok()?;
        if n == 0 {
            return None;
        }
        self.options.get(n - 1).map(String::as_str)
    }
}

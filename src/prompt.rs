//! Parameter entry as a capability.
//!
//! Commands that need user input ask a [`ValueRequest`] for raw text and parse
//! it themselves. Returning `None` means the user cancelled.

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    PartWidth,
    PartHeight,
    VertexWidth,
    SpecialFormWidth,
    SpecialFormHeight,
    CornerRadius,
    StrokeWidth,
    Color,
}

impl ValueKind {
    pub fn prompt(self) -> &'static str {
        match self {
            ValueKind::PartWidth => "Width (e.g. 2in, 1 1/2in, 5cm):",
            ValueKind::PartHeight => "Height (e.g. 10cm, 4in):",
            ValueKind::VertexWidth => "Width at vertex (e.g. 10cm, 8in, 8 1/2in):",
            ValueKind::SpecialFormWidth => "Special form width in cm:",
            ValueKind::SpecialFormHeight => "Special form height in cm:",
            ValueKind::CornerRadius => "Corner roundness:",
            ValueKind::StrokeWidth => "Stroke width:",
            ValueKind::Color => "Colour (#rrggbb):",
        }
    }

    /// Whether the answer is dimension text (`2in`, `8 1/2`, `5cm`).
    pub fn is_length(self) -> bool {
        matches!(
            self,
            ValueKind::PartWidth
                | ValueKind::PartHeight
                | ValueKind::VertexWidth
                | ValueKind::SpecialFormWidth
                | ValueKind::SpecialFormHeight
        )
    }
}

pub trait ValueRequest {
    fn request_value(&mut self, kind: ValueKind, default: &str) -> Option<String>;
}

/// Answers taken from a queue in order; `None` entries cancel.
#[derive(Clone, Debug, Default)]
pub struct PresetAnswers {
    answers: VecDeque<Option<String>>,
    asked: Vec<(ValueKind, String)>,
}

impl PresetAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
        }
    }

    pub fn push(&mut self, answer: Option<String>) {
        self.answers.push_back(answer);
    }

    /// Every request seen so far with the default it offered.
    pub fn asked(&self) -> &[(ValueKind, String)] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ValueRequest for PresetAnswers {
    fn request_value(&mut self, kind: ValueKind, default: &str) -> Option<String> {
        self.asked.push((kind, default.to_string()));
        self.answers.pop_front().flatten()
    }
}

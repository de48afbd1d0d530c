use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::diff::{DiffAlgorithmType, PrimitiveOptions, DEFAULT_CONTEXT_LINES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    Unified,
    Split,
}

/// Options applied to every subsequent compute call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub ignore_whitespace: bool,
    pub ignore_case: bool,
    pub context_lines: usize,
    pub show_inline_diff: bool,
    pub view_mode: ViewMode,
    pub algorithm: DiffAlgorithmType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_case: false,
            context_lines: DEFAULT_CONTEXT_LINES,
            show_inline_diff: true,
            view_mode: ViewMode::Unified,
            algorithm: DiffAlgorithmType::Myers,
        }
    }
}

impl Settings {
    pub fn primitive_options(&self) -> PrimitiveOptions {
        PrimitiveOptions {
            ignore_case: self.ignore_case,
            ignore_whitespace: self.ignore_whitespace,
            algorithm: self.algorithm,
        }
    }

    /// Shallow-merge the fields present in `update`.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(value) = update.ignore_whitespace {
            self.ignore_whitespace = value;
        }
        if let Some(value) = update.ignore_case {
            self.ignore_case = value;
        }
        if let Some(value) = update.context_lines {
            self.context_lines = value;
        }
        if let Some(value) = update.show_inline_diff {
            self.show_inline_diff = value;
        }
        if let Some(value) = update.view_mode {
            self.view_mode = value;
        }
        if let Some(value) = update.algorithm {
            self.algorithm = value;
        }
    }
}

/// Partial settings; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub ignore_whitespace: Option<bool>,
    pub ignore_case: Option<bool>,
    pub context_lines: Option<usize>,
    pub show_inline_diff: Option<bool>,
    pub view_mode: Option<ViewMode>,
    pub algorithm: Option<DiffAlgorithmType>,
}

impl SettingsUpdate {
    pub fn ignore_whitespace(mut self, value: bool) -> Self {
        self.ignore_whitespace = Some(value);
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = Some(value);
        self
    }

    pub fn context_lines(mut self, value: usize) -> Self {
        self.context_lines = Some(value);
        self
    }

    pub fn show_inline_diff(mut self, value: bool) -> Self {
        self.show_inline_diff = Some(value);
        self
    }

    pub fn view_mode(mut self, value: ViewMode) -> Self {
        self.view_mode = Some(value);
        self
    }

    pub fn algorithm(mut self, value: DiffAlgorithmType) -> Self {
        self.algorithm = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert!(!settings.ignore_case);
        assert_eq!(settings.context_lines, 3);
        assert_eq!(settings.view_mode, ViewMode::Unified);
    }

    #[test]
    fn test_shallow_merge() {
        let mut settings = Settings::default();
        settings.apply(&SettingsUpdate::default().ignore_case(true).context_lines(5));

        assert!(settings.ignore_case);
        assert_eq!(settings.context_lines, 5);
        assert!(!settings.ignore_whitespace);
        assert!(settings.show_inline_diff);

        settings.apply(&SettingsUpdate::default().view_mode(ViewMode::Split));
        assert!(settings.ignore_case);
        assert_eq!(settings.view_mode, ViewMode::Split);
    }

    #[test]
    fn test_primitive_options() {
        let settings = Settings {
            ignore_whitespace: true,
            algorithm: DiffAlgorithmType::Patience,
            ..Default::default()
        };
        let options = settings.primitive_options();

        assert!(options.ignore_whitespace);
        assert!(!options.ignore_case);
        assert_eq!(options.algorithm, DiffAlgorithmType::Patience);
    }
}

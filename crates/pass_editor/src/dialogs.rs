//! Add / Rename dialog models
//!
//! These hold what the user picked and turn it into a [`PassCommand`]. They
//! do no widget work; the host draws the combo boxes and text fields and
//! forwards the selections here.

use pass_core::{ITERATION_WIDTH, Identifier, PassError, PassSettings, Result, SEPARATOR};
use pass_hierarchy::{LeafPath, PassCommand};

/// The category combo box: a preset or the free-text "custom" escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
    Preset(String),
    Custom(String),
}

impl CategoryChoice {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Preset(name) | Self::Custom(name) => name,
        }
    }
}

/// State of the Add Pass dialog.
#[derive(Debug, Clone)]
pub struct AddPassDialog {
    type_options: Vec<String>,
    category_options: Vec<String>,
    custom_label: String,
    max_iteration: u32,
    enabled: bool,

    pass_type: String,
    category: CategoryChoice,
    iteration: u32,
}

impl AddPassDialog {
    /// Opens the dialog with the first type, first category and iteration 01.
    #[must_use]
    pub fn new(settings: &PassSettings) -> Self {
        let category = settings.categories.first().map_or_else(
            || CategoryChoice::Custom(String::new()),
            |c| CategoryChoice::Preset(c.clone()),
        );
        Self {
            type_options: settings.pass_types.clone(),
            category_options: settings.categories.clone(),
            custom_label: settings.custom_label.clone(),
            max_iteration: settings.max_iteration,
            enabled: settings.new_pass_enabled,
            pass_type: settings.pass_types.first().cloned().unwrap_or_default(),
            category,
            iteration: 1,
        }
    }

    #[must_use]
    pub fn type_options(&self) -> &[String] {
        &self.type_options
    }

    /// Preset categories followed by the custom entry.
    #[must_use]
    pub fn category_options(&self) -> Vec<&str> {
        self.category_options
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.custom_label.as_str()))
            .collect()
    }

    #[must_use]
    pub fn iteration_options(&self) -> Vec<String> {
        (1..=self.max_iteration)
            .map(|i| format!("{i:0ITERATION_WIDTH$}"))
            .collect()
    }

    pub fn select_type(&mut self, pass_type: &str) -> Result<()> {
        if !self.type_options.iter().any(|t| t == pass_type) {
            return Err(PassError::NotFound(format!("pass type '{pass_type}'")));
        }
        self.pass_type = pass_type.to_owned();
        Ok(())
    }

    /// Picks a preset, or switches to free text when `category` is the
    /// custom label.
    pub fn select_category(&mut self, category: &str) -> Result<()> {
        if category == self.custom_label {
            if !self.is_custom() {
                self.category = CategoryChoice::Custom(String::new());
            }
            return Ok(());
        }
        if !self.category_options.iter().any(|c| c == category) {
            return Err(PassError::NotFound(format!("category '{category}'")));
        }
        self.category = CategoryChoice::Preset(category.to_owned());
        Ok(())
    }

    /// Whether the custom name field should be visible.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self.category, CategoryChoice::Custom(_))
    }

    /// Sets the free-text category. Ignored unless custom is selected.
    pub fn set_custom_name(&mut self, name: &str) {
        if let CategoryChoice::Custom(custom) = &mut self.category {
            name.trim().clone_into(custom);
        }
    }

    pub fn select_iteration(&mut self, iteration: u32) -> Result<()> {
        if !(1..=self.max_iteration).contains(&iteration) {
            return Err(PassError::BadIteration(format!("{iteration:0ITERATION_WIDTH$}")));
        }
        self.iteration = iteration;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The name the dialog would create, as shown to the user.
    #[must_use]
    pub fn proposed_name(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{:0ITERATION_WIDTH$}",
            self.pass_type,
            self.category.name(),
            self.iteration
        )
    }

    /// Validates the selection and splits it into an Add command.
    pub fn submit(&self) -> Result<PassCommand> {
        let name = self.proposed_name();
        let id = Identifier::parse(&name)?;
        if !id.belongs_to(&self.pass_type, self.category.name()) {
            return Err(PassError::MalformedName(name));
        }
        Ok(PassCommand::Add {
            pass_type: id.pass_type().to_owned(),
            category: id.category().to_owned(),
            name: id.to_string(),
            enabled: self.enabled,
        })
    }
}

/// State of the Rename dialog.
#[derive(Debug, Clone)]
pub struct RenameDialog {
    target: LeafPath,
    text: String,
}

impl RenameDialog {
    #[must_use]
    pub fn new(target: LeafPath) -> Self {
        Self {
            target,
            text: String::new(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &LeafPath {
        &self.target
    }

    pub fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }

    /// Hands the raw text to the store; validation happens there.
    #[must_use]
    pub fn submit(&self) -> PassCommand {
        PassCommand::Rename {
            path: self.target.clone(),
            new_name: self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dialog = AddPassDialog::new(&PassSettings::default());
        assert_eq!(dialog.proposed_name(), "bty_char_01");
        assert_eq!(dialog.category_options().last(), Some(&"custom"));
        assert_eq!(dialog.iteration_options().len(), 9);
    }

    #[test]
    fn test_submit_splits_fields() {
        let mut dialog = AddPassDialog::new(&PassSettings::default());
        dialog.select_type("shdw").unwrap();
        dialog.select_category("vhcl").unwrap();
        dialog.select_iteration(4).unwrap();

        let command = dialog.submit().unwrap();
        assert_eq!(
            command,
            PassCommand::Add {
                pass_type: "shdw".into(),
                category: "vhcl".into(),
                name: "shdw_vhcl_04".into(),
                enabled: true,
            }
        );
    }

    #[test]
    fn test_custom_category() {
        let mut dialog = AddPassDialog::new(&PassSettings::default());
        dialog.select_category("custom").unwrap();
        assert!(dialog.is_custom());

        assert!(matches!(dialog.submit(), Err(PassError::MalformedName(_))));

        dialog.set_custom_name(" hero ");
        assert_eq!(dialog.proposed_name(), "bty_hero_01");
        assert!(dialog.submit().is_ok());
    }

    #[test]
    fn test_custom_category_with_separator() {
        let mut dialog = AddPassDialog::new(&PassSettings::default());
        dialog.select_category("custom").unwrap();
        dialog.set_custom_name("hero_hair");
        let PassCommand::Add { category, .. } = dialog.submit().unwrap() else {
            panic!("expected Add");
        };
        assert_eq!(category, "hero_hair");

        dialog.set_custom_name("hero_");
        assert!(dialog.submit().is_err());
    }

    #[test]
    fn test_rejects_unknown_options() {
        let mut dialog = AddPassDialog::new(&PassSettings::default());
        assert!(dialog.select_type("beauty").is_err());
        assert!(dialog.select_category("animals").is_err());
        assert!(dialog.select_iteration(0).is_err());
        assert!(dialog.select_iteration(10).is_err());
        assert_eq!(dialog.proposed_name(), "bty_char_01");
    }

    #[test]
    fn test_rename_passes_raw_text() {
        let mut dialog = RenameDialog::new("bty_char_01".parse().unwrap());
        dialog.set_text("not a pass");
        assert_eq!(
            dialog.submit(),
            PassCommand::Rename {
                path: "bty_char_01".parse().unwrap(),
                new_name: "not a pass".into(),
            }
        );
    }
}

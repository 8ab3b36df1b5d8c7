//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_menu(config, &mut result);
        Self::validate_links(config, &mut result);
        Self::validate_interface(config, &mut result);

        result
    }

    fn validate_menu(config: &Config, result: &mut ValidationResult) {
        if config.menu.contexts.is_empty() {
            result.add_error(ValidationError::new(
                "menu.contexts",
                "At least one context is required",
            ));
        }

        if config.menu.rating_threshold > 10_000 {
            result.add_warning(ValidationWarning::new(
                "menu.rating_threshold",
                "rating_threshold is very high (>10000), the rated set will practically never show",
            ));
        }
    }

    fn validate_links(config: &Config, result: &mut ValidationResult) {
        if config.links.homepage.is_empty() {
            result.add_error(ValidationError::new(
                "links.homepage",
                "Homepage cannot be empty",
            ));
        } else if url::Url::parse(&config.links.homepage).is_err() {
            result.add_error(ValidationError::new(
                "links.homepage",
                format!("Not a valid URL: {}", config.links.homepage),
            ));
        }

        let webstore = config.links.webstore_url();
        if url::Url::parse(&webstore).is_err() {
            result.add_error(ValidationError::new(
                "links.webstore",
                format!("Not a valid URL: {}", webstore),
            ));
        }

        if config.links.extension_id.is_empty() {
            result.add_warning(ValidationWarning::new(
                "links.extension_id",
                "extension_id is empty, the web-store link points at the listing root",
            ));
        }
    }

    fn validate_interface(config: &Config, result: &mut ValidationResult) {
        if config.interface.width == 0 {
            result.add_error(ValidationError::new(
                "interface.width",
                "width must be greater than 0",
            ));
        }

        if config.interface.height == 0 {
            result.add_error(ValidationError::new(
                "interface.height",
                "height must be greater than 0",
            ));
        }

        if config.interface.page.is_empty() {
            result.add_error(ValidationError::new(
                "interface.page",
                "page cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

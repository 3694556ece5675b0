//! Configuration validation

use crate::schema::RawConfig;
use lockdown_util::PackageId;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid package id for {field}: '{value}'")]
    InvalidPackageId { field: &'static str, value: String },

    #[error("settings_package must differ from self_package ('{0}')")]
    SettingsIsSelf(String),
}

/// Validate a raw configuration, collecting every error
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_package(&mut errors, "device.self_package", &config.device.self_package);

    if let Some(settings) = &config.device.settings_package {
        check_package(&mut errors, "device.settings_package", settings);

        if settings == &config.device.self_package {
            errors.push(ValidationError::SettingsIsSelf(settings.clone()));
        }
    }

    // Blank main app means "launcher as kiosk"
    if let Some(main_app) = &config.kiosk.main_app
        && !main_app.trim().is_empty()
    {
        check_package(&mut errors, "kiosk.main_app", main_app);
    }

    errors
}

fn check_package(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !PackageId::new(value).is_well_formed() {
        errors.push(ValidationError::InvalidPackageId {
            field,
            value: value.to_string(),
        });
    }
}

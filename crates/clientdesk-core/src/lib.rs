pub mod catalog;
pub mod date;
pub mod derive;
pub mod record;
pub mod redact;
pub mod related;
pub mod rules;
pub mod sections;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use catalog::{ClientQuery, ClientSnapshot};
pub use date::{DateParts, MalformedDate};
pub use derive::{apply_change, apply_field_change};
pub use record::{
    ClientField, ClientRecord, ClientSummary, Constitution, FieldKind, FieldValue, RecordId,
    UnknownField,
};
pub use redact::{mask_identifier, redact_credentials, CREDENTIAL_FIELDS};
pub use related::{ClientDetail, ResourceCategory, Tab};
pub use sections::{applicable_sections, applicable_sections_for, SectionTag, BASELINE_SECTIONS};

// --- Errors ---

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// --- Settings ---

pub const HOME_ENV: &str = "CLIENTDESK_HOME";

/// Resolve the settings directory: `$CLIENTDESK_HOME`, else `~/.clientdesk/`.
pub fn home_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clientdesk")
}

pub fn settings_path() -> PathBuf {
    home_dir().join("settings.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Constitution preselected on the creation form.
    pub default_constitution: Constitution,
    pub default_nationality: String,
    /// Show credential fields in clear text instead of bullets.
    pub reveal_credentials: bool,
    /// Mask PANs in list output.
    pub mask_identifiers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_constitution: Constitution::Individual,
            default_nationality: record::DEFAULT_NATIONALITY.to_string(),
            reveal_credentials: false,
            mask_identifiers: false,
        }
    }
}

impl Settings {
    /// An empty record as the creation form starts it under these settings.
    pub fn new_client(&self) -> ClientRecord {
        ClientRecord {
            constitution: self.default_constitution.clone(),
            nationality: Some(self.default_nationality.clone()),
            ..ClientRecord::new()
        }
    }

    /// Credential redaction as configured.
    pub fn present(&self, record: &ClientRecord) -> ClientRecord {
        if self.reveal_credentials {
            record.clone()
        } else {
            redact_credentials(record)
        }
    }

    /// Summary with the PAN masked when configured.
    pub fn present_summary(&self, mut summary: ClientSummary) -> ClientSummary {
        if self.mask_identifiers {
            summary.pan = mask_identifier(&summary.pan);
        }
        summary
    }
}

/// Read settings from the default location. Missing or unreadable files
/// give the defaults.
pub fn read_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    read_settings_from(&path).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable settings");
        Settings::default()
    })
}

pub fn read_settings_from(path: &Path) -> Result<Settings, Error> {
    let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn write_settings(settings: &Settings) -> Result<(), Error> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &Settings) -> Result<(), Error> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("clientdesk-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let path = scratch("roundtrip");
        let settings = Settings {
            default_constitution: Constitution::Company,
            reveal_credentials: true,
            ..Settings::default()
        };
        write_settings_to(&path, &settings).unwrap();
        assert_eq!(read_settings_from(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let path = scratch("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"maskIdentifiers": true}"#).unwrap();
        let settings = read_settings_from(&path).unwrap();
        assert!(settings.mask_identifiers);
        assert_eq!(settings.default_nationality, "Indian");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_settings_from(&scratch("missing")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    // The only test that touches the process environment.
    #[test]
    fn home_override_and_settings_fallback() {
        let path = scratch("home");
        let home = path.parent().unwrap().to_path_buf();
        std::env::set_var(HOME_ENV, &home);
        assert_eq!(home_dir(), home);
        assert_eq!(settings_path(), path);

        assert_eq!(read_settings(), Settings::default());

        fs::create_dir_all(&home).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_settings(), Settings::default());

        let saved = Settings {
            mask_identifiers: true,
            ..Settings::default()
        };
        write_settings(&saved).unwrap();
        assert_eq!(read_settings(), saved);

        std::env::remove_var(HOME_ENV);
        let _ = fs::remove_dir_all(&home);
    }

    #[test]
    fn new_client_uses_configured_defaults() {
        let settings = Settings {
            default_constitution: Constitution::Llp,
            default_nationality: "Nepali".into(),
            ..Settings::default()
        };
        let record = settings.new_client();
        assert_eq!(record.constitution, Constitution::Llp);
        assert_eq!(record.nationality.as_deref(), Some("Nepali"));
        assert!(record.is_active);
    }

    #[test]
    fn presentation_follows_settings() {
        let record = ClientRecord {
            pan: Some("ABCDE1234F".into()),
            password_26as: Some("14051990".into()),
            ..ClientRecord::new()
        };
        let hidden = Settings::default();
        assert_eq!(hidden.present(&record).password_26as.as_deref(), Some(redact::HIDDEN));

        let open = Settings {
            reveal_credentials: true,
            mask_identifiers: true,
            ..Settings::default()
        };
        assert_eq!(open.present(&record), record);
        assert_eq!(open.present_summary(record.summary()).pan, "AB••••••4F");
    }
}

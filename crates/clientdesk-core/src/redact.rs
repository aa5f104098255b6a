use crate::record::{ClientField, ClientRecord, FieldValue};

/// Fields holding portal passwords. The persistence layer encrypts these at
/// rest; anything shown or logged should go through [`redact_credentials`].
pub const CREDENTIAL_FIELDS: [ClientField; 8] = [
    ClientField::McaPassword,
    ClientField::DscTokenPassword,
    ClientField::ItPortalPassword,
    ClientField::ItPasswordTds,
    ClientField::Password26As,
    ClientField::PasswordAisTis,
    ClientField::TracesPasswordDeductor,
    ClientField::TracesPasswordTaxpayer,
];

pub const HIDDEN: &str = "••••••••";

const BULLET: char = '•';

pub fn is_credential(field: ClientField) -> bool {
    CREDENTIAL_FIELDS.contains(&field)
}

/// Copy of `record` with every non-empty credential replaced by [`HIDDEN`].
pub fn redact_credentials(record: &ClientRecord) -> ClientRecord {
    let mut redacted = record.clone();
    for field in CREDENTIAL_FIELDS {
        if record.text(field).is_some_and(|v| !v.is_empty()) {
            redacted.set_field(field, FieldValue::text(HIDDEN));
        }
    }
    redacted
}

/// Show only the first two and last two characters of an identifier such as
/// a PAN or GSTIN.
pub fn mask_identifier(value: &str) -> String {
    if value.is_empty() {
        return "N/A".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + chars.len() * 2);
    out.extend(&chars[..2]);
    out.extend(std::iter::repeat(BULLET).take(chars.len() - 4));
    out.extend(&chars[chars.len() - 2..]);
    out
}

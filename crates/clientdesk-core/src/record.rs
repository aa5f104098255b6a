use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// --- Constitution ---

/// Legal form of a client entity. Drives which related-entity sections apply.
///
/// Values outside the fixed set are kept verbatim as `Unrecognized` so that a
/// record from an older or newer collaborator still loads and round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Constitution {
    #[default]
    Individual,
    Company,
    Llp,
    PartnershipFirm,
    Huf,
    Trust,
    Aop,
    Boi,
    Unrecognized(String),
}

impl Constitution {
    /// Known constitutions in the order the creation form offers them.
    pub const ALL: [Constitution; 8] = [
        Constitution::Individual,
        Constitution::Company,
        Constitution::Llp,
        Constitution::PartnershipFirm,
        Constitution::Huf,
        Constitution::Trust,
        Constitution::Aop,
        Constitution::Boi,
    ];

    /// Parse a persisted value. Never fails; unknown input becomes `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Individual" => Constitution::Individual,
            "Company" => Constitution::Company,
            "LLP" => Constitution::Llp,
            "Partnership Firm" => Constitution::PartnershipFirm,
            "HUF" => Constitution::Huf,
            "Trust" => Constitution::Trust,
            "AOP" => Constitution::Aop,
            "BOI" => Constitution::Boi,
            other => Constitution::Unrecognized(other.to_string()),
        }
    }

    /// The persisted string. Unrecognized values are returned as given.
    pub fn as_str(&self) -> &str {
        match self {
            Constitution::Individual => "Individual",
            Constitution::Company => "Company",
            Constitution::Llp => "LLP",
            Constitution::PartnershipFirm => "Partnership Firm",
            Constitution::Huf => "HUF",
            Constitution::Trust => "Trust",
            Constitution::Aop => "AOP",
            Constitution::Boi => "BOI",
            Constitution::Unrecognized(raw) => raw,
        }
    }

    /// Display label. Unrecognized values share the generic label "Other".
    pub fn label(&self) -> &str {
        match self {
            Constitution::Unrecognized(_) => "Other",
            known => known.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Constitution::Unrecognized(_))
    }
}

impl fmt::Display for Constitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Constitution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Constitution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Constitution::parse(&raw))
    }
}

// --- Identifiers ---

/// Opaque identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

// --- Field values ---

/// A value coming from a form control: text inputs, selects and date pickers
/// produce `Text`, checkboxes produce `Flag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Text view of the value; flags render as "true"/"false".
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Flag view of the value. Text is true only for the usual checkbox spellings.
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "1" | "yes"
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Constitution,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client field `{0}`")]
pub struct UnknownField(pub String);

// --- Client record ---

/// A client master record, keyed by the canonical persisted field names.
///
/// Dates are kept as the text the form supplied (`YYYY-MM-DD` when well
/// formed). `Default` gives the schema defaults; `ClientRecord::new` gives the
/// creation-form defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    // Identity
    pub pan: Option<String>,
    pub constitution: Constitution,
    pub display_name: Option<String>,
    pub legal_name: Option<String>,
    pub date_of_incorporation_birth: Option<String>,
    pub cin_llpin: Option<String>,
    pub tan: Option<String>,
    pub is_direct_client: bool,
    pub is_active: bool,
    pub is_on_retainer: bool,
    pub client_since: Option<String>,

    // Individual KYC
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub aadhaar_no: Option<String>,
    pub din: Option<String>,
    pub passport_no: Option<String>,
    pub passport_expiry: Option<String>,
    pub mca_user_id: Option<String>,
    pub mca_password: Option<String>,
    pub dsc_provider: Option<String>,
    pub dsc_expiry_date: Option<String>,
    pub dsc_token_password: Option<String>,

    // Contact
    pub primary_phone: Option<String>,
    pub secondary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub secondary_email: Option<String>,

    // Address
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,

    // IT portal
    pub it_portal_user_id: Option<String>,
    pub it_portal_password: Option<String>,
    pub it_portal_user_id_tds: Option<String>,
    pub it_password_tds: Option<String>,
    pub password_26as: Option<String>,
    pub password_ais_tis: Option<String>,

    // TRACES
    pub traces_user_id_deductor: Option<String>,
    pub traces_password_deductor: Option<String>,
    pub traces_user_id_taxpayer: Option<String>,
    pub traces_password_taxpayer: Option<String>,

    pub notes: Option<String>,

    /// Keys this model does not know about, kept so records round-trip.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

pub const DEFAULT_NATIONALITY: &str = "Indian";

impl Default for ClientRecord {
    fn default() -> Self {
        Self {
            id: None,
            pan: None,
            constitution: Constitution::Individual,
            display_name: None,
            legal_name: None,
            date_of_incorporation_birth: None,
            cin_llpin: None,
            tan: None,
            is_direct_client: true,
            is_active: true,
            is_on_retainer: false,
            client_since: None,
            father_name: None,
            mother_name: None,
            gender: None,
            nationality: None,
            aadhaar_no: None,
            din: None,
            passport_no: None,
            passport_expiry: None,
            mca_user_id: None,
            mca_password: None,
            dsc_provider: None,
            dsc_expiry_date: None,
            dsc_token_password: None,
            primary_phone: None,
            secondary_phone: None,
            primary_email: None,
            secondary_email: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            pin_code: None,
            it_portal_user_id: None,
            it_portal_password: None,
            it_portal_user_id_tds: None,
            it_password_tds: None,
            password_26as: None,
            password_ais_tis: None,
            traces_user_id_deductor: None,
            traces_password_deductor: None,
            traces_user_id_taxpayer: None,
            traces_password_taxpayer: None,
            notes: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ClientRecord {
    /// An empty record as the creation form starts it.
    pub fn new() -> Self {
        Self {
            nationality: Some(DEFAULT_NATIONALITY.to_string()),
            ..Self::default()
        }
    }

    /// Store `value` under `name`. Total: unknown names land in `extra`.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        match name.parse::<ClientField>() {
            Ok(field) => self.set_field(field, value),
            Err(UnknownField(name)) => {
                let json = match value {
                    FieldValue::Text(s) => serde_json::Value::String(s),
                    FieldValue::Flag(b) => serde_json::Value::Bool(b),
                };
                self.extra.insert(name, json);
            }
        }
    }

    /// Store `value` in a known field, coercing it to the field's kind.
    pub fn set_field(&mut self, field: ClientField, value: FieldValue) {
        match field.kind() {
            FieldKind::Constitution => {
                self.constitution = Constitution::parse(&value.into_text());
            }
            FieldKind::Flag => {
                if let Some(slot) = self.flag_slot(field) {
                    *slot = value.as_flag();
                }
            }
            FieldKind::Text => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = Some(value.into_text());
                }
            }
        }
    }

    /// Slim list-view projection without credentials.
    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id.clone(),
            pan: self.pan.clone().unwrap_or_default(),
            constitution: self.constitution.clone(),
            display_name: self.display_name.clone().unwrap_or_default(),
            legal_name: self.legal_name.clone().unwrap_or_default(),
            is_active: self.is_active,
            is_direct_client: self.is_direct_client,
            is_on_retainer: self.is_on_retainer,
            primary_phone: self.primary_phone.clone(),
            primary_email: self.primary_email.clone(),
            din: self.din.clone(),
        }
    }
}

/// Slim client projection used by list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub pan: String,
    pub constitution: Constitution,
    pub display_name: String,
    pub legal_name: String,
    pub is_active: bool,
    pub is_direct_client: bool,
    pub is_on_retainer: bool,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub din: Option<String>,
}

// --- Field names ---

macro_rules! client_fields {
    (
        text: [$($tvar:ident => $tfield:ident),* $(,)?],
        flag: [$($fvar:ident => $ffield:ident),* $(,)?] $(,)?
    ) => {
        /// Every settable client field, named as persisted.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ClientField {
            Constitution,
            $($tvar,)*
            $($fvar,)*
        }

        impl ClientField {
            pub const ALL: &'static [ClientField] = &[
                ClientField::Constitution,
                $(ClientField::$tvar,)*
                $(ClientField::$fvar,)*
            ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    ClientField::Constitution => "constitution",
                    $(ClientField::$tvar => stringify!($tfield),)*
                    $(ClientField::$fvar => stringify!($ffield),)*
                }
            }

            pub const fn kind(self) -> FieldKind {
                match self {
                    ClientField::Constitution => FieldKind::Constitution,
                    $(ClientField::$tvar => FieldKind::Text,)*
                    $(ClientField::$fvar => FieldKind::Flag,)*
                }
            }
        }

        impl ClientRecord {
            /// Current text of a text or date field; `None` for other kinds.
            pub fn text(&self, field: ClientField) -> Option<&str> {
                match field {
                    $(ClientField::$tvar => self.$tfield.as_deref(),)*
                    _ => None,
                }
            }

            /// Current value of a checkbox field; `None` for other kinds.
            pub fn flag(&self, field: ClientField) -> Option<bool> {
                match field {
                    $(ClientField::$fvar => Some(self.$ffield),)*
                    _ => None,
                }
            }

            fn text_slot(&mut self, field: ClientField) -> Option<&mut Option<String>> {
                match field {
                    $(ClientField::$tvar => Some(&mut self.$tfield),)*
                    _ => None,
                }
            }

            fn flag_slot(&mut self, field: ClientField) -> Option<&mut bool> {
                match field {
                    $(ClientField::$fvar => Some(&mut self.$ffield),)*
                    _ => None,
                }
            }
        }
    };
}

client_fields! {
    text: [
        Pan => pan,
        DisplayName => display_name,
        LegalName => legal_name,
        DateOfIncorporationBirth => date_of_incorporation_birth,
        CinLlpin => cin_llpin,
        Tan => tan,
        ClientSince => client_since,
        FatherName => father_name,
        MotherName => mother_name,
        Gender => gender,
        Nationality => nationality,
        AadhaarNo => aadhaar_no,
        Din => din,
        PassportNo => passport_no,
        PassportExpiry => passport_expiry,
        McaUserId => mca_user_id,
        McaPassword => mca_password,
        DscProvider => dsc_provider,
        DscExpiryDate => dsc_expiry_date,
        DscTokenPassword => dsc_token_password,
        PrimaryPhone => primary_phone,
        SecondaryPhone => secondary_phone,
        PrimaryEmail => primary_email,
        SecondaryEmail => secondary_email,
        AddressLine1 => address_line1,
        AddressLine2 => address_line2,
        City => city,
        State => state,
        PinCode => pin_code,
        ItPortalUserId => it_portal_user_id,
        ItPortalPassword => it_portal_password,
        ItPortalUserIdTds => it_portal_user_id_tds,
        ItPasswordTds => it_password_tds,
        Password26As => password_26as,
        PasswordAisTis => password_ais_tis,
        TracesUserIdDeductor => traces_user_id_deductor,
        TracesPasswordDeductor => traces_password_deductor,
        TracesUserIdTaxpayer => traces_user_id_taxpayer,
        TracesPasswordTaxpayer => traces_password_taxpayer,
        Notes => notes,
    ],
    flag: [
        IsDirectClient => is_direct_client,
        IsActive => is_active,
        IsOnRetainer => is_on_retainer,
    ],
}

impl FromStr for ClientField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn constitution_serializes_as_display_string() {
        let json = serde_json::to_string(&Constitution::PartnershipFirm).unwrap();
        assert_eq!(json, "\"Partnership Firm\"");
        let back: Constitution = serde_json::from_str("\"LLP\"").unwrap();
        assert_eq!(back, Constitution::Llp);
    }

    #[test]
    fn unknown_constitution_round_trips_with_generic_label() {
        let c: Constitution = serde_json::from_str("\"Cooperative\"").unwrap();
        assert_eq!(c, Constitution::Unrecognized("Cooperative".into()));
        assert_eq!(c.label(), "Other");
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"Cooperative\"");
    }

    #[test]
    fn field_names_match_persisted_names() {
        for field in ClientField::ALL {
            assert_eq!(field.as_str().parse::<ClientField>(), Ok(*field));
        }
        assert_eq!(
            "password_26as".parse::<ClientField>(),
            Ok(ClientField::Password26As)
        );
        assert_eq!(
            "passwordAisTis".parse::<ClientField>(),
            Err(UnknownField("passwordAisTis".into()))
        );
    }

    #[test]
    fn every_text_field_is_reachable_through_set() {
        let mut record = ClientRecord::default();
        for field in ClientField::ALL.iter().filter(|f| f.kind() == FieldKind::Text) {
            record.set(field.as_str(), FieldValue::text(field.as_str()));
            assert_eq!(record.text(*field), Some(field.as_str()));
        }
    }

    #[test]
    fn set_coerces_values_to_field_kind() {
        let mut record = ClientRecord::default();
        record.set("is_on_retainer", "on".into());
        record.set("is_active", FieldValue::Flag(false));
        record.set("notes", FieldValue::Flag(true));
        record.set("constitution", "Trust".into());
        assert!(record.is_on_retainer);
        assert!(!record.is_active);
        assert_eq!(record.notes.as_deref(), Some("true"));
        assert_eq!(record.constitution, Constitution::Trust);
    }

    #[test]
    fn unknown_names_are_kept_in_extra() {
        let mut record = ClientRecord::default();
        record.set("branch_code", "MUM-01".into());
        assert_eq!(record.extra["branch_code"], serde_json::json!("MUM-01"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["branch_code"], "MUM-01");
        let back: ClientRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn new_record_carries_form_defaults() {
        let record = ClientRecord::new();
        assert_eq!(record.constitution, Constitution::Individual);
        assert!(record.is_direct_client && record.is_active && !record.is_on_retainer);
        assert_eq!(record.nationality.as_deref(), Some("Indian"));
    }

    #[test]
    fn missing_keys_take_schema_defaults() {
        let record: ClientRecord =
            serde_json::from_str(r#"{"id": 7, "pan": "ABCDE1234F", "constitution": "Company"}"#)
                .unwrap();
        assert_eq!(record.id, Some(RecordId::Number(7)));
        assert!(record.is_active);
        assert_eq!(record.nationality, None);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn summary_drops_credentials() {
        let mut record = ClientRecord::new();
        record.pan = Some("ABCDE1234F".into());
        record.password_26as = Some("14051990".into());
        let json = serde_json::to_value(record.summary()).unwrap();
        assert_eq!(json["pan"], "ABCDE1234F");
        assert!(json.get("password_26as").is_none());
    }
}

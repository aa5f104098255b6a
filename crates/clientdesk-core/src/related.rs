use serde::{Deserialize, Serialize};

use crate::record::{ClientRecord, Constitution, RecordId};
use crate::sections::{applicable_sections, SectionTag};

// --- Enumerations (persisted as their display strings) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstRegistrationType {
    Regular,
    Composition,
    #[serde(rename = "QRMP")]
    Qrmp,
    #[serde(rename = "SEZ Unit")]
    SezUnit,
    #[serde(rename = "SEZ Developer")]
    SezDeveloper,
    Casual,
    #[serde(rename = "Non-Resident")]
    NonResident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Designation {
    Director,
    #[serde(rename = "Managing Director")]
    ManagingDirector,
    #[serde(rename = "Whole-time Director")]
    WholeTimeDirector,
    #[serde(rename = "Independent Director")]
    IndependentDirector,
    #[serde(rename = "Nominee Director")]
    NomineeDirector,
    #[serde(rename = "Additional Director")]
    AdditionalDirector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HolderType {
    Individual,
    Company,
    Trust,
    #[serde(rename = "HUF")]
    Huf,
    #[serde(rename = "LLP")]
    Llp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareType {
    Equity,
    Preference,
    #[serde(rename = "CCPS")]
    Ccps,
    #[serde(rename = "OCPS")]
    Ocps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerRole {
    Partner,
    #[serde(rename = "Designated Partner")]
    DesignatedPartner,
    #[serde(rename = "Managing Partner")]
    ManagingPartner,
    #[serde(rename = "Sleeping Partner")]
    SleepingPartner,
    #[serde(rename = "Minor Partner")]
    MinorPartner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankAccountType {
    Current,
    Savings,
    #[serde(rename = "Cash Credit")]
    CashCredit,
    Overdraft,
    #[serde(rename = "EEFC")]
    Eefc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpfEsiType {
    #[serde(rename = "EPF")]
    Epf,
    #[serde(rename = "ESI")]
    Esi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherRegistrationType {
    #[serde(rename = "MSME/Udyam")]
    MsmeUdyam,
    #[serde(rename = "IEC")]
    Iec,
    #[serde(rename = "FSSAI")]
    Fssai,
    #[serde(rename = "Professional Tax")]
    ProfessionalTax,
    #[serde(rename = "Shops & Estab")]
    ShopsEstablishment,
    #[serde(rename = "Trade License")]
    TradeLicense,
    #[serde(rename = "Drug License")]
    DrugLicense,
    #[serde(rename = "Import Export Code")]
    ImportExportCode,
    Others,
}

fn yes() -> bool {
    true
}

// --- Related records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub gstin: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub registration_type: Option<GstRegistrationType>,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub cancellation_date: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub gst_user_id: Option<String>,
    #[serde(default)]
    pub gst_password: Option<String>,
    #[serde(default)]
    pub ewb_user_id: Option<String>,
    #[serde(default)]
    pub ewb_password: Option<String>,
    #[serde(default)]
    pub ewb_api_user_id: Option<String>,
    #[serde(default)]
    pub ewb_api_password: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatories: Vec<GstSignatory>,
}

/// A client authorised to sign for a GST registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstSignatory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub signatory_client_id: RecordId,
    #[serde(default = "yes")]
    pub is_active: bool,
}

/// Keyed by the (company, individual) pair rather than an id of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub company_client_id: RecordId,
    pub individual_client_id: RecordId,
    pub designation: Designation,
    #[serde(default)]
    pub date_of_appointment: Option<String>,
    #[serde(default)]
    pub date_of_cessation: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub is_kmp: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shareholder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub company_client_id: RecordId,
    pub holder_type: HolderType,
    #[serde(default)]
    pub individual_client_id: Option<RecordId>,
    #[serde(default)]
    pub holding_entity_client_id: Option<RecordId>,
    #[serde(default)]
    pub share_type: Option<ShareType>,
    #[serde(default)]
    pub number_of_shares: Option<u64>,
    #[serde(default)]
    pub face_value: Option<f64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub date_acquired: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub firm_llp_client_id: RecordId,
    pub individual_client_id: RecordId,
    pub role: PartnerRole,
    #[serde(default)]
    pub profit_sharing_ratio: Option<f64>,
    #[serde(default)]
    pub capital_contribution: Option<f64>,
    #[serde(default)]
    pub date_of_joining: Option<String>,
    #[serde(default)]
    pub date_of_exit: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<BankAccountType>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub net_banking_user_id: Option<String>,
    #[serde(default)]
    pub net_banking_password: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpfEsiRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub registration_type: EpfEsiType,
    #[serde(default)]
    pub state: Option<String>,
    pub establishment_code: String,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub cancellation_date: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub portal_user_id: Option<String>,
    #[serde(default)]
    pub portal_password: Option<String>,
    #[serde(default)]
    pub dsc_holder_name: Option<String>,
    #[serde(default)]
    pub authorised_signatory: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub client_id: RecordId,
    pub registration_type: OtherRegistrationType,
    pub registration_number: String,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub issuing_authority: Option<String>,
    #[serde(default)]
    pub state_jurisdiction: Option<String>,
    #[serde(default)]
    pub portal_user_id: Option<String>,
    #[serde(default)]
    pub portal_password: Option<String>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

// --- Resource categories ---

/// Record groups the CRUD collaborator exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Clients,
    GstRegistrations,
    Directors,
    Shareholders,
    Partners,
    BankAccounts,
    EpfEsiRegistrations,
    OtherRegistrations,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 8] = [
        ResourceCategory::Clients,
        ResourceCategory::GstRegistrations,
        ResourceCategory::Directors,
        ResourceCategory::Shareholders,
        ResourceCategory::Partners,
        ResourceCategory::BankAccounts,
        ResourceCategory::EpfEsiRegistrations,
        ResourceCategory::OtherRegistrations,
    ];

    /// Route segment the collaborator serves this category under.
    pub const fn path(self) -> &'static str {
        match self {
            ResourceCategory::Clients => "clients",
            ResourceCategory::GstRegistrations => "gst",
            ResourceCategory::Directors => "directors",
            ResourceCategory::Shareholders => "shareholders",
            ResourceCategory::Partners => "partners",
            ResourceCategory::BankAccounts => "bank-accounts",
            ResourceCategory::EpfEsiRegistrations => "epf-esi",
            ResourceCategory::OtherRegistrations => "other-registrations",
        }
    }

    pub const fn section(self) -> SectionTag {
        match self {
            ResourceCategory::Clients => SectionTag::Overview,
            ResourceCategory::GstRegistrations => SectionTag::Gst,
            ResourceCategory::Directors => SectionTag::Directors,
            ResourceCategory::Shareholders => SectionTag::Shareholders,
            ResourceCategory::Partners => SectionTag::Partners,
            ResourceCategory::BankAccounts => SectionTag::BankAccounts,
            ResourceCategory::EpfEsiRegistrations => SectionTag::EpfEsi,
            ResourceCategory::OtherRegistrations => SectionTag::OtherRegistrations,
        }
    }

    /// Whether records of this category are shown for `constitution`.
    /// Advisory: nothing here stops a caller from creating them anyway.
    pub fn is_meaningful_for(self, constitution: &Constitution) -> bool {
        applicable_sections(constitution).contains(&self.section())
    }
}

// --- Detail view ---

/// A client together with its related records, as a detail view holds them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientDetail {
    pub client: ClientRecord,
    #[serde(default)]
    pub gst_registrations: Vec<GstRegistration>,
    #[serde(default)]
    pub directors: Vec<Director>,
    #[serde(default)]
    pub shareholders: Vec<Shareholder>,
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
    #[serde(default)]
    pub epf_esi_registrations: Vec<EpfEsiRegistration>,
    #[serde(default)]
    pub other_registrations: Vec<OtherRegistration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub section: SectionTag,
    pub key: &'static str,
    pub label: &'static str,
    /// Number of related records behind list-backed tabs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ClientDetail {
    /// Tabs to show for this client, in display order.
    pub fn tabs(&self) -> Vec<Tab> {
        applicable_sections(&self.client.constitution)
            .into_iter()
            .map(|section| Tab {
                section,
                key: section.key(),
                label: section.label(),
                count: self.count(section),
            })
            .collect()
    }

    fn count(&self, section: SectionTag) -> Option<usize> {
        match section {
            SectionTag::Gst => Some(self.gst_registrations.len()),
            SectionTag::Directors => Some(self.directors.len()),
            SectionTag::Shareholders => Some(self.shareholders.len()),
            SectionTag::Partners => Some(self.partners.len()),
            SectionTag::BankAccounts => Some(self.bank_accounts.len()),
            SectionTag::EpfEsi => Some(self.epf_esi_registrations.len()),
            SectionTag::OtherRegistrations => Some(self.other_registrations.len()),
            SectionTag::Overview | SectionTag::Kyc | SectionTag::Credentials => None,
        }
    }
}

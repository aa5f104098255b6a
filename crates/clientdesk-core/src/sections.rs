use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::record::Constitution;

/// A tab of the client detail view. Ordering is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTag {
    Overview,
    Kyc,
    Credentials,
    Gst,
    Directors,
    Shareholders,
    Partners,
    BankAccounts,
    EpfEsi,
    OtherRegistrations,
}

/// Sections every constitution gets.
pub const BASELINE_SECTIONS: [SectionTag; 6] = [
    SectionTag::Overview,
    SectionTag::Credentials,
    SectionTag::Gst,
    SectionTag::BankAccounts,
    SectionTag::EpfEsi,
    SectionTag::OtherRegistrations,
];

impl SectionTag {
    /// Short key used by the detail view to select a tab.
    pub const fn key(self) -> &'static str {
        match self {
            SectionTag::Overview => "overview",
            SectionTag::Kyc => "kyc",
            SectionTag::Credentials => "credentials",
            SectionTag::Gst => "gst",
            SectionTag::Directors => "directors",
            SectionTag::Shareholders => "shareholders",
            SectionTag::Partners => "partners",
            SectionTag::BankAccounts => "bank",
            SectionTag::EpfEsi => "epfesi",
            SectionTag::OtherRegistrations => "otherreg",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SectionTag::Overview => "Overview",
            SectionTag::Kyc => "KYC / DSC",
            SectionTag::Credentials => "Credentials",
            SectionTag::Gst => "GST",
            SectionTag::Directors => "Directors",
            SectionTag::Shareholders => "Shareholders",
            SectionTag::Partners => "Partners",
            SectionTag::BankAccounts => "Bank Accounts",
            SectionTag::EpfEsi => "EPF / ESI",
            SectionTag::OtherRegistrations => "Other Registrations",
        }
    }
}

/// Sections a constitution adds on top of the baseline.
const fn additional_sections(constitution: &Constitution) -> &'static [SectionTag] {
    match constitution {
        Constitution::Individual => &[SectionTag::Kyc],
        Constitution::Company => &[SectionTag::Directors, SectionTag::Shareholders],
        Constitution::Llp | Constitution::PartnershipFirm => &[SectionTag::Partners],
        Constitution::Huf
        | Constitution::Trust
        | Constitution::Aop
        | Constitution::Boi
        | Constitution::Unrecognized(_) => &[],
    }
}

/// Sections applicable to `constitution`, in display order.
///
/// Depends on the constitution alone. Unrecognized constitutions get the
/// baseline. This states intended visibility; it does not police which
/// related records a caller creates.
pub fn applicable_sections(constitution: &Constitution) -> BTreeSet<SectionTag> {
    BASELINE_SECTIONS
        .iter()
        .chain(additional_sections(constitution))
        .copied()
        .collect()
}

/// [`applicable_sections`] for a persisted constitution string.
pub fn applicable_sections_for(constitution: &str) -> BTreeSet<SectionTag> {
    applicable_sections(&Constitution::parse(constitution))
}

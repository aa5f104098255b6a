//! Field derivation: keeps the suggested portal credentials in step with the
//! PAN, TAN and date of incorporation/birth while a record is being edited.
//!
//! Derived values are suggestions. Once written they are ordinary fields, and
//! only a later change to one of the source fields overwrites them again.

use tracing::debug;

use crate::date::DateParts;
use crate::record::{ClientField, ClientRecord, FieldValue};

/// Apply a form change by field name and return the updated record.
///
/// Pure and total. Names that match no known field are stored verbatim and
/// trigger no derivation.
pub fn apply_change(record: &ClientRecord, field: &str, value: FieldValue) -> ClientRecord {
    match field.parse::<ClientField>() {
        Ok(field) => apply_field_change(record, field, value),
        Err(_) => {
            let mut next = record.clone();
            next.set(field, value);
            next
        }
    }
}

/// Typed form of [`apply_change`].
///
/// Exactly one rule block runs, chosen by `field`:
/// - `pan`: `it_portal_user_id` takes the PAN; if a date is present,
///   `password_ais_tis` becomes lowercase PAN + DDMMYYYY.
/// - `tan`: `it_portal_user_id_tds` takes the TAN.
/// - `date_of_incorporation_birth` (non-empty): `password_26as` becomes
///   DDMMYYYY and `password_ais_tis` lowercase current PAN + DDMMYYYY.
pub fn apply_field_change(
    record: &ClientRecord,
    field: ClientField,
    value: FieldValue,
) -> ClientRecord {
    let mut next = record.clone();
    next.set_field(field, value);

    match field {
        ClientField::Pan => {
            let pan = next.pan.clone().unwrap_or_default();
            let ais_tis = present(next.date_of_incorporation_birth.as_deref())
                .map(|dob| ais_tis_password(&pan, &date_parts(dob)));
            next.it_portal_user_id = Some(pan);
            if let Some(password) = ais_tis {
                next.password_ais_tis = Some(password);
            }
        }
        ClientField::Tan => {
            next.it_portal_user_id_tds = next.tan.clone();
        }
        ClientField::DateOfIncorporationBirth => {
            let derived = present(next.date_of_incorporation_birth.as_deref()).map(|dob| {
                let parts = date_parts(dob);
                let pan = next.pan.as_deref().unwrap_or("");
                (parts.ddmmyyyy(), ais_tis_password(pan, &parts))
            });
            if let Some((password_26as, password_ais_tis)) = derived {
                next.password_26as = Some(password_26as);
                next.password_ais_tis = Some(password_ais_tis);
            }
        }
        _ => {}
    }

    next
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn date_parts(raw: &str) -> DateParts<'_> {
    DateParts::decompose(raw).unwrap_or_else(|err| {
        debug!(%err, "deriving credentials from malformed date");
        DateParts::lenient(raw)
    })
}

fn ais_tis_password(pan: &str, date: &DateParts<'_>) -> String {
    let mut out = pan.to_lowercase();
    out.push_str(&date.ddmmyyyy());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Constitution;
    use pretty_assertions::assert_eq;

    fn with_date(date: &str) -> ClientRecord {
        ClientRecord {
            date_of_incorporation_birth: Some(date.to_string()),
            ..ClientRecord::new()
        }
    }

    #[test]
    fn pan_sets_portal_user_id() {
        let next = apply_change(&ClientRecord::new(), "pan", "ABCDE1234F".into());
        assert_eq!(next.pan.as_deref(), Some("ABCDE1234F"));
        assert_eq!(next.it_portal_user_id.as_deref(), Some("ABCDE1234F"));
    }

    #[test]
    fn pan_without_date_leaves_ais_tis_alone() {
        let record = ClientRecord {
            password_ais_tis: Some("manual".into()),
            ..ClientRecord::new()
        };
        let next = apply_change(&record, "pan", "ABCDE1234F".into());
        assert_eq!(next.password_ais_tis.as_deref(), Some("manual"));
        assert_eq!(next.password_26as, None);
    }

    #[test]
    fn pan_with_date_derives_ais_tis() {
        let next = apply_change(&with_date("1990-05-14"), "pan", "ABCDE1234F".into());
        assert_eq!(next.password_ais_tis.as_deref(), Some("abcde1234f14051990"));
        // the 26AS password only follows the date
        assert_eq!(next.password_26as, None);
    }

    #[test]
    fn empty_date_counts_as_absent_for_pan() {
        let next = apply_change(&with_date(""), "pan", "ABCDE1234F".into());
        assert_eq!(next.password_ais_tis, None);
    }

    #[test]
    fn tan_sets_tds_user_id() {
        let next = apply_change(&ClientRecord::new(), "tan", "MUMA12345B".into());
        assert_eq!(next.it_portal_user_id_tds.as_deref(), Some("MUMA12345B"));
        assert_eq!(next.it_portal_user_id, None);
    }

    #[test]
    fn date_without_pan_derives_both_passwords() {
        let next = apply_change(
            &ClientRecord::new(),
            "date_of_incorporation_birth",
            "1990-05-14".into(),
        );
        assert_eq!(next.password_26as.as_deref(), Some("14051990"));
        assert_eq!(next.password_ais_tis.as_deref(), Some("14051990"));
    }

    #[test]
    fn date_uses_current_pan() {
        let record = ClientRecord {
            pan: Some("ABCDE1234F".into()),
            ..ClientRecord::new()
        };
        let next = apply_change(&record, "date_of_incorporation_birth", "2001-12-03".into());
        assert_eq!(next.password_26as.as_deref(), Some("03122001"));
        assert_eq!(next.password_ais_tis.as_deref(), Some("abcde1234f03122001"));
    }

    #[test]
    fn empty_date_touches_no_derived_field() {
        let record = ClientRecord {
            password_26as: Some("keep".into()),
            password_ais_tis: Some("keep too".into()),
            ..with_date("1990-05-14")
        };
        let next = apply_change(&record, "date_of_incorporation_birth", "".into());
        assert_eq!(next.date_of_incorporation_birth.as_deref(), Some(""));
        assert_eq!(next.password_26as.as_deref(), Some("keep"));
        assert_eq!(next.password_ais_tis.as_deref(), Some("keep too"));
    }

    #[test]
    fn derivation_overwrites_manual_suggestions() {
        let record = ClientRecord {
            pan: Some("ABCDE1234F".into()),
            it_portal_user_id: Some("custom-login".into()),
            password_ais_tis: Some("custom-pass".into()),
            ..with_date("1990-05-14")
        };
        let next = apply_change(&record, "pan", "ZZZZZ9999Z".into());
        assert_eq!(next.it_portal_user_id.as_deref(), Some("ZZZZZ9999Z"));
        assert_eq!(next.password_ais_tis.as_deref(), Some("zzzzz9999z14051990"));
    }

    #[test]
    fn editing_a_derived_field_does_not_rederive() {
        let record = apply_change(&with_date("1990-05-14"), "pan", "ABCDE1234F".into());
        let next = apply_change(&record, "password_ais_tis", "my-own".into());
        assert_eq!(next.password_ais_tis.as_deref(), Some("my-own"));
        assert_eq!(next.it_portal_user_id.as_deref(), Some("ABCDE1234F"));
    }

    #[test]
    fn malformed_date_degrades_to_partial_suggestion() {
        let record = ClientRecord {
            pan: Some("ABCDE1234F".into()),
            ..ClientRecord::new()
        };
        let next = apply_change(&record, "date_of_incorporation_birth", "1990-05".into());
        assert_eq!(next.password_26as.as_deref(), Some("051990"));
        assert_eq!(next.password_ais_tis.as_deref(), Some("abcde1234f051990"));
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let record = with_date("1990-05-14");
        let once = apply_change(&record, "pan", "ABCDE1234F".into());
        let twice = apply_change(&once, "pan", "ABCDE1234F".into());
        assert_eq!(once, twice);
    }

    #[test]
    fn other_fields_only_set_themselves() {
        let record = with_date("1990-05-14");
        let next = apply_change(&record, "constitution", "Company".into());
        assert_eq!(next.constitution, Constitution::Company);
        assert_eq!(
            next,
            ClientRecord {
                constitution: Constitution::Company,
                ..record
            }
        );
    }

    #[test]
    fn unknown_field_is_stored_without_derivation() {
        let record = with_date("1990-05-14");
        let next = apply_change(&record, "itPortalUserId", "x".into());
        assert_eq!(next.it_portal_user_id, None);
        assert_eq!(next.extra["itPortalUserId"], serde_json::json!("x"));
    }
}

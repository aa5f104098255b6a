use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::record::{ClientRecord, ClientSummary, Constitution};

/// An immutable list of client records owned by the caller.
///
/// Loading is the collaborator's job; each load produces a fresh snapshot
/// rather than refreshing shared state. Clones share the same records.
#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    records: Arc<[ClientRecord]>,
}

/// List filter. Unset or empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ClientQuery {
    /// Case-insensitive substring of display name, legal name or PAN
    #[serde(default)]
    pub search: Option<String>,
    /// Exact constitution, e.g. "Partnership Firm"
    #[serde(default)]
    pub constitution: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_direct: Option<bool>,
}

impl ClientQuery {
    pub fn matches(&self, record: &ClientRecord) -> bool {
        if let Some(needle) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            let hit = [&record.display_name, &record.legal_name, &record.pan]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(constitution) = self.constitution.as_deref().filter(|c| !c.is_empty()) {
            if record.constitution != Constitution::parse(constitution) {
                return false;
            }
        }
        if self.is_active.is_some_and(|want| record.is_active != want) {
            return false;
        }
        if self.is_direct.is_some_and(|want| record.is_direct_client != want) {
            return false;
        }
        true
    }
}

impl ClientSnapshot {
    /// Build a snapshot, dropping rows without a display name.
    pub fn from_records(records: impl IntoIterator<Item = ClientRecord>) -> Self {
        let records: Vec<ClientRecord> = records
            .into_iter()
            .filter(|r| r.display_name.as_deref().is_some_and(|n| !n.trim().is_empty()))
            .collect();
        Self {
            records: records.into(),
        }
    }

    /// Parse a JSON array of records into a snapshot.
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        let records: Vec<ClientRecord> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `query`, in snapshot order.
    pub fn search(&self, query: &ClientQuery) -> Vec<&ClientRecord> {
        self.records.iter().filter(|r| query.matches(r)).collect()
    }

    pub fn summaries(&self, query: &ClientQuery) -> Vec<ClientSummary> {
        self.search(query).into_iter().map(ClientRecord::summary).collect()
    }

    /// First record whose display name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&ClientRecord> {
        self.records
            .iter()
            .find(|r| r.display_name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, pan: &str, constitution: Constitution) -> ClientRecord {
        ClientRecord {
            display_name: Some(name.to_string()),
            legal_name: Some(format!("{name} Private Limited")),
            pan: Some(pan.to_string()),
            constitution,
            ..ClientRecord::new()
        }
    }

    fn snapshot() -> ClientSnapshot {
        ClientSnapshot::from_records([
            client("Acme", "AAACA1111A", Constitution::Company),
            client("Bharat Traders", "AAAFB2222B", Constitution::PartnershipFirm),
            ClientRecord {
                is_active: false,
                ..client("Chitra Rao", "ABCPR3333C", Constitution::Individual)
            },
            ClientRecord::new(),
        ])
    }

    fn names<'a>(records: &[&'a ClientRecord]) -> Vec<&'a str> {
        records
            .iter()
            .filter_map(|r| r.display_name.as_deref())
            .collect()
    }

    #[test]
    fn rows_without_a_name_are_dropped() {
        assert_eq!(snapshot().len(), 3);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let snap = snapshot();
        assert_eq!(
            names(&snap.search(&ClientQuery::default())),
            ["Acme", "Bharat Traders", "Chitra Rao"]
        );
    }

    #[test]
    fn search_matches_names_and_pan_case_insensitively() {
        let snap = snapshot();
        let by_pan = ClientQuery {
            search: Some("aafb".into()),
            ..ClientQuery::default()
        };
        assert_eq!(names(&snap.search(&by_pan)), ["Bharat Traders"]);

        let by_legal_name = ClientQuery {
            search: Some("PRIVATE".into()),
            ..ClientQuery::default()
        };
        assert_eq!(snap.search(&by_legal_name).len(), 3);
    }

    #[test]
    fn exact_filters_combine() {
        let snap = snapshot();
        let query = ClientQuery {
            constitution: Some("Individual".into()),
            is_active: Some(false),
            ..ClientQuery::default()
        };
        assert_eq!(names(&snap.search(&query)), ["Chitra Rao"]);

        let none = ClientQuery {
            is_direct: Some(false),
            ..ClientQuery::default()
        };
        assert!(snap.search(&none).is_empty());
    }

    #[test]
    fn empty_filters_mean_all() {
        let snap = snapshot();
        let query = ClientQuery {
            search: Some(String::new()),
            constitution: Some(String::new()),
            ..ClientQuery::default()
        };
        assert_eq!(snap.search(&query).len(), snap.len());
    }

    #[test]
    fn clones_share_records() {
        let snap = snapshot();
        let copy = snap.clone();
        assert!(std::ptr::eq(snap.records(), copy.records()));
        assert_eq!(copy.find_by_name("Acme").and_then(|r| r.pan.as_deref()), Some("AAACA1111A"));
        assert!(copy.find_by_name("acme").is_none());
    }

    #[test]
    fn parses_json_array() {
        let snap = ClientSnapshot::from_json(
            r#"[{"display_name": "Acme", "constitution": "Company"}, {"display_name": ""}]"#,
        )
        .unwrap();
        assert_eq!(snap.len(), 1);
        assert!(ClientSnapshot::from_json("{}").is_err());
    }
}

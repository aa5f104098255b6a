/// An ISO `YYYY-MM-DD` date split into its text segments.
///
/// Segments are borrowed as-is; no calendar validation happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts<'a> {
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed date `{raw}`: expected YYYY-MM-DD, found {segments} segment(s)")]
pub struct MalformedDate {
    pub raw: String,
    pub segments: usize,
}

impl<'a> DateParts<'a> {
    /// Split `raw` into year, month and day. Exactly three `-`-separated
    /// segments are required.
    pub fn decompose(raw: &'a str) -> Result<Self, MalformedDate> {
        let segments: Vec<&str> = raw.split('-').collect();
        match segments.as_slice() {
            &[year, month, day] => Ok(Self { year, month, day }),
            other => Err(MalformedDate {
                raw: raw.to_string(),
                segments: other.len(),
            }),
        }
    }

    /// Best-effort split: missing segments are empty, surplus ones ignored.
    pub fn lenient(raw: &'a str) -> Self {
        let mut segments = raw.split('-');
        Self {
            year: segments.next().unwrap_or(""),
            month: segments.next().unwrap_or(""),
            day: segments.next().unwrap_or(""),
        }
    }

    /// Day, month and year digits concatenated without separators.
    pub fn ddmmyyyy(&self) -> String {
        let mut out = String::with_capacity(self.day.len() + self.month.len() + self.year.len());
        out.push_str(self.day);
        out.push_str(self.month);
        out.push_str(self.year);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_iso_date() {
        let parts = DateParts::decompose("1990-05-14").unwrap();
        assert_eq!(
            parts,
            DateParts {
                year: "1990",
                month: "05",
                day: "14"
            }
        );
        assert_eq!(parts.ddmmyyyy(), "14051990");
    }

    #[test]
    fn wrong_segment_count_is_reported() {
        let err = DateParts::decompose("14/05/1990").unwrap_err();
        assert_eq!(err.segments, 1);
        assert_eq!(DateParts::decompose("1990-05-14-x").unwrap_err().segments, 4);
    }

    #[test]
    fn lenient_fills_missing_segments_with_empty_text() {
        assert_eq!(DateParts::lenient("1990-05").ddmmyyyy(), "051990");
        assert_eq!(DateParts::lenient("1990").ddmmyyyy(), "1990");
        assert_eq!(DateParts::lenient("1990-05-14-99").ddmmyyyy(), "14051990");
    }
}

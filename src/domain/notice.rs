use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::visibility::timestamp::{parse_date, parse_publish_time};

/// A notice as held by the record store.
///
/// `publish_date_time` and `expiry_date` are kept as the text the store holds
/// (`YYYY-MM-DDTHH:MM` and `YYYY-MM-DD`, wall-clock time in the board's zone).
/// Records written by other tools may carry values that do not parse; the
/// visibility engine decides what to do with those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date_time: String,
    pub is_urgent: bool,
    pub pdf_url: Option<String>,
    pub expiry_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_publish_time(&self.publish_date_time)
    }

    /// Raw expiry text, with blank values treated as no expiry.
    pub fn expiry_text(&self) -> Option<&str> {
        self.expiry_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.expiry_text().and_then(parse_date)
    }
}

/// Fully resolved notice fields, ready to be written by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date_time: String,
    pub is_urgent: bool,
    pub pdf_url: Option<String>,
    pub expiry_date: Option<String>,
}

/// Blank links and the `#` placeholder mean "no attachment".
pub fn normalize_pdf_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty() && u != "#")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(expiry: Option<&str>) -> Notice {
        Notice {
            id: 1,
            title: "Water shutdown".to_string(),
            content: "Tank cleaning on Friday".to_string(),
            author: "Committee".to_string(),
            publish_date_time: "2024-07-01T09:00".to_string(),
            is_urgent: false,
            pdf_url: None,
            expiry_date: expiry.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_expiry_is_no_expiry() {
        assert_eq!(notice(Some("  ")).expiry_text(), None);
        assert_eq!(notice(None).expires_on(), None);
        assert_eq!(
            notice(Some("2024-07-08")).expires_on(),
            NaiveDate::from_ymd_opt(2024, 7, 8)
        );
    }

    #[test]
    fn test_normalize_pdf_url() {
        assert_eq!(normalize_pdf_url(Some("#".to_string())), None);
        assert_eq!(normalize_pdf_url(Some("   ".to_string())), None);
        assert_eq!(normalize_pdf_url(None), None);
        assert_eq!(
            normalize_pdf_url(Some(" https://x/a.pdf ".to_string())),
            Some("https://x/a.pdf".to_string())
        );
    }
}

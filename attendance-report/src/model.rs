// Input snapshot for one report render

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Length of a session check-in code.
pub const SESSION_CODE_LEN: usize = 6;

/// Opaque pointer to a stored image, resolved by an `AssetResolver`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub bucket: String,
    pub path: String,
}

impl AssetRef {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Parse `bucket/some/path.png`; the first segment is the bucket.
    pub fn parse(s: &str) -> Option<Self> {
        let (bucket, path) = s.trim_matches('/').split_once('/')?;
        if bucket.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self::new(bucket, path))
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub address: String,
    #[serde(default)]
    pub logo: Option<AssetRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub code: String,
    pub topic: String,
    pub location: String,
    pub scheduled_at: DateTime<FixedOffset>,
    pub trainer_name: String,
    pub closed_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub trainer_signature: Option<AssetRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeRecord {
    pub full_name: String,
    pub tax_id: String,
    pub role: String,
    pub checked_in_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub signature: Option<AssetRef>,
}

/// Everything needed to render one attendance report. Attendees are kept in
/// check-in order; that order is the legal record order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportModel {
    pub company: Company,
    pub session: Session,
    #[serde(default)]
    pub attendees: Vec<AttendeeRecord>,
}

impl ReportModel {
    /// Structural checks performed before any page is allocated.
    pub fn validate(&self) -> Result<(), ReportError> {
        let code = &self.session.code;
        if code.len() != SESSION_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReportError::InvalidModel(format!(
                "session code must be {} alphanumeric characters, got {:?}",
                SESSION_CODE_LEN, code
            )));
        }
        if self.company.name.trim().is_empty() {
            return Err(ReportError::InvalidModel("company name is empty".into()));
        }
        if self.session.trainer_name.trim().is_empty() {
            return Err(ReportError::InvalidModel("trainer name is empty".into()));
        }

        for (i, attendee) in self.attendees.iter().enumerate() {
            if attendee.full_name.trim().is_empty() {
                return Err(ReportError::InvalidModel(format!(
                    "attendee #{} has no name",
                    i + 1
                )));
            }
        }

        if let Some(pos) = self
            .attendees
            .windows(2)
            .position(|w| w[1].checked_in_at < w[0].checked_in_at)
        {
            return Err(ReportError::InvalidModel(format!(
                "attendee #{} checked in before attendee #{}",
                pos + 2,
                pos + 1
            )));
        }

        Ok(())
    }
}

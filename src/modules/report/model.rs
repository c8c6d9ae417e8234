use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub sha256: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScamReport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub description: String,
    pub is_anonymous: bool,
    pub evidence: Vec<EvidenceFile>,
    pub created_at: DateTime<Utc>,
}

impl ScamReport {
    pub fn new(description: String, is_anonymous: bool, evidence: Vec<EvidenceFile>) -> Self {
        Self {
            id: Some(ObjectId::new()),
            description,
            is_anonymous,
            evidence,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NewsContentType {
    Text,
    Image,
    Video,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewsReport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content_type: NewsContentType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewsReport {
    pub fn new(content_type: NewsContentType, description: String) -> Self {
        Self {
            id: Some(ObjectId::new()),
            content_type,
            description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyKind {
    DuplicateVoter,
    FakeCandidate,
    MaliciousLink,
    Misinformation,
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnomalyReport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub report_type: AnomalyKind,
    pub details: String,
    pub evidence: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AnomalyReport {
    pub fn new(report_type: AnomalyKind, details: String, evidence: Option<String>) -> Self {
        Self {
            id: Some(ObjectId::new()),
            report_type,
            details,
            evidence,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomaly_kinds_use_kebab_case() {
        let json = serde_json::to_string(&AnomalyKind::DuplicateVoter).unwrap();
        assert_eq!(json, "\"duplicate-voter\"");

        let kind: AnomalyKind = serde_json::from_str("\"malicious-link\"").unwrap();
        assert_eq!(kind, AnomalyKind::MaliciousLink);
        assert!(serde_json::from_str::<AnomalyKind>("\"ballot-stuffing\"").is_err());
    }
}

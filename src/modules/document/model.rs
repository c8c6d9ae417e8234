use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registered document. `hash` is the lowercase hex SHA-256 of the file
/// bytes as uploaded; only the digest and metadata are kept, never the bytes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub hash: String,
    pub qr_code_url: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: u64,
    pub created_at: bson::DateTime,
}

impl DocumentRecord {
    pub fn new(
        name: String,
        hash: String,
        qr_base_url: &str,
        file_name: String,
        content_type: Option<String>,
        file_size: u64,
    ) -> Self {
        let qr_code_url = format!("{}?size=128x128&data={}", qr_base_url, hash);

        Self {
            id: Some(ObjectId::new()),
            name,
            hash,
            qr_code_url,
            file_name,
            content_type,
            file_size,
            created_at: bson::DateTime::now(),
        }
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.try_to_rfc3339_string().unwrap_or_default()
    }
}

use crate::modules::document::model::DocumentRecord;
use crate::modules::repository::{Record, Repository};

impl Record for DocumentRecord {
    const COLLECTION_NAME: &'static str = "documents";
}

pub type DocumentCrud = Repository<DocumentRecord>;

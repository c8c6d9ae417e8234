use crate::modules::report::model::{AnomalyReport, NewsReport, ScamReport};
use crate::modules::repository::{Record, Repository};

impl Record for ScamReport {
    const COLLECTION_NAME: &'static str = "scam_reports";
}

impl Record for NewsReport {
    const COLLECTION_NAME: &'static str = "news_reports";
}

impl Record for AnomalyReport {
    const COLLECTION_NAME: &'static str = "anomaly_reports";
}

pub type ScamReportCrud = Repository<ScamReport>;
pub type NewsReportCrud = Repository<NewsReport>;
pub type AnomalyReportCrud = Repository<AnomalyReport>;

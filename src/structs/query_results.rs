use crate::structs::error_proto::ErrorProto;
use crate::structs::job_reference::JobReference;
use crate::structs::table_row::TableRow;
use crate::structs::table_schema::TableSchema;
use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/jobs/getQueryResults
//
// Numeric totals come over the wire as decimal strings; the accessors below
// parse them on demand.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes_processed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_hit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<TableRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorProto>>,
}

impl QueryResults {
    pub fn job_complete(&self) -> bool {
        self.job_complete.unwrap_or(false)
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn total_bytes_processed(&self) -> i64 {
        self.total_bytes_processed
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

use crate::structs::job_configuration::JobConfiguration;
use crate::structs::job_configuration_query::JobConfigurationQuery;
use crate::structs::job_reference::JobReference;
use crate::structs::job_status::JobStatus;
use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/Job
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<JobConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl Job {
    pub fn new(query: String, use_legacy_sql: bool) -> Self {
        Job {
            configuration: Some(JobConfiguration {
                query: Some(JobConfigurationQuery {
                    query: Some(query),
                    use_legacy_sql: Some(use_legacy_sql),
                }),
            }),
            job_reference: None,
            status: None,
        }
    }
}

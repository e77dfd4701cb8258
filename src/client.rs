use std::fmt;
use std::sync::Arc;

use crate::error::BigQueryError;
use crate::iterator::{QueryConfig, QueryResultsIterator, QueryResultsService, ResultPager};
use crate::structs;
use crate::structs::job_status::JobStatus;
use crate::structs::query_results::QueryResults;
use yup_oauth2::authenticator::DefaultAuthenticator;

const SCOPES: &[&str; 1] = &["https://www.googleapis.com/auth/bigquery"];

/// Marker comment recognized in submitted SQL text. A query containing it is
/// run with legacy SQL syntax; the marker is not interpreted anywhere else.
pub const LEGACY_SQL_MARKER: &str = "/* USE LEGACY SQL */";

struct InnerClient {
    authenticator: DefaultAuthenticator,
    reqwest_client: reqwest::Client,
}

#[derive(Clone)]
pub struct Client {
    inner_client: Arc<InnerClient>,
}

impl Client {
    /// Builds a client from an authorized user secret json, e.g.
    /// `~/.config/gcloud/application_default_credentials.json`.
    pub async fn new(credentials_path: &str) -> Result<Self, BigQueryError> {
        let secret = yup_oauth2::read_authorized_user_secret(credentials_path).await?;
        let authenticator = yup_oauth2::AuthorizedUserAuthenticator::builder(secret)
            .build()
            .await?;
        Ok(Client {
            inner_client: Arc::new(InnerClient {
                authenticator,
                reqwest_client: reqwest::Client::new(),
            }),
        })
    }

    /// Inserts a query job and returns its handle.
    pub async fn post_query(&self, project_id: &str, query: String) -> Result<Job, BigQueryError> {
        let api_url = format!(
            "https://bigquery.googleapis.com/bigquery/v2/projects/{project_id}/jobs",
            project_id = project_id
        );
        let tok = self.inner_client.authenticator.token(SCOPES).await?;
        let use_legacy_sql = query.contains(LEGACY_SQL_MARKER);
        let job = structs::job::Job::new(query, use_legacy_sql);
        let res = self
            .inner_client
            .reqwest_client
            .post(api_url)
            .json(&job)
            .bearer_auth(tok.as_str())
            .send()
            .await?
            .error_for_status()?;
        let job: structs::job::Job = res.json().await?;
        if let Some(JobStatus {
            error_result: Some(error),
            ..
        }) = &job.status
        {
            return Err(BigQueryError::JobInsertError {
                msg: error.message.clone(),
            });
        }
        if let Some(JobStatus {
            errors: Some(errors),
            ..
        }) = &job.status
        {
            for error in errors {
                log::warn!("Got error in job insert request: {}", error.message);
            }
        }
        Ok(Job {
            client: self.clone(),
            inner_job: job,
            project_id: project_id.into(),
        })
    }
}

impl QueryResultsService for Client {
    async fn get_query_results(
        &self,
        project_id: &str,
        job_id: &str,
        max_results: u32,
        page_token: &str,
    ) -> Result<QueryResults, BigQueryError> {
        let api_url = format!(
            "https://bigquery.googleapis.com/bigquery/v2/projects/{project_id}/queries/{job_id}",
            project_id = project_id,
            job_id = job_id,
        );
        let tok = self.inner_client.authenticator.token(SCOPES).await?;
        let mut request = self
            .inner_client
            .reqwest_client
            .get(api_url)
            .query(&[("maxResults", max_results.to_string())])
            .bearer_auth(tok.as_str());
        if !page_token.is_empty() {
            request = request.query(&[("pageToken", page_token)]);
        }
        let res = request.send().await?.error_for_status()?;
        let results: QueryResults = res.json().await?;
        Ok(results)
    }
}

/// Handle to one submitted query job.
#[derive(Clone)]
pub struct Job {
    client: Client,
    inner_job: structs::job::Job,
    project_id: String,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("inner_job", &self.inner_job)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl Job {
    pub fn job_id(&self) -> Result<&str, BigQueryError> {
        self.inner_job
            .job_reference
            .as_ref()
            .and_then(|reference| reference.job_id.as_deref())
            .ok_or(BigQueryError::MissingJobIdInGoogleApiResponse)
    }

    /// Opens a streaming iterator over the job's results. Fetches the first
    /// page before returning.
    pub async fn query_results(
        &self,
        config: QueryConfig,
    ) -> Result<QueryResultsIterator<Client>, BigQueryError> {
        let job_id = self.job_id()?.to_string();
        let pager = ResultPager::new(
            self.client.clone(),
            self.project_id.clone(),
            job_id,
            config,
        );
        QueryResultsIterator::new(pager).await
    }
}

use crate::decoder::{decode_row, Value};
use crate::error::BigQueryError;
use crate::structs::query_results::QueryResults;
use crate::structs::table_row::TableRow;
use crate::structs::table_schema::TableSchema;

pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Result-fetch tunables, passed to the pager at construction.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Row-count cap per `getQueryResults` call.
    pub page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Transport seam for `jobs.getQueryResults`. Implemented by [`crate::Client`]
/// against the live API and by canned stubs in tests.
#[allow(async_fn_in_trait)]
pub trait QueryResultsService {
    async fn get_query_results(
        &self,
        project_id: &str,
        job_id: &str,
        max_results: u32,
        page_token: &str,
    ) -> Result<QueryResults, BigQueryError>;
}

/// Fetches result pages for one job. Carries only the job identity and the
/// fetch config; all paging state lives in the iterator.
pub struct ResultPager<S> {
    service: S,
    project_id: String,
    job_id: String,
    config: QueryConfig,
}

impl<S: QueryResultsService> ResultPager<S> {
    pub fn new(service: S, project_id: String, job_id: String, config: QueryConfig) -> Self {
        ResultPager {
            service,
            project_id,
            job_id,
            config,
        }
    }

    /// One `getQueryResults` call. Errors propagate verbatim, no retry.
    pub async fn fetch_page(&self, page_token: &str) -> Result<QueryResults, BigQueryError> {
        let page = self
            .service
            .get_query_results(
                &self.project_id,
                &self.job_id,
                self.config.page_size,
                page_token,
            )
            .await?;
        log::debug!(
            "fetched result page for job {}: {} rows, complete: {}, more pages: {}",
            self.job_id,
            page.rows.as_ref().map_or(0, |rows| rows.len()),
            page.job_complete(),
            page.page_token.is_some(),
        );
        Ok(page)
    }
}

/// Result metadata, latched from the first page response that reports it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryResultInfo {
    pub total_rows: u64,
    pub total_bytes_processed: i64,
    pub cache_hit: bool,
}

/// Streams decoded rows out of a finished or still-running query job, holding
/// at most one page of raw rows in memory.
///
/// Each `next()` call decodes exactly one row; crossing a page boundary
/// performs the fetch inline. Not shareable across tasks: the cursor state is
/// `&mut`-owned and unsynchronized.
pub struct QueryResultsIterator<S> {
    pager: ResultPager<S>,
    schema: Option<TableSchema>,
    rows: Vec<TableRow>,
    rows_index: usize,
    page_token: String,
    job_complete: bool,
    total_rows: u64,
    processed_rows: u64,
    result_info: QueryResultInfo,
}

impl<S: QueryResultsService> QueryResultsIterator<S> {
    /// Binds to an already-submitted job and fetches the first page before
    /// returning, establishing schema and result metadata when available.
    pub async fn new(pager: ResultPager<S>) -> Result<Self, BigQueryError> {
        let mut iterator = QueryResultsIterator {
            pager,
            schema: None,
            rows: Vec::new(),
            rows_index: 0,
            page_token: String::new(),
            job_complete: false,
            total_rows: 0,
            processed_rows: 0,
            result_info: QueryResultInfo::default(),
        };
        iterator.fetch_page().await?;
        Ok(iterator)
    }

    /// True while rows remain. A still-running job that has not reported its
    /// row count yet also answers true; only a page that reports completion
    /// with zero total rows makes an empty result final.
    pub fn has_next(&self) -> bool {
        if !self.job_complete && self.total_rows == 0 {
            return true;
        }
        self.processed_rows < self.total_rows
    }

    /// Returns the next decoded row.
    ///
    /// On a page boundary the fetch happens first, and a fetch failure leaves
    /// all counters untouched, so calling `next()` again retries the same row.
    /// Once a buffered row is consumed the counters advance before decoding;
    /// a decode failure therefore skips the poisoned row instead of yielding
    /// it again forever. Either way an error yields no row and the caller
    /// should treat it as terminal for this iterator.
    pub async fn next(&mut self) -> Result<Vec<Value>, BigQueryError> {
        if !self.has_next() {
            return Err(BigQueryError::ResultSetExhausted(self.total_rows));
        }
        while self.rows_index >= self.rows.len() {
            if self.job_complete && self.page_token.is_empty() {
                // service announced more rows than it delivered
                return Err(BigQueryError::ResultSetExhausted(self.total_rows));
            }
            self.fetch_page().await?;
        }
        let index = self.rows_index;
        self.rows_index += 1;
        self.processed_rows += 1;
        let schema = self
            .schema
            .as_ref()
            .ok_or(BigQueryError::SchemaUnavailable)?;
        decode_row(&self.rows[index], &schema.fields)
    }

    /// Top-level column names, once a page carrying the schema has been seen.
    pub fn get_columns(&self) -> Result<Vec<String>, BigQueryError> {
        let schema = self
            .schema
            .as_ref()
            .ok_or(BigQueryError::SchemaUnavailable)?;
        Ok(schema.fields.iter().map(|field| field.name.clone()).collect())
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn result_info(&self) -> &QueryResultInfo {
        &self.result_info
    }

    pub fn processed_rows(&self) -> u64 {
        self.processed_rows
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    // Replaces the held page wholesale and resets the cursor. The schema and
    // the totals are latched: the service repeats them on every page, but a
    // page fetched before the job finished planning may still carry a zero
    // row count, so zero stays overwritable until a real count shows up.
    async fn fetch_page(&mut self) -> Result<(), BigQueryError> {
        let page = self.pager.fetch_page(&self.page_token).await?;
        if self.total_rows == 0 {
            self.total_rows = page.total_rows();
        }
        if self.result_info.total_rows == 0 {
            self.result_info = QueryResultInfo {
                total_rows: page.total_rows(),
                total_bytes_processed: page.total_bytes_processed(),
                cache_hit: page.cache_hit.unwrap_or(false),
            };
        }
        self.job_complete = page.job_complete();
        self.rows = page.rows.unwrap_or_default();
        self.rows_index = 0;
        self.page_token = page.page_token.unwrap_or_default();
        if self.schema.is_none() {
            self.schema = page.schema;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BigQueryError {
    #[error("Authentication error (error: {0})")]
    YupAuthError(#[from] yup_oauth2::Error),
    #[error("Failed to read credentials (error: {0})")]
    CredentialsError(#[from] std::io::Error),
    #[error("Request to google api error (error: {0})")]
    ApiRequestError(#[from] reqwest::Error),
    #[error("Query job insert failed: {msg}")]
    JobInsertError { msg: String },
    #[error("Malformed google api response: missing job_id")]
    MissingJobIdInGoogleApiResponse,
    #[error("Failed to get table schema: no page with a schema observed yet")]
    SchemaUnavailable,
    #[error("Row does not match result schema: {0}")]
    RowSchemaMismatch(String),
    #[error("Wire value violates the tagged-container contract: {0}")]
    DecodeInvariant(String),
    #[error("Result set exhausted: all {0} rows already returned")]
    ResultSetExhausted(u64),
}

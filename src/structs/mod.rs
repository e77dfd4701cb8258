pub mod error_proto;
pub mod job;
pub mod job_configuration;
pub mod job_configuration_query;
pub mod job_reference;
pub mod job_status;
pub mod query_results;
pub mod row_field;
pub mod table_field_schema;
pub mod table_row;
pub mod table_schema;

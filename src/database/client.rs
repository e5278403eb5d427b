//! ClickHouse client over the HTTP interface.
//!
//! Each operation is one POST: the SQL statement in the body, the target
//! database and `default_format=JSONEachRow` as query parameters, credentials
//! in the `X-ClickHouse-User` / `X-ClickHouse-Key` headers. Responses are
//! newline-delimited JSON objects decoded into loosely-typed rows.

use crate::config::DatabaseConfig;
use crate::database::result::{ColumnDescriptor, Row, decode_json_each_row, extract_string_column};
use crate::database::traits::DatabaseClient;
use crate::error::{DatabaseError, DbResult};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Header carrying the ClickHouse username.
const HEADER_USER: &str = "X-ClickHouse-User";
/// Header carrying the ClickHouse password.
const HEADER_KEY: &str = "X-ClickHouse-Key";

pub struct ClickHouseClient {
    http: reqwest::Client,
    url: String,
    username: String,
    password: String,
    database: String,
}

impl ClickHouseClient {
    pub fn new(config: &DatabaseConfig) -> DbResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
        })
    }

    /// Sends one statement and returns the raw response body.
    ///
    /// Any non-success status surfaces the response body (the ClickHouse
    /// exception text) as the error message, with no further classification.
    async fn execute(&self, sql: &str) -> DbResult<String> {
        debug!("Executing statement ({} bytes)", sql.len());

        let response = self
            .http
            .post(&self.url)
            .query(&[
                ("database", self.database.as_str()),
                ("default_format", "JSONEachRow"),
            ])
            .header(HEADER_USER, &self.username)
            .header(HEADER_KEY, &self.password)
            .body(sql.to_string())
            .send()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(DatabaseError::QueryFailed(body.trim().to_string()));
        }

        Ok(body)
    }
}

#[async_trait]
impl DatabaseClient for ClickHouseClient {
    fn database(&self) -> &str {
        &self.database
    }

    #[instrument(skip(self))]
    async fn list_tables(&self) -> DbResult<Vec<String>> {
        let sql = format!("SHOW TABLES FROM {}", quote_identifier(&self.database));
        let rows = decode_json_each_row(&self.execute(&sql).await?)?;
        extract_string_column(&rows, "name")
    }

    #[instrument(skip(self))]
    async fn table_schema(&self, table: &str) -> DbResult<Vec<ColumnDescriptor>> {
        let sql = format!(
            "DESCRIBE TABLE {}.{}",
            quote_identifier(&self.database),
            quote_identifier(table)
        );
        let rows = decode_json_each_row(&self.execute(&sql).await?)?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(serde_json::Value::Object(row))
                    .map_err(|e| DatabaseError::Decode(e.to_string()))
            })
            .collect()
    }

    #[instrument(skip(self, sql))]
    async fn run_query(&self, sql: &str) -> DbResult<Vec<Row>> {
        decode_json_each_row(&self.execute(sql).await?)
    }

    #[instrument(skip(self))]
    async fn sample(&self, table: &str, limit: u32) -> DbResult<Vec<Row>> {
        let sql = format!(
            "SELECT * FROM {}.{} LIMIT {}",
            quote_identifier(&self.database),
            quote_identifier(table),
            limit
        );
        decode_json_each_row(&self.execute(&sql).await?)
    }

    async fn close(&self) {
        // The HTTP client owns only keep-alive connections; dropping it is the
        // whole teardown. Kept as an explicit lifecycle point so shutdown is
        // observable and happens exactly once.
        info!("Closing ClickHouse connection to {}", self.url);
    }
}

/// Backtick-quote an identifier for interpolation into SQL text.
///
/// Table names arrive from protocol requests, so metacharacters must not be
/// able to break out of the `SHOW`/`DESCRIBE`/`SELECT` templates.
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        match c {
            '`' => quoted.push_str("\\`"),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('`');
    quoted
}

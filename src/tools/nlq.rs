//! Natural-language-to-schema-context tool.
//!
//! Purely a templating operation: no query is executed against user data and
//! no LLM call is made here. The caller's model does the actual reasoning.

use crate::error::{McpError, Result, ToolError};
use crate::metadata::MetadataService;
use crate::protocol::{CallToolResult, Tool};
use crate::tools::registry::ToolHandler;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct NaturalLanguageQueryArgs {
    pub question: String,
}

/// `natural-language-query`: answer a question about the data with the schema
/// context the model needs to write its own SQL.
pub struct NaturalLanguageQueryTool {
    metadata: MetadataService,
}

impl NaturalLanguageQueryTool {
    pub fn new(metadata: MetadataService) -> Self {
        Self { metadata }
    }
}

#[async_trait]
impl ToolHandler for NaturalLanguageQueryTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "natural-language-query".into(),
            description: Some(
                "Turn a natural-language question about the data into schema \
                context: returns the question together with every table's \
                columns so a SQL query can be written with execute-sql."
                    .into(),
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The natural-language question about the data"
                    }
                },
                "required": ["question"]
            }),
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "natural-language-query"))]
    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: NaturalLanguageQueryArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let snapshot = self.metadata.database_info().await.map_err(McpError::from)?;

        let text = format!(
            "Question: {question}\n\n\
            Database \"{database}\" schema:\n{summary}\n\n\
            Write a SQL query answering the question against these tables and \
            run it with the execute-sql tool.",
            question = args.question,
            database = snapshot.database,
            summary = snapshot.schema_summary(),
        );

        Ok(CallToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::mock::MockClient;
    use crate::protocol::ToolContent;
    use serde_json::json;
    use std::sync::Arc;

    fn response_text(result: &CallToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0] else {
            panic!("expected text content");
        };
        text
    }

    #[tokio::test]
    async fn test_response_embeds_question_schema_and_suggestion() {
        let metadata = MetadataService::new(Arc::new(MockClient::analytics()));
        let tool = NaturalLanguageQueryTool::new(metadata);

        let result = tool
            .execute(json!({"question": "how many users signed up last week?"}))
            .await
            .unwrap();

        let text = response_text(&result);
        assert!(text.contains("how many users signed up last week?"));
        assert!(text.contains("Table \"users\" has columns: id (UInt64), name (String)"));
        assert!(text.contains("execute-sql"));
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_no_query_is_executed() {
        let client = Arc::new(MockClient::analytics());
        let tool = NaturalLanguageQueryTool::new(MetadataService::new(
            Arc::clone(&client) as Arc<dyn crate::database::DatabaseClient>,
        ));

        tool.execute(json!({"question": "anything"})).await.unwrap();
        assert!(client.executed_queries().is_empty());
    }

    #[tokio::test]
    async fn test_missing_question_argument() {
        let metadata = MetadataService::new(Arc::new(MockClient::analytics()));
        let tool = NaturalLanguageQueryTool::new(metadata);
        assert!(tool.execute(json!({})).await.is_err());
    }
}

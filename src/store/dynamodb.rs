use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use super::{Backend, RawPage, RawQuery};
use crate::codec::AttributeMap;
use crate::error::BackendError;

/// [`Backend`] over a DynamoDB table with a `PK` hash key and `SK` range key.
#[derive(Debug, Clone)]
pub struct DynamoDbBackend {
    client: Client,
}

impl DynamoDbBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Backend for DynamoDbBackend {
    async fn put_item(&self, table: &str, item: AttributeMap) -> Result<(), BackendError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    async fn get_item(
        &self,
        table: &str,
        key: AttributeMap,
    ) -> Result<Option<AttributeMap>, BackendError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await?;
        Ok(output.item)
    }

    async fn query(&self, table: &str, query: RawQuery) -> Result<RawPage, BackendError> {
        let output = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression("#pk = :pk AND begins_with(#sk, :sk)")
            .expression_attribute_names("#pk", "PK")
            .expression_attribute_names("#sk", "SK")
            .expression_attribute_values(":pk", AttributeValue::S(query.partition_key))
            .expression_attribute_values(":sk", AttributeValue::S(query.sort_key_prefix))
            .set_limit(query.limit)
            .set_exclusive_start_key(query.exclusive_start_key)
            .send()
            .await?;

        Ok(RawPage {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
        })
    }
}

//! Provisioning of the single table: `PK` hash key, `SK` range key.

use std::time::Duration;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{BuildError, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use thiserror::Error;
use tokio::time::{Instant, sleep};

use crate::item::{PK_ATTRIBUTE, SK_ATTRIBUTE};

const READY_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to describe table: {0:?}")]
    Describe(#[from] SdkError<DescribeTableError>),

    #[error("Failed to create table: {0:?}")]
    Create(#[from] SdkError<CreateTableError>),

    #[error("Failed to delete table: {0:?}")]
    Delete(#[from] SdkError<DeleteTableError>),

    #[error("Invalid table definition: {0}")]
    Definition(#[from] BuildError),

    #[error("Table {table} was not active after {waited:?}")]
    NotReady { table: String, waited: Duration },
}

/// Create the table if it does not exist, then wait until it is active.
pub async fn ensure_table(client: &Client, table_name: &str) -> Result<(), TableError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!(table = table_name, "Table already exists");
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(DescribeTableError::is_resource_not_found_exception) =>
        {
            tracing::info!(table = table_name, "Creating table");
            create_table(client, table_name).await?;
        }
        Err(err) => return Err(err.into()),
    }

    wait_until_active(client, table_name).await
}

/// Delete the table. A table that does not exist counts as deleted.
pub async fn delete_table(client: &Client, table_name: &str) -> Result<(), TableError> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::info!(table = table_name, "Table deleted");
            Ok(())
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(DeleteTableError::is_resource_not_found_exception) =>
        {
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn create_table(client: &Client, table_name: &str) -> Result<(), TableError> {
    client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(PK_ATTRIBUTE)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(SK_ATTRIBUTE)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(PK_ATTRIBUTE)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(SK_ATTRIBUTE)
                .key_type(KeyType::Range)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await?;
    Ok(())
}

async fn wait_until_active(client: &Client, table_name: &str) -> Result<(), TableError> {
    let started = Instant::now();
    loop {
        let output = client.describe_table().table_name(table_name).send().await?;
        let status = output.table().and_then(|table| table.table_status());
        if status == Some(&TableStatus::Active) {
            tracing::debug!(table = table_name, elapsed = ?started.elapsed(), "Table is active");
            return Ok(());
        }
        if started.elapsed() >= READY_TIMEOUT {
            return Err(TableError::NotReady {
                table: table_name.to_string(),
                waited: READY_TIMEOUT,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

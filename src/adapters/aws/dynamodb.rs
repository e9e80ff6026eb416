use crate::domain::registration::Registration;
use crate::ports::repository::RegistrationRepository;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;

/// DynamoAdapter implements RegistrationRepository for AWS DynamoDB.
#[derive(Clone)]
pub struct DynamoAdapter {
    client: Client,
    table_name: String,
}

impl DynamoAdapter {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

/// Map a registration onto a DynamoDB item, one attribute per column.
pub fn registration_item(
    registration: &Registration,
) -> Result<HashMap<String, AttributeValue>, serde_json::Error> {
    let Value::Object(columns) = serde_json::to_value(registration)? else {
        return Ok(HashMap::new());
    };

    Ok(columns
        .into_iter()
        .map(|(column, value)| {
            let attribute = match value {
                Value::String(s) => AttributeValue::S(s),
                Value::Number(n) => AttributeValue::N(n.to_string()),
                Value::Bool(b) => AttributeValue::Bool(b),
                Value::Null => AttributeValue::Null(true),
                other => AttributeValue::S(other.to_string()),
            };
            (column, attribute)
        })
        .collect())
}

#[async_trait]
impl RegistrationRepository for DynamoAdapter {
    async fn insert_registration(
        &self,
        registration: &Registration,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(registration_item(registration)?))
            .condition_expression("attribute_not_exists(registration_id)")
            .send()
            .await?;
        Ok(())
    }
}

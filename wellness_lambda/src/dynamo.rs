//! DynamoDB-backed record store.
//!
//! One `DynamoStore` per table. Point lookups are issued as a partition
//! query limited to one item so tables with a sort key work the same as
//! tables without one.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use wellness_core::{Error, Record, RecordSink, RecordStore, Result};

pub struct DynamoStore {
    client: Client,
    table: String,
    partition_key: String,
}

impl DynamoStore {
    pub fn new(client: Client, table: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            partition_key: partition_key.into(),
        }
    }

    async fn query_partition(&self, key: &str, limit: Option<i32>) -> Result<Vec<Record>> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", &self.partition_key)
            .expression_attribute_values(":pk", AttributeValue::S(key.to_string()))
            .set_limit(limit)
            .send()
            .await
            .map_err(|e| Error::Store(format!("query on {} failed: {}", self.table, e)))?;

        Ok(output.items().iter().map(item_to_record).collect())
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn get(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.query_partition(key, Some(1)).await?.into_iter().next())
    }

    async fn query(&self, partition: &str) -> Result<Vec<Record>> {
        self.query_partition(partition, None).await
    }
}

#[async_trait]
impl RecordSink for DynamoStore {
    async fn put(&self, record: Record) -> Result<()> {
        let item: HashMap<String, AttributeValue> = record
            .attributes()
            .iter()
            .map(|(k, v)| (k.clone(), json_to_attribute(v)))
            .collect();

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::Store(format!("put_item on {} failed: {}", self.table, e)))?;

        tracing::debug!("Wrote record to {}", self.table);
        Ok(())
    }
}

fn item_to_record(item: &HashMap<String, AttributeValue>) -> Record {
    let map: Map<String, Value> = item
        .iter()
        .map(|(k, v)| (k.clone(), attribute_to_json(v)))
        .collect();
    Record::from(map)
}

/// DynamoDB numbers arrive as strings; integral values become JSON integers
fn number_to_json(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(raw.to_string()),
    }
}

pub(crate) fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(items.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|n| number_to_json(n)).collect()),
        other => {
            tracing::warn!("Unsupported attribute type {:?}, returning null", other);
            Value::Null
        }
    }
}

pub(crate) fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

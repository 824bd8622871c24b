//! Conversion between serde values and DynamoDB attribute maps.
//!
//! Values go through `serde_json::Value` on the way in and out, so any
//! `Serialize`/`DeserializeOwned` type can be stored without per-type
//! attribute code.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// A raw DynamoDB item.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Encode a value whose serde form is a map into a DynamoDB item.
pub fn to_item<T: Serialize + ?Sized>(value: &T) -> Result<AttributeMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| json_value_to_av(v).map(|av| (k, av)))
            .collect(),
        other => Err(Error::Serialization(format!(
            "expected a map at the top level, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a DynamoDB item into a value.
pub fn from_item<T: DeserializeOwned>(item: &AttributeMap) -> Result<T> {
    let mut map = Map::with_capacity(item.len());
    for (k, v) in item {
        map.insert(k.clone(), av_to_json_value(v)?);
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

pub(crate) fn json_value_to_av(value: Value) -> Result<AttributeValue> {
    match value {
        Value::String(s) => Ok(AttributeValue::S(s)),
        Value::Number(num) => Ok(AttributeValue::N(num.to_string())),
        Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Array(arr) => arr
            .into_iter()
            .map(json_value_to_av)
            .collect::<Result<Vec<_>>>()
            .map(AttributeValue::L),
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| json_value_to_av(v).map(|av| (k, av)))
            .collect::<Result<HashMap<_, _>>>()
            .map(AttributeValue::M),
    }
}

pub(crate) fn av_to_json_value(av: &AttributeValue) -> Result<Value> {
    match av {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(list) => list
            .iter()
            .map(av_to_json_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => {
            let mut json = Map::with_capacity(map.len());
            for (k, v) in map {
                json.insert(k.clone(), av_to_json_value(v)?);
            }
            Ok(Value::Object(json))
        }
        AttributeValue::Ss(set) => Ok(Value::Array(
            set.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(Error::Serialization(format!(
            "unsupported attribute value: {other:?}"
        ))),
    }
}

fn parse_number(n: &str) -> Result<Number> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| Error::Serialization(format!("invalid number attribute: {n}")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

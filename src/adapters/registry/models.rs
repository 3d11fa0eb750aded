//! Registry wire models
//!
//! The registry answers every endpoint with
//! `{"response": {"header": {...}, "body": {...}}}`. Field types are loose on
//! the wire: numbers sometimes arrive as strings, blank strings stand in for
//! missing values and `items` is an empty string when nothing matched. The
//! types here accept all of that and leave interpretation to
//! [`super::normalize`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Result code the registry uses for success
pub const SUCCESS_CODE: &str = "0000";

/// Outer envelope, parsed before the body so the header can be checked first
///
/// Some gateway failures skip the `response` wrapper and put the result code
/// at the top level.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    pub response: Option<RawResponse>,

    #[serde(rename = "resultCode", default, deserialize_with = "lenient_string")]
    pub result_code: Option<String>,

    #[serde(rename = "resultMsg", default, deserialize_with = "lenient_string")]
    pub result_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawResponse {
    pub header: ResponseHeader,

    #[serde(default)]
    pub body: Option<Value>,
}

/// Envelope header
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "resultCode", deserialize_with = "required_string")]
    pub result_code: String,

    #[serde(rename = "resultMsg", default, deserialize_with = "lenient_string")]
    pub result_msg: Option<String>,
}

impl ResponseHeader {
    pub fn is_success(&self) -> bool {
        self.result_code == SUCCESS_CODE
    }
}

/// Envelope body with paging metadata
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct ResponseBody<T> {
    #[serde(default)]
    pub items: Items<T>,

    #[serde(rename = "totalCount", default, deserialize_with = "lenient_u64")]
    pub total_count: Option<u64>,

    #[serde(rename = "pageNo", default, deserialize_with = "lenient_u64")]
    pub page_no: Option<u64>,

    #[serde(rename = "numOfRows", default, deserialize_with = "lenient_u64")]
    pub num_of_rows: Option<u64>,
}

/// The `items.item` slot
///
/// The registry returns a bare object when exactly one record matched and an
/// array otherwise. Array slots may be `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Items<T> {
    Absent,
    Single(T),
    Many(Vec<Option<T>>),
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Items::Absent
    }
}

impl<T: DeserializeOwned> Items<T> {
    /// Classifies the raw `items` value
    pub fn from_value(items: Value) -> Result<Self, serde_json::Error> {
        let item = match items {
            Value::Object(mut wrapper) => wrapper.remove("item").unwrap_or(Value::Null),
            _ => Value::Null,
        };

        match item {
            Value::Null => Ok(Items::Absent),
            Value::String(s) if s.trim().is_empty() => Ok(Items::Absent),
            Value::Array(slots) => slots
                .into_iter()
                .map(|slot| match slot {
                    Value::Null => Ok(None),
                    other => serde_json::from_value(other).map(Some),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Items::Many),
            other => serde_json::from_value(other).map(Items::Single),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Items<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Items::from_value(value.unwrap_or(Value::Null)).map_err(serde::de::Error::custom)
    }
}

/// A place record from `areaBasedList`, `searchKeyword` or `detailCommon`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPlace {
    #[serde(default, deserialize_with = "lenient_string")]
    pub contentid: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub contenttypeid: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub addr1: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub addr2: Option<String>,

    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub mapx: Option<i64>,

    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub mapy: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub firstimage: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub firstimage2: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub tel: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub modifiedtime: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub overview: Option<String>,
}

/// A `detailIntro` record; its keys depend on the category
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawIntro {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// A `detailImage` record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub originimgurl: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub smallimageurl: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub imgname: Option<String>,
}

/// Renders a scalar as trimmed text; blanks and non-scalars become `None`
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a coordinate into fixed-point form
///
/// Integers are taken as already scaled. Decimal values within the range of
/// a longitude are taken as degrees and scaled by 10^7.
pub fn parse_coordinate(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(raw) = text.parse::<i64>() {
        return Some(raw);
    }
    let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if value.abs() <= 180.0 {
        Some((value * crate::domain::place::COORDINATE_SCALE).round() as i64)
    } else {
        Some(value.round() as i64)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(&value).ok_or_else(|| serde::de::Error::custom("expected a non-empty value"))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(scalar_text)
        .and_then(|text| parse_coordinate(&text)))
}

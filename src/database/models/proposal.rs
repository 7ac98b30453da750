use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Applicant contact fields and business attributes. Everything here is
/// optional and opaque; an update replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProposalFields {
    #[serde(default, deserialize_with = "opaque_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub phone1: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub phone2: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub operation_code: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub operation_code_complement: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub production_group: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub installments: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub contract_type: Option<String>,
    #[serde(default, deserialize_with = "opaque_text")]
    pub insurance_type: Option<String>,
}

/// Body of a proposal submission. `id` and `creationDate` are ignored if sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    #[serde(flatten)]
    pub fields: ProposalFields,
    #[serde(default)]
    pub analyst_id: Option<i64>,
}

/// A stored proposal row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: ProposalFields,
    pub analyst_id: Option<i64>,
    pub creation_date: NaiveDate,
}

/// A proposal joined with the display name of its analyst.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProposalWithAnalyst {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: ProposalFields,
    pub analyst_name: Option<String>,
    pub creation_date: NaiveDate,
}

/// Accept strings, numbers or booleans for free-text business fields and keep them as text.
fn opaque_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a text value, got {}",
            other
        ))),
    }
}

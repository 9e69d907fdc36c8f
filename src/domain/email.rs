use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier, used only to request a detail record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailId(pub String);

impl EmailId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmailId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        // listing services send either "42" or 42
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Text(s) => EmailId(s),
            Raw::Number(n) => EmailId(n.to_string()),
        })
    }
}

/// One row of the inbox listing.
///
/// Server variants disagree on casing (`From` vs `from`, or `sender`); all of
/// them land in `from` here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmailSummary {
    #[serde(default, alias = "id")]
    pub email_id: Option<EmailId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, alias = "From", alias = "sender", deserialize_with = "null_as_empty")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub urgent: bool,
    #[serde(default)]
    pub sku: Option<String>,
}

/// A full record fetched by identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmailDetail {
    #[serde(default, alias = "id")]
    pub email_id: Option<EmailId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, alias = "From", alias = "sender", deserialize_with = "null_as_empty")]
    pub from: String,
    #[serde(default, alias = "To", deserialize_with = "null_as_empty")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn null_as_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

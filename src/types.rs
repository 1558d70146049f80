use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Quotation,
    Invoice,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Quotation => "quotation",
            DocumentType::Invoice => "invoice",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "invoice" => DocumentType::Invoice,
            _ => DocumentType::Quotation,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Quotation => write!(f, "Quotation"),
            DocumentType::Invoice => write!(f, "Invoice"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Paid,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 5] = [
        DocumentStatus::Draft,
        DocumentStatus::Sent,
        DocumentStatus::Accepted,
        DocumentStatus::Declined,
        DocumentStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Accepted => "accepted",
            DocumentStatus::Declined => "declined",
            DocumentStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "sent" => DocumentStatus::Sent,
            "accepted" => DocumentStatus::Accepted,
            "declined" => DocumentStatus::Declined,
            "paid" => DocumentStatus::Paid,
            _ => DocumentStatus::Draft,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Draft => write!(f, "Draft"),
            DocumentStatus::Sent => write!(f, "Sent"),
            DocumentStatus::Accepted => write!(f, "Accepted"),
            DocumentStatus::Declined => write!(f, "Declined"),
            DocumentStatus::Paid => write!(f, "Paid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Image,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Select,
        FieldType::Image,
    ];
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "Text"),
            FieldType::Number => write!(f, "Number"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Select => write!(f, "Select"),
            FieldType::Image => write!(f, "Image"),
        }
    }
}

/// A typed cell value for a custom item-table column. Stored as an ordered
/// (field id, value) pair on the item rather than an open key-value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(String),
    Select(String),
    Image(String),
}

impl FieldValue {
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Number => FieldValue::Number(0.0),
            FieldType::Date => FieldValue::Date(String::new()),
            FieldType::Select => FieldValue::Select(String::new()),
            FieldType::Image => FieldValue::Image(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Paypal,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "bank",
            AccountType::Paypal => "paypal",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "paypal" => AccountType::Paypal,
            _ => AccountType::Bank,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Bank => write!(f, "Bank"),
            AccountType::Paypal => write!(f, "PayPal"),
        }
    }
}

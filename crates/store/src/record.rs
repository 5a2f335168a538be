//! Record types for the four inventory relations.

use chrono::{DateTime, Utc};
use common::{ItemId, PaymentId, TransactionId, UpdateId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text did not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Direction of a stock-affecting transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockAction {
    /// Stock received; increases the item quantity.
    Purchase,
    /// Stock sold; decreases the item quantity.
    Sale,
}

impl StockAction {
    /// Returns the value stored in the `action_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAction::Purchase => "Purchase",
            StockAction::Sale => "Sale",
        }
    }
}

impl std::fmt::Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "purchase" => Ok(StockAction::Purchase),
            "sale" => Ok(StockAction::Sale),
            _ => Err(ParseEnumError::new("stock action", s)),
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit" => Ok(PaymentMethod::Credit),
            _ => Err(ParseEnumError::new("payment method", s)),
        }
    }
}

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            _ => Err(ParseEnumError::new("payment status", s)),
        }
    }
}

/// The fixed set of item fields an audit row can name.
///
/// Parsing is exact and case-sensitive: the names are column names, and
/// anything outside this set must never reach a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Name,
    ContactInfo,
    Description,
    Quantity,
}

impl ItemField {
    pub const ALL: [ItemField; 4] = [
        ItemField::Name,
        ItemField::ContactInfo,
        ItemField::Description,
        ItemField::Quantity,
    ];

    /// Returns the field name as stored in `updates.updated_field`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Name => "name",
            ItemField::ContactInfo => "contact_info",
            ItemField::Description => "description",
            ItemField::Quantity => "quantity",
        }
    }

    /// Returns the text field this maps to, or `None` for `quantity`.
    pub fn text_field(&self) -> Option<TextField> {
        match self {
            ItemField::Name => Some(TextField::Name),
            ItemField::ContactInfo => Some(TextField::ContactInfo),
            ItemField::Description => Some(TextField::Description),
            ItemField::Quantity => None,
        }
    }
}

impl std::fmt::Display for ItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("item field", s))
    }
}

/// Item fields holding free text, the only ones written through
/// [`crate::InventoryStore::update_item_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    ContactInfo,
    Description,
}

impl From<TextField> for ItemField {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Name => ItemField::Name,
            TextField::ContactInfo => ItemField::ContactInfo,
            TextField::Description => ItemField::Description,
        }
    }
}

/// A row of the Items relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub contact_info: String,
    pub description: String,
    pub quantity: i64,
}

impl Item {
    /// Returns a text field's current value.
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::ContactInfo => &self.contact_info,
            TextField::Description => &self.description,
        }
    }

    pub(crate) fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::Name => self.name = value,
            TextField::ContactInfo => self.contact_info = value,
            TextField::Description => self.description = value,
        }
    }
}

/// Values for a new Items row; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub contact_info: String,
    pub description: String,
    pub quantity: i64,
}

/// A row of the Transactions relation. Rows are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    pub action: StockAction,
    pub quantity: i64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

/// A stock movement ready to commit.
///
/// The store applies it only if the item still holds `expected_quantity`,
/// setting it to `new_quantity` and appending the transaction row in the
/// same atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub item_id: ItemId,
    pub action: StockAction,
    pub quantity: i64,
    pub expected_quantity: i64,
    pub new_quantity: i64,
    pub description: String,
}

/// A row of the Updates (audit) relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub id: UpdateId,
    pub item_id: ItemId,
    pub field: ItemField,
    pub old_value: String,
    pub new_value: String,
    pub timestamp: DateTime<Utc>,
}

/// A row of the Payments relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

/// Values for a new Payments row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

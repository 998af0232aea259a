use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use strum_macros::Display as EnumDisplay;

use crate::error::AssessmentError;

pub mod assessment;

pub use assessment::*;

pub type CustomerId = String;
pub type ProductId = String;
pub type OrderId = String;

pub type GenericError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product_id: impl Into<ProductId>, unit_price: f64, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            unit_price,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Mpesa,
    Card,
    CashOnDelivery,
    /// Every unlisted method string; they count as one distinct method.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumDisplay)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

fn sum_line_totals(lines: &[OrderLine]) -> f64 {
    lines.iter().map(OrderLine::line_total).sum()
}

/// An order about to be gated, or a stored order being re-scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCandidate {
    /// Set when the order is already persisted; it is then left out of its own history.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderCandidate {
    pub fn total_amount(&self) -> f64 {
        sum_line_totals(&self.lines)
    }

    pub fn created_at_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(now)
    }

    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.lines.is_empty() {
            return Err(AssessmentError::EmptyOrder);
        }

        for line in &self.lines {
            if line.quantity == 0 {
                return Err(AssessmentError::ZeroQuantity {
                    product_id: line.product_id.clone(),
                });
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                return Err(AssessmentError::InvalidUnitPrice {
                    product_id: line.product_id.clone(),
                    unit_price: line.unit_price,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn total_amount(&self) -> f64 {
        sum_line_totals(&self.lines)
    }

    pub fn to_candidate(&self) -> OrderCandidate {
        OrderCandidate {
            order_id: Some(self.id.clone()),
            customer_id: self.customer_id.clone(),
            lines: self.lines.clone(),
            shipping_address: self.shipping_address.clone(),
            payment_method: self.payment_method,
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: CustomerId,
    pub account_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFacts {
    pub product_id: ProductId,
    pub price: f64,
}

/// Account age and short-window activity of a customer, read fresh for every
/// assessment. The general recent-order sample is served separately by
/// `SnapshotReader::recent_orders`.
#[derive(Debug, Clone, Default)]
pub struct CustomerHistory {
    /// `None` when the customer record could not be resolved.
    pub account_created_at: Option<DateTime<Utc>>,
    pub orders_last_24h: Vec<OrderRecord>,
    pub cancelled_last_7d: Vec<OrderRecord>,
}

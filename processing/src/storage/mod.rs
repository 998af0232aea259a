// Store interfaces the engine reads from, plus the in-memory implementation
pub mod in_memory;

pub use in_memory::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{GenericError, OrderId, OrderRecord, OrderStatus, ProductFacts, UserRecord};

/// Filter for a customer's order history. Results are always newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub limit: Option<usize>,
    pub since: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub exclude_order: Option<OrderId>,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn excluding(mut self, order_id: Option<OrderId>) -> Self {
        self.exclude_order = order_id;
        self
    }

    pub fn matches(&self, order: &OrderRecord) -> bool {
        self.since.is_none_or(|since| order.created_at >= since)
            && self.status.is_none_or(|status| order.status == status)
            && self
                .exclude_order
                .as_ref()
                .is_none_or(|excluded| &order.id != excluded)
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_customer(
        &self,
        customer_id: &str,
        query: &OrderQuery,
    ) -> Result<Vec<OrderRecord>, GenericError>;

    async fn find_recent_global(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<OrderRecord>, GenericError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, customer_id: &str) -> Result<Option<UserRecord>, GenericError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Unknown ids are skipped, not reported.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ProductFacts>, GenericError>;
}

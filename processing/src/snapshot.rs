use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
    model::{
        CustomerHistory, GenericError, OrderCandidate, OrderRecord, OrderStatus, ProductFacts,
        ProductId, UserRecord,
    },
    storage::{OrderQuery, OrderStore, ProductStore, UserStore},
};

pub const RECENT_ORDER_SAMPLE: usize = 10;
pub const PRIOR_ORDER_SAMPLE: usize = 5;
pub const SHORT_WINDOW_HOURS: i64 = 24;
pub const CANCELLATION_WINDOW_DAYS: i64 = 7;

/// Read-only view over the stores, scoped to one order and one point in time.
///
/// Every lookup leaves the order under assessment out of its own history.
pub struct SnapshotReader<'a> {
    orders: &'a dyn OrderStore,
    users: &'a dyn UserStore,
    products: &'a dyn ProductStore,
    order: &'a OrderCandidate,
    now: DateTime<Utc>,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(
        orders: &'a dyn OrderStore,
        users: &'a dyn UserStore,
        products: &'a dyn ProductStore,
        order: &'a OrderCandidate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            orders,
            users,
            products,
            order,
            now,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn history_query(&self) -> OrderQuery {
        OrderQuery::new().excluding(self.order.order_id.clone())
    }

    async fn customer_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>, GenericError> {
        self.orders
            .find_by_customer(&self.order.customer_id, &query)
            .await
    }

    /// Up to `RECENT_ORDER_SAMPLE` most recent prior orders.
    pub async fn recent_orders(&self) -> Result<Vec<OrderRecord>, GenericError> {
        self.customer_orders(self.history_query().limit(RECENT_ORDER_SAMPLE))
            .await
    }

    /// Up to `PRIOR_ORDER_SAMPLE` most recent prior orders.
    pub async fn prior_orders(&self) -> Result<Vec<OrderRecord>, GenericError> {
        self.customer_orders(self.history_query().limit(PRIOR_ORDER_SAMPLE))
            .await
    }

    /// Every prior order, unbounded.
    pub async fn all_orders(&self) -> Result<Vec<OrderRecord>, GenericError> {
        self.customer_orders(self.history_query()).await
    }

    pub async fn account(&self) -> Result<Option<UserRecord>, GenericError> {
        self.users.find_by_id(&self.order.customer_id).await
    }

    pub async fn customer_history(&self) -> Result<CustomerHistory, GenericError> {
        let account = self.account().await?;
        let Some(account) = account else {
            debug!(customer_id = %self.order.customer_id, "Customer record not found");
            return Ok(CustomerHistory::default());
        };

        let orders_last_24h = self
            .customer_orders(
                self.history_query()
                    .since(self.now - Duration::hours(SHORT_WINDOW_HOURS))
                    .limit(RECENT_ORDER_SAMPLE),
            )
            .await?;
        let cancelled_last_7d = self
            .customer_orders(
                self.history_query()
                    .since(self.now - Duration::days(CANCELLATION_WINDOW_DAYS))
                    .status(OrderStatus::Cancelled)
                    .limit(RECENT_ORDER_SAMPLE),
            )
            .await?;

        Ok(CustomerHistory {
            account_created_at: Some(account.account_created_at),
            orders_last_24h,
            cancelled_last_7d,
        })
    }

    /// Catalog facts for every distinct product on the order.
    pub async fn product_facts(&self) -> Result<Vec<ProductFacts>, GenericError> {
        let mut ids: Vec<ProductId> = self
            .order
            .lines
            .iter()
            .map(|line| line.product_id.clone())
            .collect();
        ids.sort();
        ids.dedup();

        self.products.find_by_ids(&ids).await
    }
}

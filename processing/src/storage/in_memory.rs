use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{
    model::{CustomerId, GenericError, OrderRecord, ProductFacts, ProductId, UserRecord},
    storage::{OrderQuery, OrderStore, ProductStore, UserStore},
};

/// Map-backed implementation of every store the engine reads from.
#[derive(Default)]
pub struct InMemoryStorage {
    orders: RwLock<Vec<OrderRecord>>,
    users: RwLock<HashMap<CustomerId, UserRecord>>,
    products: RwLock<HashMap<ProductId, ProductFacts>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(
        users: Vec<UserRecord>,
        products: Vec<ProductFacts>,
        orders: Vec<OrderRecord>,
    ) -> Self {
        Self {
            orders: RwLock::new(orders),
            users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
            products: RwLock::new(
                products
                    .into_iter()
                    .map(|p| (p.product_id.clone(), p))
                    .collect(),
            ),
        }
    }

    pub async fn insert_order(&self, order: OrderRecord) {
        self.orders.write().await.push(order);
    }

    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    pub async fn insert_product(&self, product: ProductFacts) {
        self.products
            .write()
            .await
            .insert(product.product_id.clone(), product);
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

fn newest_first(mut orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[async_trait]
impl OrderStore for InMemoryStorage {
    async fn find_by_customer(
        &self,
        customer_id: &str,
        query: &OrderQuery,
    ) -> Result<Vec<OrderRecord>, GenericError> {
        let orders = self.orders.read().await;
        let matching = orders
            .iter()
            .filter(|o| o.customer_id == customer_id && query.matches(o))
            .cloned()
            .collect();

        let mut matching = newest_first(matching);
        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn find_recent_global(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<OrderRecord>, GenericError> {
        let orders = self.orders.read().await;
        Ok(newest_first(
            orders
                .iter()
                .filter(|o| o.created_at >= since)
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl UserStore for InMemoryStorage {
    async fn find_by_id(&self, customer_id: &str) -> Result<Option<UserRecord>, GenericError> {
        Ok(self.users.read().await.get(customer_id).cloned())
    }
}

#[async_trait]
impl ProductStore for InMemoryStorage {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<ProductFacts>, GenericError> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }
}

use async_trait::async_trait;
use std::collections::HashSet;

use crate::{
    model::{
        FactorScore, GenericError, OrderCandidate, OrderRecord, RiskFactor, RiskFlag,
        ShippingAddress,
    },
    scorers::Scorer,
    snapshot::SnapshotReader,
};

pub const DISTINCT_STREET_LIMIT: usize = 2;
pub const MULTIPLE_ADDRESSES_POINTS: i32 = 15;
pub const ESTABLISHED_CUSTOMER_ORDERS: usize = 2;
pub const INTERNATIONAL_NEW_USER_POINTS: i32 = 20;

/// Shipping address churn and first orders shipped abroad.
pub struct AddressScorer {
    home_country: String,
}

impl AddressScorer {
    pub fn new(home_country: impl Into<String>) -> Self {
        Self {
            home_country: home_country.into(),
        }
    }
}

pub fn score_address(
    address: Option<&ShippingAddress>,
    prior_orders: &[OrderRecord],
    home_country: &str,
) -> FactorScore {
    let mut result = FactorScore::neutral(RiskFactor::Address);
    let Some(address) = address else {
        return result;
    };

    let distinct_streets: HashSet<&str> = prior_orders
        .iter()
        .filter_map(|o| o.shipping_address.as_ref())
        .map(|a| a.street.trim())
        .filter(|street| !street.is_empty())
        .collect();
    if distinct_streets.len() > DISTINCT_STREET_LIMIT {
        result.flag(MULTIPLE_ADDRESSES_POINTS, RiskFlag::MultipleShippingAddresses);
    }

    let international = !address.country.trim().eq_ignore_ascii_case(home_country);
    if international && prior_orders.len() < ESTABLISHED_CUSTOMER_ORDERS {
        result.flag(
            INTERNATIONAL_NEW_USER_POINTS,
            RiskFlag::InternationalShippingNewUser,
        );
    }

    result
}

#[async_trait]
impl Scorer for AddressScorer {
    fn factor(&self) -> RiskFactor {
        RiskFactor::Address
    }

    async fn score(
        &self,
        order: &OrderCandidate,
        snapshot: &SnapshotReader<'_>,
    ) -> Result<FactorScore, GenericError> {
        if order.shipping_address.is_none() {
            return Ok(FactorScore::neutral(RiskFactor::Address));
        }

        let prior_orders = snapshot.prior_orders().await?;
        Ok(score_address(
            order.shipping_address.as_ref(),
            &prior_orders,
            &self.home_country,
        ))
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use processing::{
    model::{OrderCandidate, OrderRecord, ProductFacts, UserRecord},
    storage::InMemoryStorage,
};

/// Snapshot of shop data: customers, catalog facts and stored orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub products: Vec<ProductFacts>,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
}

impl Dataset {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Dataset is not valid JSON")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

        info!(
            path = %path.display(),
            users = dataset.users.len(),
            products = dataset.products.len(),
            orders = dataset.orders.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Loads the dataset when a path is given, otherwise starts empty.
    pub fn load_optional(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn into_storage(self) -> InMemoryStorage {
        InMemoryStorage::with_data(self.users, self.products, self.orders)
    }
}

/// Reads the order to assess. Either a bare candidate or a stored record is accepted.
pub fn load_order(path: impl AsRef<Path>) -> Result<OrderCandidate> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read order {}", path.display()))?;
    parse_order(&contents).with_context(|| format!("Failed to parse order {}", path.display()))
}

pub fn parse_order(contents: &str) -> Result<OrderCandidate> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OrderFile {
        Record(OrderRecord),
        Candidate(OrderCandidate),
    }

    let order = match serde_json::from_str(contents)? {
        OrderFile::Record(record) => record.to_candidate(),
        OrderFile::Candidate(candidate) => candidate,
    };
    Ok(order)
}

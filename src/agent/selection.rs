// src/agent/selection.rs
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One deal picked and rewritten by the model.
///
/// Only ever produced by deserializing a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CandidateDeal {
    /// A 4-5 sentence summary of the product itself, not the terms of the deal.
    product_description: String,
    /// The actual price of the product, as a number. Never a discount amount.
    price: f64,
    /// The deal URL exactly as provided.
    url: String,
}

impl CandidateDeal {
    pub fn product_description(&self) -> &str {
        &self.product_description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The model's structured answer: ideally five deals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DealSelection {
    pub deals: Vec<CandidateDeal>,
}

impl DealSelection {
    /// Keep only deals with a strictly positive price, order preserved.
    pub fn retain_priced(mut self) -> Self {
        self.deals.retain(|d| d.price > 0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }
}

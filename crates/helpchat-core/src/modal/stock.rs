use serde_json::{Map, Value};

use super::ModalError;
use crate::payload::SlashPayload;

pub const UPDATE_STOCK_INTENT: &str = "update_stock";

/// Two-field modal: product id and new stock quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockUpdateModal {
    pub product_id: String,
    pub quantity: String,
}

impl StockUpdateModal {
    pub fn new(product_id: Option<String>, quantity: Option<String>) -> Self {
        Self {
            product_id: product_id.unwrap_or_default(),
            quantity: quantity.unwrap_or_default(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.product_id.trim().is_empty() && !self.quantity.trim().is_empty()
    }

    pub fn submit(&self) -> Result<String, ModalError> {
        let product_id = self.product_id.trim();
        if product_id.is_empty() {
            return Err(ModalError::MissingField("a product ID"));
        }
        let quantity = self.quantity.trim();
        if quantity.is_empty() {
            return Err(ModalError::MissingField("a quantity"));
        }
        if !quantity.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModalError::InvalidQuantity);
        }

        let mut params = Map::new();
        params.insert("product_id".into(), Value::String(product_id.to_string()));
        params.insert("stock_quantity".into(), Value::String(quantity.to_string()));
        Ok(SlashPayload::build(UPDATE_STOCK_INTENT, params))
    }
}

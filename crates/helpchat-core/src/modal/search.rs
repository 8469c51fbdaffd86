//! Generic single-query search modal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use super::ModalError;
use crate::payload::SlashPayload;

/// What a search modal looks up. Each kind owns its intent, its parameter
/// name and the placeholder text shown in the input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    Product,
    Order,
    Customer,
    Invoice,
    StockCheck,
    AdminCustomer,
    CustomerOrders,
    AdminProduct,
}

impl SearchKind {
    pub fn intent(self) -> &'static str {
        match self {
            SearchKind::Product => "search_products",
            SearchKind::Order => "track_order",
            SearchKind::Customer => "admin_get_customer",
            SearchKind::Invoice => "get_invoice",
            SearchKind::StockCheck => "check_stock",
            SearchKind::AdminCustomer => "admin_find_customer",
            SearchKind::CustomerOrders => "admin_customer_last_orders",
            SearchKind::AdminProduct => "admin_find_product",
        }
    }

    /// Inline JSON key the backend reads the query from.
    pub fn param(self) -> &'static str {
        match self {
            SearchKind::Product => "search_query",
            SearchKind::Order | SearchKind::Invoice => "order_id",
            SearchKind::Customer => "customer_id",
            SearchKind::StockCheck => "product_id",
            SearchKind::AdminCustomer | SearchKind::CustomerOrders => "customer_query",
            SearchKind::AdminProduct => "product_identifier",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SearchKind::Product => "Search Products",
            SearchKind::Order => "Track Order",
            SearchKind::Customer => "Customer Lookup",
            SearchKind::Invoice => "Get Invoice",
            SearchKind::StockCheck => "Check Stock",
            SearchKind::AdminCustomer => "Find Customer",
            SearchKind::CustomerOrders => "Customer Orders",
            SearchKind::AdminProduct => "Find Product",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SearchKind::Product => "Enter a product name or keyword",
            SearchKind::Order => "Enter your order number",
            SearchKind::Customer => "Enter a customer ID",
            SearchKind::Invoice => "Enter the order number",
            SearchKind::StockCheck => "Enter a product ID or SKU",
            SearchKind::AdminCustomer => "Name, email or customer ID",
            SearchKind::CustomerOrders => "Customer name, email or ID",
            SearchKind::AdminProduct => "Product name, SKU or ID",
        }
    }

    /// Looks up the kind whose popup a bare intent opens.
    ///
    /// `Customer` and `Invoice` are reachable only as explicit quick actions.
    pub fn for_intent(intent: &str) -> Option<Self> {
        match intent {
            "search_products" => Some(SearchKind::Product),
            "track_order" => Some(SearchKind::Order),
            "check_stock" => Some(SearchKind::StockCheck),
            "admin_find_customer" => Some(SearchKind::AdminCustomer),
            "admin_customer_last_orders" => Some(SearchKind::CustomerOrders),
            "admin_find_product" => Some(SearchKind::AdminProduct),
            _ => None,
        }
    }

    pub fn build(self, query: &str) -> String {
        let mut params = Map::new();
        params.insert(self.param().to_string(), Value::String(query.to_string()));
        SlashPayload::build(self.intent(), params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchModal {
    pub kind: SearchKind,
    pub query: String,
}

impl SearchModal {
    pub fn new(kind: SearchKind, prefill: Option<String>) -> Self {
        Self {
            kind,
            query: prefill.unwrap_or_default(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn submit(&self) -> Result<String, ModalError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ModalError::MissingField("a search term"));
        }
        Ok(self.kind.build(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_names_are_kebab_case() {
        assert_eq!(SearchKind::StockCheck.to_string(), "stock-check");
        assert_eq!(
            SearchKind::from_str("customer-orders").unwrap(),
            SearchKind::CustomerOrders
        );
    }

    #[test]
    fn test_every_kind_builds_a_parseable_payload() {
        for kind in SearchKind::iter() {
            let payload = SlashPayload::parse(&kind.build("abc")).unwrap();
            assert_eq!(payload.intent, kind.intent());
            assert_eq!(payload.param_str(kind.param()).as_deref(), Some("abc"));
        }
    }

    #[test]
    fn test_empty_query_disables_submit() {
        let modal = SearchModal::new(SearchKind::Product, Some("   ".into()));
        assert!(!modal.can_submit());
        assert!(modal.submit().is_err());
    }

    #[test]
    fn test_query_is_trimmed() {
        let modal = SearchModal::new(SearchKind::Order, Some(" 123 ".into()));
        assert_eq!(modal.submit().unwrap(), r#"/track_order{"order_id":"123"}"#);
    }
}

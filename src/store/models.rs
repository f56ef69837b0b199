use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Record, StoreError};

fn contains_any(needle: &str, fields: &[&str]) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub brand: String,
    pub unit: String,
    pub price: f64,
    pub stock: u32,
    pub alert_quantity: u32,
    pub store: String,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.alert_quantity
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_any(needle, &[&self.name, &self.sku, &self.brand])
    }

    fn filter_key(&self) -> Option<&str> {
        Some(&self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Ordered,
    Pending,
    Received,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Ordered => "Ordered",
            PurchaseStatus::Pending => "Pending",
            PurchaseStatus::Received => "Received",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub reference: String,
    pub supplier: String,
    pub store: String,
    pub date: NaiveDate,
    pub status: PurchaseStatus,
    pub total: f64,
    pub paid: f64,
}

impl Purchase {
    pub fn due(&self) -> f64 {
        (self.total - self.paid).max(0.0)
    }
}

impl Record for Purchase {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_any(needle, &[&self.reference, &self.supplier])
    }

    fn filter_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub reference: String,
    pub category: String,
    pub store: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub note: String,
}

impl Record for Expense {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_any(needle, &[&self.reference, &self.note, &self.category])
    }

    fn filter_key(&self) -> Option<&str> {
        Some(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleReport {
    pub id: String,
    pub invoice: String,
    pub date: NaiveDate,
    pub customer: String,
    pub store: String,
    pub items: u32,
    pub total: f64,
    pub paid: f64,
}

impl SaleReport {
    pub fn payment_status(&self) -> &'static str {
        if self.paid <= 0.0 {
            "Unpaid"
        } else if self.paid + f64::EPSILON < self.total {
            "Partial"
        } else {
            "Paid"
        }
    }
}

impl Record for SaleReport {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_any(needle, &[&self.invoice, &self.customer])
    }

    fn filter_key(&self) -> Option<&str> {
        Some(&self.store)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub users: u32,
    /// Built-in roles cannot be removed
    pub system: bool,
}

impl Record for Role {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_any(needle, &[&self.name, &self.description])
    }

    fn filter_key(&self) -> Option<&str> {
        Some(if self.system { "System" } else { "Custom" })
    }

    fn check_deletable(&self) -> Result<(), StoreError> {
        if self.system {
            return Err(StoreError::Protected(self.name.clone()));
        }
        Ok(())
    }
}

/// Reference data shared by the list screens' filter bars
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub stores: Vec<String>,
}

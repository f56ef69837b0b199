//! Static seed data for the in-memory resources

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::models::{Expense, Lookups, Product, Purchase, PurchaseStatus, Role, SaleReport};
use super::{MemoryResource, Resources};

const STORES: [&str; 3] = ["Main Street", "Harbor Mall", "Airport Kiosk"];

const SUPPLIERS: [&str; 4] = [
    "Northwind Traders",
    "Acme Wholesale",
    "Blue Ridge Foods",
    "Pioneer Electronics",
];

// name, sku, category, brand, unit, price, stock, alert
const PRODUCTS: [(&str, &str, &str, &str, &str, f64, u32, u32); 24] = [
    ("Espresso Beans 1kg", "BEV-1001", "Beverages", "Roastery", "bag", 18.50, 42, 10),
    ("Green Tea 50ct", "BEV-1002", "Beverages", "Leafline", "box", 6.25, 8, 12),
    ("Sparkling Water 6pk", "BEV-1003", "Beverages", "Clearspring", "pack", 4.99, 120, 24),
    ("Oat Milk 1L", "BEV-1004", "Beverages", "Oatly", "carton", 3.49, 15, 20),
    ("Dark Chocolate Bar", "SNK-2001", "Snacks", "Cocoa & Co", "pc", 2.75, 64, 15),
    ("Sea Salt Crisps", "SNK-2002", "Snacks", "Crunchy", "bag", 1.99, 5, 15),
    ("Trail Mix 500g", "SNK-2003", "Snacks", "Hikers", "bag", 7.40, 33, 10),
    ("Granola Bars 12ct", "SNK-2004", "Snacks", "Hikers", "box", 5.60, 18, 10),
    ("USB-C Cable 1m", "ELC-3001", "Electronics", "Voltix", "pc", 9.99, 57, 10),
    ("Wireless Mouse", "ELC-3002", "Electronics", "Voltix", "pc", 24.00, 9, 5),
    ("AA Batteries 8pk", "ELC-3003", "Electronics", "PowerCell", "pack", 8.49, 3, 12),
    ("Phone Charger 20W", "ELC-3004", "Electronics", "Voltix", "pc", 19.90, 22, 8),
    ("Bluetooth Speaker", "ELC-3005", "Electronics", "Sonicbay", "pc", 49.00, 6, 4),
    ("Dish Soap 750ml", "HOM-4001", "Household", "Sparkle", "bottle", 3.10, 48, 12),
    ("Paper Towels 6 roll", "HOM-4002", "Household", "Softly", "pack", 7.99, 11, 10),
    ("Trash Bags 30ct", "HOM-4003", "Household", "Sturdy", "box", 6.50, 27, 10),
    ("LED Bulb 9W", "HOM-4004", "Household", "Brightway", "pc", 4.25, 0, 10),
    ("Notebook A5", "STA-5001", "Stationery", "Paperly", "pc", 3.80, 75, 20),
    ("Gel Pens 10ct", "STA-5002", "Stationery", "Inkwell", "pack", 5.20, 14, 10),
    ("Sticky Notes", "STA-5003", "Stationery", "Paperly", "pack", 2.40, 90, 20),
    ("Hand Cream 75ml", "PER-6001", "Personal Care", "Velvet", "tube", 6.90, 21, 8),
    ("Toothpaste 100ml", "PER-6002", "Personal Care", "Brightsmile", "tube", 2.95, 36, 12),
    ("Shampoo 400ml", "PER-6003", "Personal Care", "Velvet", "bottle", 8.75, 7, 8),
    ("Lip Balm", "PER-6004", "Personal Care", "Velvet", "pc", 1.80, 110, 25),
];

const EXPENSE_CATEGORIES: [&str; 5] = ["Rent", "Utilities", "Payroll", "Marketing", "Maintenance"];

const CUSTOMERS: [&str; 6] = [
    "Walk-in Customer",
    "Ana Souza",
    "Kenji Mori",
    "Priya Nair",
    "Tomasz Nowak",
    "Grace Okafor",
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, &(name, sku, category, brand, unit, price, stock, alert))| Product {
            id: format!("prd-{:03}", i + 1),
            name: name.to_string(),
            sku: sku.to_string(),
            category: category.to_string(),
            brand: brand.to_string(),
            unit: unit.to_string(),
            price,
            stock,
            alert_quantity: alert,
            store: STORES[i % STORES.len()].to_string(),
        })
        .collect()
}

pub fn purchases() -> Vec<Purchase> {
    (0..18u32)
        .map(|i| {
            let status = match i % 4 {
                0 => PurchaseStatus::Ordered,
                1 => PurchaseStatus::Pending,
                _ => PurchaseStatus::Received,
            };
            let total = 250.0 + f64::from(i * 137 % 900);
            let paid = match status {
                PurchaseStatus::Received => total,
                PurchaseStatus::Pending => (total / 2.0).round(),
                PurchaseStatus::Ordered => 0.0,
            };
            Purchase {
                id: format!("pur-{:03}", i + 1),
                reference: format!("PO-2024-{:04}", 1001 + i),
                supplier: SUPPLIERS[(i as usize) % SUPPLIERS.len()].to_string(),
                store: STORES[(i as usize) % STORES.len()].to_string(),
                date: date(2024, 1 + i % 12, 1 + (i * 5) % 28),
                status,
                total,
                paid,
            }
        })
        .collect()
}

pub fn expenses() -> Vec<Expense> {
    (0..16u32)
        .map(|i| {
            let category = EXPENSE_CATEGORIES[(i as usize) % EXPENSE_CATEGORIES.len()];
            let amount = match category {
                "Rent" => 2400.0,
                "Payroll" => 5200.0 + f64::from(i * 40),
                "Utilities" => 310.0 + f64::from(i * 7),
                _ => 120.0 + f64::from(i * 23),
            };
            Expense {
                id: format!("exp-{:03}", i + 1),
                reference: format!("EX-{:04}", 501 + i),
                category: category.to_string(),
                store: STORES[(i as usize) % STORES.len()].to_string(),
                date: date(2024, 1 + i % 12, 3 + (i * 3) % 25),
                amount,
                note: format!("{} for {}", category, STORES[(i as usize) % STORES.len()]),
            }
        })
        .collect()
}

pub fn sales() -> Vec<SaleReport> {
    (0..48u32)
        .map(|i| {
            let total = 35.0 + f64::from(i * 53 % 420) + 0.5 * f64::from(i % 2);
            let paid = match i % 7 {
                0 => 0.0,
                3 => (total * 0.4).round(),
                _ => total,
            };
            SaleReport {
                id: format!("sal-{:03}", i + 1),
                invoice: format!("INV-{:05}", 20001 + i),
                date: date(2024, 1 + (i / 4) % 12, 1 + (i * 7) % 28),
                customer: CUSTOMERS[(i as usize) % CUSTOMERS.len()].to_string(),
                store: STORES[(i as usize) % STORES.len()].to_string(),
                items: 1 + i % 9,
                total,
                paid,
            }
        })
        .collect()
}

pub fn roles() -> Vec<Role> {
    let role = |id: &str, name: &str, description: &str, permissions: &[&str], users, system| Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        users,
        system,
    };

    vec![
        role("rol-001", "Admin", "Full access to every module", &["*"], 2, true),
        role(
            "rol-002",
            "Manager",
            "Store operations and reporting",
            &["products", "purchases", "expenses", "reports"],
            4,
            true,
        ),
        role("rol-003", "Cashier", "Point of sale only", &["sales"], 11, false),
        role(
            "rol-004",
            "Stock Clerk",
            "Receives purchases and prints labels",
            &["products", "purchases", "barcodes"],
            3,
            false,
        ),
        role("rol-005", "Accountant", "Expenses and reports", &["expenses", "reports"], 1, false),
    ]
}

pub fn lookups() -> Lookups {
    let mut categories: Vec<String> = PRODUCTS.iter().map(|p| p.2.to_string()).collect();
    categories.dedup();

    Lookups {
        categories,
        expense_categories: EXPENSE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        stores: STORES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Every resource seeded from the static data above
pub fn seed(latency: Duration) -> Resources {
    Resources {
        products: Arc::new(MemoryResource::new("products", products()).with_latency(latency)),
        purchases: Arc::new(MemoryResource::new("purchases", purchases()).with_latency(latency)),
        expenses: Arc::new(MemoryResource::new("expenses", expenses()).with_latency(latency)),
        sales: Arc::new(MemoryResource::new("sales", sales()).with_latency(latency)),
        roles: Arc::new(MemoryResource::new("roles", roles()).with_latency(latency)),
        lookups: Arc::new(lookups()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PRODUCTS.len());

        let skus: HashSet<&str> = PRODUCTS.iter().map(|p| p.1).collect();
        assert_eq!(skus.len(), PRODUCTS.len());
    }

    #[test]
    fn test_lookups_cover_product_categories() {
        let lookups = lookups();
        assert_eq!(lookups.categories.len(), 6);
        for product in products() {
            assert!(lookups.categories.contains(&product.category));
        }
    }

    #[test]
    fn test_purchase_payments_follow_status() {
        for purchase in purchases() {
            match purchase.status {
                PurchaseStatus::Received => assert_eq!(purchase.due(), 0.0),
                PurchaseStatus::Ordered => assert_eq!(purchase.paid, 0.0),
                PurchaseStatus::Pending => assert!(purchase.due() > 0.0),
            }
        }
    }
}

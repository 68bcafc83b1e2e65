//! Static landing page content and the application shell.
//!
//! Nothing here is backed by the store.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsTile {
    pub title: &'static str,
    pub value: &'static str,
    pub description: &'static str,
    pub trend: Trend,
    pub trend_value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub name: &'static str,
    pub description: &'static str,
    pub status: StockStatus,
    pub price: Decimal,
    pub image: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub id: u32,
    pub action: &'static str,
    pub time: &'static str,
    pub user: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub stats: Vec<StatsTile>,
    pub top_products: Vec<ProductCard>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: &'static str,
    pub href: &'static str,
}

/// Sidebar and header shared by every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shell {
    pub app_name: &'static str,
    pub menu: Vec<MenuItem>,
    pub search_placeholder: &'static str,
    pub user_initials: &'static str,
}

pub fn dashboard() -> Dashboard {
    Dashboard {
        title: "Dashboard Overview",
        stats: vec![
            StatsTile {
                title: "Total Products",
                value: "2,420",
                description: "Active products in catalog",
                trend: Trend::Up,
                trend_value: "12% from last month",
            },
            StatsTile {
                title: "Revenue",
                value: "$45,231",
                description: "Monthly revenue",
                trend: Trend::Up,
                trend_value: "8.2% from last month",
            },
            StatsTile {
                title: "Active Users",
                value: "1,893",
                description: "Users active today",
                trend: Trend::Down,
                trend_value: "4% from yesterday",
            },
            StatsTile {
                title: "Growth",
                value: "32.5%",
                description: "Annual growth rate",
                trend: Trend::Up,
                trend_value: "2.4% from last year",
            },
        ],
        top_products: vec![
            ProductCard {
                name: "Wireless Headphones",
                description: "Premium noise-canceling headphones with 30-hour battery life",
                status: StockStatus::InStock,
                price: Decimal::new(29999, 2),
                image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500&q=80",
            },
            ProductCard {
                name: "Smart Watch",
                description: "Fitness tracking and notifications with 5-day battery life",
                status: StockStatus::LowStock,
                price: Decimal::new(19999, 2),
                image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500&q=80",
            },
            ProductCard {
                name: "Laptop Pro",
                description: "15-inch powerhouse with latest gen processor",
                status: StockStatus::OutOfStock,
                price: Decimal::new(129999, 2),
                image: "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=500&q=80",
            },
        ],
        recent_activity: vec![
            ActivityEntry {
                id: 1,
                action: "Added new product: Wireless Earbuds",
                time: "2 hours ago",
                user: "John Doe",
            },
            ActivityEntry {
                id: 2,
                action: "Updated inventory count",
                time: "4 hours ago",
                user: "Sarah Smith",
            },
            ActivityEntry {
                id: 3,
                action: "Modified product description",
                time: "Yesterday",
                user: "Mike Johnson",
            },
        ],
    }
}

pub fn shell() -> Shell {
    Shell {
        app_name: "ProductHub",
        menu: vec![
            MenuItem {
                title: "Dashboard",
                href: "/",
            },
            MenuItem {
                title: "Products",
                href: "/products",
            },
            MenuItem {
                title: "Analytics",
                href: "/analytics",
            },
            MenuItem {
                title: "Team",
                href: "/team",
            },
            MenuItem {
                title: "Settings",
                href: "/settings",
            },
        ],
        search_placeholder: "Search products...",
        user_initials: "JD",
    }
}

//! Built-in default configuration for the Easy Life Gangtok site.
//!
//! Used when no snapshot file is supplied, and as the reset target of a store
//! built from it.

use serde_json::json;

use crate::tree::{ConfigTree, PageConfig, SectionConfig};

#[cfg(test)]
#[path = "site_defaults_tests.rs"]
mod tests;

/// Page names present in the built-in snapshot.
pub const DEFAULT_PAGES: [&str; 6] = ["homepage", "about", "contact", "privacy", "terms", "support"];

fn section(value: serde_json::Value) -> SectionConfig {
    match value {
        serde_json::Value::Object(map) => SectionConfig::from(map),
        _ => SectionConfig::new(),
    }
}

fn homepage() -> PageConfig {
    PageConfig::new()
        .with_section(
            "hero",
            section(json!({
                "title": "Discover the Best of Gangtok",
                "subtitle": "Find trusted local businesses, services and deals near you",
                "searchPlaceholder": "Search restaurants, rentals, electronics...",
                "backgroundImage": "/images/hero/gangtok-mg-marg.jpg",
                "ctaText": "Explore Businesses",
                "ctaLink": "/businesses",
                "showSearch": true
            })),
        )
        .with_section(
            "categoriesGrid",
            section(json!({
                "title": "Browse by Category",
                "selectedCategories": ["food", "vehicles", "hotels", "electronics", "healthcare", "education"],
                "maxVisible": 8,
                "showViewAll": true
            })),
        )
        .with_section(
            "hotDeals",
            section(json!({
                "title": "Hot Deals This Week",
                "enabled": true,
                "maxDeals": 6,
                "dealIds": [],
                "autoRotate": true,
                "rotationSeconds": 5
            })),
        )
        .with_section(
            "featuredBusinesses",
            section(json!({
                "title": "Featured Businesses",
                "enabled": true,
                "businessIds": [],
                "layout": "carousel"
            })),
        )
        .with_section(
            "testimonials",
            section(json!({
                "title": "What Our Customers Say",
                "enabled": true,
                "items": [
                    {
                        "name": "Pema Bhutia",
                        "role": "Customer",
                        "quote": "Found a reliable bike rental within minutes.",
                        "rating": 5
                    },
                    {
                        "name": "Rohit Pradhan",
                        "role": "Seller",
                        "quote": "My bakery gets new customers every week through the listing.",
                        "rating": 5
                    }
                ]
            })),
        )
}

fn about() -> PageConfig {
    PageConfig::new()
        .with_section(
            "hero",
            section(json!({
                "title": "About Easy Life Gangtok",
                "subtitle": "Connecting Gangtok with its local businesses"
            })),
        )
        .with_section(
            "mission",
            section(json!({
                "title": "Our Mission",
                "content": "Make it easy for everyone in Gangtok to discover, compare and book local services."
            })),
        )
        .with_section(
            "vision",
            section(json!({
                "title": "Our Vision",
                "content": "A thriving local economy where every business in Sikkim has an online storefront."
            })),
        )
        .with_section(
            "stats",
            section(json!({
                "enabled": true,
                "items": [
                    { "label": "Listed Businesses", "value": "500+" },
                    { "label": "Categories", "value": "25" },
                    { "label": "Happy Customers", "value": "10k+" }
                ]
            })),
        )
}

fn contact() -> PageConfig {
    PageConfig::new()
        .with_section(
            "hero",
            section(json!({
                "title": "Contact Us",
                "subtitle": "We usually reply within one business day"
            })),
        )
        .with_section(
            "details",
            section(json!({
                "phone": "+91 3592 000000",
                "email": "support@easylifegangtok.com",
                "address": "MG Marg, Gangtok, Sikkim 737101",
                "hours": "Mon-Sat, 9:00 AM - 6:00 PM"
            })),
        )
        .with_section(
            "map",
            section(json!({
                "enabled": true,
                "latitude": 27.3314,
                "longitude": 88.6138,
                "zoom": 15
            })),
        )
        .with_section(
            "form",
            section(json!({
                "enabled": true,
                "subjects": ["General Inquiry", "List My Business", "Report an Issue", "Partnership"],
                "successMessage": "Thanks for reaching out! We will get back to you soon."
            })),
        )
}

fn policy_page(title: &str, sections: serde_json::Value) -> PageConfig {
    PageConfig::new()
        .with_section(
            "header",
            section(json!({
                "title": title,
                "lastUpdated": "2024-01-01"
            })),
        )
        .with_section("content", section(json!({ "sections": sections })))
}

fn privacy() -> PageConfig {
    policy_page(
        "Privacy Policy",
        json!([
            {
                "heading": "Information We Collect",
                "body": "Account details you provide, business listings you create and basic usage data."
            },
            {
                "heading": "How We Use Information",
                "body": "To operate the directory, process bookings and improve our services."
            },
            {
                "heading": "Your Choices",
                "body": "You can update or delete your account information at any time from your dashboard."
            }
        ]),
    )
}

fn terms() -> PageConfig {
    policy_page(
        "Terms of Service",
        json!([
            {
                "heading": "Using the Platform",
                "body": "You agree to provide accurate information and to use the platform lawfully."
            },
            {
                "heading": "Seller Responsibilities",
                "body": "Sellers are responsible for the accuracy of their listings, prices and availability."
            },
            {
                "heading": "Liability",
                "body": "Easy Life Gangtok is a directory and is not a party to transactions between users."
            }
        ]),
    )
}

fn support() -> PageConfig {
    PageConfig::new()
        .with_section(
            "hero",
            section(json!({
                "title": "How can we help?",
                "searchPlaceholder": "Search help articles"
            })),
        )
        .with_section(
            "faq",
            section(json!({
                "title": "Frequently Asked Questions",
                "items": [
                    {
                        "question": "How do I list my business?",
                        "answer": "Create a seller account and complete your storefront profile from the seller dashboard."
                    },
                    {
                        "question": "Is listing free?",
                        "answer": "Basic listings are free. Featured placements are available as paid upgrades."
                    },
                    {
                        "question": "How do I cancel a booking?",
                        "answer": "Open the booking from your account page and choose Cancel Booking."
                    }
                ]
            })),
        )
        .with_section(
            "contactOptions",
            section(json!({
                "email": "support@easylifegangtok.com",
                "phone": "+91 3592 000000",
                "whatsappEnabled": true
            })),
        )
}

/// The built-in site configuration snapshot.
pub fn site_defaults() -> ConfigTree {
    ConfigTree::new()
        .with_page("homepage", homepage())
        .with_page("about", about())
        .with_page("contact", contact())
        .with_page("privacy", privacy())
        .with_page("terms", terms())
        .with_page("support", support())
}

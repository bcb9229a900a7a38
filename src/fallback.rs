//! fallback.rs — hand-curated sample datasets served when both cache and
//! upstream fail. Pure data; every record already satisfies the canonical
//! schema invariants and is filterable like live data.

use once_cell::sync::Lazy;

use crate::model::{NewsArticle, NewsCategory, PriceRecord};

fn price(name: &str, price: f64, region: &str, subregion: &str, market: &str) -> PriceRecord {
    PriceRecord {
        name: name.to_string(),
        price,
        region: region.to_string(),
        subregion: subregion.to_string(),
        market: market.to_string(),
        date: String::new(),
    }
}

static PRICES: Lazy<Vec<PriceRecord>> = Lazy::new(|| {
    vec![
        // Punjab
        price("Wheat", 2150.00, "Punjab", "Amritsar", "APMC Amritsar"),
        price("Rice", 1950.00, "Punjab", "Ludhiana", "APMC Ludhiana"),
        price("Maize", 1750.00, "Punjab", "Jalandhar", "APMC Jalandhar"),
        // Haryana
        price("Rice", 1850.00, "Haryana", "Karnal", "APMC Karnal"),
        price("Wheat", 2100.00, "Haryana", "Rohtak", "APMC Rohtak"),
        price("Mustard", 5100.00, "Haryana", "Hisar", "APMC Hisar"),
        // Madhya Pradesh
        price("Maize", 1650.00, "Madhya Pradesh", "Indore", "APMC Indore"),
        price("Soybean", 4200.00, "Madhya Pradesh", "Bhopal", "APMC Bhopal"),
        price("Wheat", 2080.00, "Madhya Pradesh", "Gwalior", "APMC Gwalior"),
        // Uttar Pradesh
        price("Sugarcane", 325.00, "Uttar Pradesh", "Meerut", "APMC Meerut"),
        price("Potato", 28.00, "Uttar Pradesh", "Agra", "APMC Agra"),
        price("Rice", 1900.00, "Uttar Pradesh", "Lucknow", "APMC Lucknow"),
        price("Wheat", 2120.00, "Uttar Pradesh", "Kanpur", "APMC Kanpur"),
        // Gujarat
        price("Cotton", 6500.00, "Gujarat", "Ahmedabad", "APMC Ahmedabad"),
        price("Groundnut", 5800.00, "Gujarat", "Surat", "APMC Surat"),
        price("Wheat", 2090.00, "Gujarat", "Vadodara", "APMC Vadodara"),
        // Rajasthan
        price("Groundnut", 5800.00, "Rajasthan", "Kota", "APMC Kota"),
        price("Mustard", 5200.00, "Rajasthan", "Bharatpur", "APMC Bharatpur"),
        price("Wheat", 2070.00, "Rajasthan", "Jaipur", "APMC Jaipur"),
        // Maharashtra
        price("Soybean", 4200.00, "Maharashtra", "Nagpur", "APMC Nagpur"),
        price("Onion", 32.75, "Maharashtra", "Nashik", "APMC Nashik"),
        price("Cotton", 6450.00, "Maharashtra", "Pune", "APMC Pune"),
        price("Wheat", 2060.00, "Maharashtra", "Mumbai", "APMC Mumbai"),
        // Karnataka
        price("Tomato", 45.50, "Karnataka", "Bangalore", "APMC Bangalore"),
        price("Rice", 1880.00, "Karnataka", "Mysore", "APMC Mysore"),
        price("Maize", 1680.00, "Karnataka", "Hubli", "APMC Hubli"),
        // Telangana
        price("Turmeric", 125.00, "Telangana", "Nizamabad", "APMC Nizamabad"),
        price("Cotton", 6480.00, "Telangana", "Hyderabad", "APMC Hyderabad"),
        price("Rice", 1920.00, "Telangana", "Warangal", "APMC Warangal"),
        // Andhra Pradesh
        price("Rice", 1940.00, "Andhra Pradesh", "Vijayawada", "APMC Vijayawada"),
        price("Cotton", 6520.00, "Andhra Pradesh", "Guntur", "APMC Guntur"),
        price("Chilli", 180.00, "Andhra Pradesh", "Kurnool", "APMC Kurnool"),
    ]
});

fn article(
    id: usize,
    title: &str,
    content: &str,
    category: NewsCategory,
    date: &str,
    source: &str,
    url: &str,
) -> NewsArticle {
    NewsArticle {
        id,
        title: title.to_string(),
        excerpt: content.to_string(),
        content: content.to_string(),
        category,
        date: date.to_string(),
        source: source.to_string(),
        url: url.to_string(),
    }
}

static NEWS: Lazy<Vec<NewsArticle>> = Lazy::new(|| {
    vec![
        article(
            1,
            "Centre raises MSP for rabi crops ahead of sowing season",
            "The government approved higher minimum support prices for six rabi crops, citing rising input costs and the need to keep procurement attractive for farmers.",
            NewsCategory::Policy,
            "2025-10-22",
            "Sample Desk",
            "https://example.com/news/msp-rabi-crops",
        ),
        article(
            2,
            "Wheat prices firm up in northern mandis on steady demand",
            "Wholesale wheat prices rose for a third straight week across Punjab and Haryana mandis as flour mills stepped up purchases before the festival season.",
            NewsCategory::Market,
            "2025-10-20",
            "Sample Desk",
            "https://example.com/news/wheat-prices-firm",
        ),
        article(
            3,
            "Late monsoon withdrawal delays kharif harvest in central India",
            "Extended rainfall over Madhya Pradesh and Maharashtra has pushed back harvesting of soybean and cotton, raising concerns about crop quality.",
            NewsCategory::Weather,
            "2025-10-18",
            "Sample Desk",
            "https://example.com/news/monsoon-withdrawal-delay",
        ),
        article(
            4,
            "Agritech startups bring drone spraying to smallholder farms",
            "A new wave of agritech ventures is offering drone-based pesticide application as a pay-per-acre service, cutting input use for small farms.",
            NewsCategory::Technology,
            "2025-10-15",
            "Sample Desk",
            "https://example.com/news/drone-spraying-service",
        ),
        article(
            5,
            "Onion export window reopens as domestic supply stabilises",
            "Traders expect shipments to resume from Nashik after wholesale prices eased, with export demand from neighbouring markets holding strong.",
            NewsCategory::Market,
            "2025-10-12",
            "Sample Desk",
            "https://example.com/news/onion-export-window",
        ),
        article(
            6,
            "States told to fast-track crop insurance claim settlements",
            "The agriculture ministry directed state agencies to clear pending insurance claims within the quarter under the revamped scheme guidelines.",
            NewsCategory::Policy,
            "2025-10-10",
            "Sample Desk",
            "https://example.com/news/crop-insurance-claims",
        ),
    ]
});

/// Static price dataset, cloned per request so callers can filter freely.
pub fn fallback_prices() -> Vec<PriceRecord> {
    PRICES.clone()
}

/// Static news dataset.
pub fn fallback_news() -> Vec<NewsArticle> {
    NEWS.clone()
}

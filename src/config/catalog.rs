use once_cell::sync::Lazy;

/// Endpoint shared by every built-in catalog target.
pub const SERP_BASE_URL: &str = "https://serpapi.com/search.json";

/// Built-in engine catalog: engine id plus its default query parameters
/// (the `engine` parameter itself is added during resolution). Queries are
/// chosen so every engine returns a populated result set.
pub(super) static CATALOG: Lazy<Vec<(&'static str, Vec<(&'static str, &'static str)>)>> =
    Lazy::new(|| {
        vec![
            // Major search engines
            ("google", vec![("q", "test query")]),
            ("bing", vec![("q", "test query")]),
            ("yahoo", vec![("p", "test query")]),
            ("duckduckgo", vec![("q", "test query")]),
            ("baidu", vec![("q", "测试")]),
            ("yandex", vec![("text", "тест")]),
            ("naver", vec![("query", "테스트")]),
            // Google specialized
            ("google_maps", vec![("q", "coffee shop")]),
            ("google_scholar", vec![("q", "machine learning")]),
            ("google_news", vec![("q", "technology")]),
            ("google_shopping", vec![("q", "laptop")]),
            ("google_images", vec![("q", "nature")]),
            ("google_videos", vec![("q", "tutorial")]),
            ("google_jobs", vec![("q", "software engineer")]),
            ("google_patents", vec![("q", "artificial intelligence")]),
            ("google_finance", vec![("q", "AAPL")]),
            (
                "google_flights",
                vec![
                    ("departure_id", "SFO"),
                    ("arrival_id", "LAX"),
                    ("outbound_date", "2026-12-01"),
                ],
            ),
            // E-commerce
            ("amazon", vec![("k", "laptop")]),
            ("ebay", vec![("_nkw", "laptop")]),
            ("walmart", vec![("query", "laptop")]),
            ("home_depot", vec![("q", "paint")]),
            // Social & media
            ("youtube", vec![("search_query", "python tutorial")]),
            ("tiktok", vec![("keyword", "funny")]),
            ("reddit", vec![("q", "technology")]),
            // Apps
            ("apple_app_store", vec![("term", "instagram")]),
            ("google_play", vec![("q", "instagram")]),
            // Travel & reviews
            ("yelp", vec![("find_desc", "restaurants")]),
            ("tripadvisor", vec![("q", "hotels")]),
            // Jobs
            ("linkedin_jobs", vec![("keywords", "software engineer")]),
            ("indeed", vec![("q", "software engineer")]),
            ("glassdoor", vec![("keyword", "software engineer")]),
        ]
    });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() -> Result<(), String> {
        let mut seen = std::collections::BTreeSet::new();
        for (id, _) in CATALOG.iter() {
            if !seen.insert(*id) {
                return Err(format!("duplicate catalog id: {}", id));
            }
        }
        Ok(())
    }
}

use crate::domain::model::CityRecord;
use crate::utils::error::{KeywordError, Result};
use std::collections::HashSet;

/// 連字號換成空白並轉小寫
pub fn normalize_city(name: &str) -> String {
    name.replace('-', " ").to_lowercase().trim().to_string()
}

/// Crosses `seed` with every distinct normalized city name of `country`,
/// keeping the order in which cities first appear in the dataset.
pub fn generate_keywords(seed: &str, country: &str, cities: &[CityRecord]) -> Result<Vec<String>> {
    let seed = seed.trim().to_lowercase();
    if seed.is_empty() {
        return Err(KeywordError::ValidationError {
            message: "Seed keyword cannot be empty".to_string(),
        });
    }

    let country = country.trim();
    if country.is_empty() {
        return Err(KeywordError::ValidationError {
            message: "A country must be selected to pick cities".to_string(),
        });
    }

    let mut seen = HashSet::new();
    let keywords: Vec<String> = cities
        .iter()
        .filter(|c| c.country.eq_ignore_ascii_case(country))
        .map(|c| normalize_city(&c.city))
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .map(|name| format!("{} {}", seed, name))
        .collect();

    tracing::debug!(
        "Generated {} keywords for seed '{}' in {}",
        keywords.len(),
        seed,
        country
    );

    Ok(keywords)
}

/// 資料集中出現過的國家代碼，排序且不重複
pub fn available_countries(cities: &[CityRecord]) -> Vec<String> {
    let mut countries: Vec<String> = cities
        .iter()
        .map(|c| c.country.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

use crate::domain::model::CityRecord;
use crate::utils::error::{KeywordError, Result};
use reqwest::Client;
use std::io::Read;
use std::time::Duration;

pub const DEFAULT_CITIES_URL: &str =
    "https://raw.githubusercontent.com/antoineeripret/streamlit-local-keyword-generator/main/cities1000.txt";

// geonames 19 欄格式中實際使用的兩欄
const CITY_COLUMN: usize = 2;
const COUNTRY_COLUMN: usize = 8;

/// Parses a geonames tab-separated dump (no header row). Rows too short to
/// carry a country are skipped.
pub fn parse_cities<R: Read>(reader: R) -> Result<Vec<CityRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut cities = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result?;
        match (record.get(CITY_COLUMN), record.get(COUNTRY_COLUMN)) {
            (Some(city), Some(country)) if !country.trim().is_empty() => {
                cities.push(CityRecord::new(city, country.trim()));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} malformed city rows", skipped);
    }

    if cities.is_empty() {
        return Err(KeywordError::DatasetError {
            message: "no city rows found".to_string(),
        });
    }

    Ok(cities)
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub async fn load_cities(client: &Client, location: &str, timeout: Duration) -> Result<Vec<CityRecord>> {
    let data = if is_remote(location) {
        tracing::info!("🌍 Downloading city dataset from {}", location);
        let response = client
            .get(location)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        response.bytes().await?.to_vec()
    } else {
        tracing::info!("📂 Reading city dataset from {}", location);
        tokio::fs::read(location).await?
    };

    let cities = parse_cities(data.as_slice())?;
    tracing::info!("Loaded {} cities", cities.len());
    Ok(cities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const SAMPLE: &str = "\
2988507\tParis\tParis\tLutece\t48.85341\t2.3488\tP\tPPLC\tFR\t\t11\t75\t751\t75056\t2138551\t\t42\tEurope/Paris\t2022-12-07
2996944\tLyon\tLyon\tLugdunum\t45.74846\t4.84671\tP\tPPLA\tFR\t\t84\t69\t691\t69123\t522969\t\t174\tEurope/Paris\t2023-01-05
2950159\tBerlin\tBerlin\t\t52.52437\t13.41053\tP\tPPLC\tDE\t\t16\t00\t11000\t11000000\t3426354\t74\t43\tEurope/Berlin\t2022-11-23
";

    #[test]
    fn test_parse_geonames_rows() {
        let cities = parse_cities(SAMPLE.as_bytes()).unwrap();
        assert_eq!(cities.len(), 3);
        assert_eq!(cities[0], CityRecord::new("Paris", "FR"));
        assert_eq!(cities[2], CityRecord::new("Berlin", "DE"));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let data = format!("{}1\tbroken\trow\n", SAMPLE);
        let cities = parse_cities(data.as_bytes()).unwrap();
        assert_eq!(cities.len(), 3);
    }

    #[test]
    fn test_quotes_in_names_are_kept() {
        let data = "1\tx\tL'\"Isle\"\t\t0\t0\tP\tPPL\tFR\n";
        let cities = parse_cities(data.as_bytes()).unwrap();
        assert_eq!(cities[0].city, "L'\"Isle\"");
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(matches!(
            parse_cities("".as_bytes()),
            Err(KeywordError::DatasetError { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_remote_dataset() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/cities1000.txt");
            then.status(200).body(SAMPLE);
        });

        let cities = load_cities(
            &Client::new(),
            &server.url("/cities1000.txt"),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(cities.len(), 3);
    }

    #[tokio::test]
    async fn test_load_local_dataset() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cities.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let cities = load_cities(&Client::new(), path.to_str().unwrap(), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(cities[1], CityRecord::new("Lyon", "FR"));
    }
}

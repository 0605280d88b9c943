use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::Units,
    provider::WeatherProvider,
};

/// Country appended to bare postal codes.
const DEFAULT_ZIP_COUNTRY: &str = "US";

/// Tag telling the provider how to interpret a location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    City,
    Zip,
    LatLon,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::City => "city",
            LocationKind::Zip => "zip",
            LocationKind::LatLon => "latlon",
        }
    }

    pub const fn all() -> &'static [LocationKind] {
        &[LocationKind::City, LocationKind::Zip, LocationKind::LatLon]
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LocationKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "city" => Ok(LocationKind::City),
            "zip" => Ok(LocationKind::Zip),
            "latlon" => Ok(LocationKind::LatLon),
            _ => Err(Error::InvalidInput(format!(
                "Unknown location type '{value}'. Supported: city, zip, latlon."
            ))),
        }
    }
}

/// A normalized place identifier. Construct via [`LocationSpec::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// City name, optionally "City,CountryCode". Passed through verbatim.
    City(String),
    /// "postal,CountryCode"; a bare postal code defaults to the US.
    Zip(String),
    LatLon { lat: f64, lon: f64 },
}

impl LocationSpec {
    /// Normalize a raw location string under the given tag.
    pub fn parse(kind: LocationKind, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::InvalidInput("Location cannot be empty".to_string()));
        }

        match kind {
            LocationKind::City => Ok(LocationSpec::City(raw.to_string())),
            LocationKind::Zip => {
                let zip = if raw.contains(',') {
                    raw.to_string()
                } else {
                    format!("{raw},{DEFAULT_ZIP_COUNTRY}")
                };
                Ok(LocationSpec::Zip(zip))
            }
            LocationKind::LatLon => {
                let parts: Vec<&str> = raw.split(',').collect();
                let [lat, lon] = parts.as_slice() else {
                    return Err(invalid_latlon());
                };
                let lat: f64 = lat.trim().parse().map_err(|_| invalid_latlon())?;
                let lon: f64 = lon.trim().parse().map_err(|_| invalid_latlon())?;
                Ok(LocationSpec::LatLon { lat, lon })
            }
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            LocationSpec::City(_) => LocationKind::City,
            LocationSpec::Zip(_) => LocationKind::Zip,
            LocationSpec::LatLon { .. } => LocationKind::LatLon,
        }
    }

    /// Normalized string form, as persisted on records.
    pub fn normalized(&self) -> String {
        match self {
            LocationSpec::City(name) => name.clone(),
            LocationSpec::Zip(zip) => zip.clone(),
            LocationSpec::LatLon { lat, lon } => format!("{lat},{lon}"),
        }
    }
}

impl std::fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.normalized())
    }
}

fn invalid_latlon() -> Error {
    Error::InvalidInput("Invalid lat/lon format. Use: latitude,longitude".to_string())
}

/// Confirm the spec resolves to a real place with a single current-weather
/// lookup. Returns the provider's canonical "City, CountryCode" string.
pub async fn confirm_location(
    provider: &dyn WeatherProvider,
    spec: &LocationSpec,
    units: Units,
) -> Result<String> {
    let current = provider.current(spec, units).await?;
    Ok(current.location_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_kind_as_str_roundtrip() {
        for kind in LocationKind::all() {
            let parsed = LocationKind::try_from(kind.as_str()).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn unknown_location_kind_error() {
        let err = LocationKind::try_from("plusname").unwrap_err();
        assert!(err.to_string().contains("Unknown location type"));
    }

    #[test]
    fn bare_zip_gets_default_country() {
        let spec = LocationSpec::parse(LocationKind::Zip, "10001").unwrap();
        assert_eq!(spec.normalized(), "10001,US");
    }

    #[test]
    fn zip_with_country_is_kept_verbatim() {
        let spec = LocationSpec::parse(LocationKind::Zip, "SW1A,GB").unwrap();
        assert_eq!(spec.normalized(), "SW1A,GB");
    }

    #[test]
    fn city_passes_through() {
        let spec = LocationSpec::parse(LocationKind::City, "London,UK").unwrap();
        assert_eq!(spec.normalized(), "London,UK");
        assert_eq!(spec.kind(), LocationKind::City);
    }

    #[test]
    fn latlon_parses_both_halves() {
        let spec = LocationSpec::parse(LocationKind::LatLon, "40.7128, -74.0060").unwrap();
        assert_eq!(
            spec,
            LocationSpec::LatLon { lat: 40.7128, lon: -74.006 }
        );
    }

    #[test]
    fn latlon_rejects_non_numeric_halves() {
        let err = LocationSpec::parse(LocationKind::LatLon, "north,west").unwrap_err();
        assert!(err.to_string().contains("latitude,longitude"));
    }

    #[test]
    fn latlon_rejects_wrong_component_count() {
        for raw in ["40.7128", "40.7,-74.0,12.0"] {
            let err = LocationSpec::parse(LocationKind::LatLon, raw).unwrap_err();
            assert!(err.to_string().contains("latitude,longitude"));
        }
    }

    #[test]
    fn empty_location_is_rejected() {
        let err = LocationSpec::parse(LocationKind::City, "   ").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }
}

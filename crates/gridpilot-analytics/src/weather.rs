//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Pricing node to weather location weighting and temperature summaries."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Weather relevance for pricing nodes.
//!
//! Each trading hub belongs to a zone; a zone weights load-centre temperature
//! against solar and wind conditions. Location catalogues are static.

use chrono::Timelike;
use serde::Serialize;

use crate::{
    errors::{AnalyticsError, Result},
    model::TemperatureReading,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingNode {
    pub node_id: &'static str,
    pub zone: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const PRICING_HUBS: [PricingNode; 3] = [
    PricingNode {
        node_id: "TH_NP15_GEN-APND",
        zone: "NP15",
        lat: 38.5,
        lon: -121.5,
    },
    PricingNode {
        node_id: "TH_SP15_GEN-APND",
        zone: "SP15",
        lat: 34.0,
        lon: -118.2,
    },
    PricingNode {
        node_id: "TH_ZP26_GEN-APND",
        zone: "ZP26",
        lat: 36.7,
        lon: -119.8,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherPoint {
    pub name: &'static str,
    pub zone: &'static str,
    pub lat: f64,
    pub lon: f64,
    /// Population for load centres, nameplate MW for generation sites.
    pub size: u32,
}

const fn point(name: &'static str, zone: &'static str, lat: f64, lon: f64, size: u32) -> WeatherPoint {
    WeatherPoint {
        name,
        zone,
        lat,
        lon,
        size,
    }
}

pub const LOAD_CENTERS: [WeatherPoint; 7] = [
    point("Los Angeles, CA", "SP15", 34.05, -118.24, 4_000_000),
    point("San Diego, CA", "SP15", 32.72, -117.16, 1_400_000),
    point("San Francisco, CA", "NP15", 37.77, -122.42, 870_000),
    point("Sacramento, CA", "NP15", 38.58, -121.49, 525_000),
    point("San Jose, CA", "NP15", 37.34, -121.89, 1_000_000),
    point("Fresno, CA", "ZP26", 36.74, -119.79, 540_000),
    point("Riverside, CA", "SP15", 33.95, -117.40, 330_000),
];

pub const SOLAR_SITES: [WeatherPoint; 3] = [
    point("Mojave Desert, CA", "SP15", 35.05, -117.50, 3000),
    point("Imperial Valley, CA", "SP15", 32.85, -115.57, 1500),
    point("Westlands, CA", "ZP26", 36.20, -120.10, 2500),
];

pub const WIND_SITES: [WeatherPoint; 2] = [
    point("Tehachapi, CA", "SP15", 35.13, -118.45, 1000),
    point("Altamont Pass, CA", "NP15", 37.73, -121.65, 500),
];

const MAX_LOAD_CENTERS: usize = 3;
const FALLBACK_WIND_SITE: &str = "Tehachapi, CA";
const FALLBACK_SOLAR_SITE: &str = "Mojave Desert, CA";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedLocations {
    pub locations: Vec<&'static str>,
    pub weight: f64,
    pub metric: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherLocations {
    pub load_centers: WeightedLocations,
    pub solar_generation: WeightedLocations,
    pub wind_generation: WeightedLocations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeWeatherProfile {
    pub node_id: &'static str,
    pub zone: &'static str,
    pub analysis_note: &'static str,
    pub weather_locations: WeatherLocations,
    pub recommended_query: String,
}

struct ZoneWeights {
    load: f64,
    solar: f64,
    wind: f64,
    note: &'static str,
}

fn zone_weights(zone: &str) -> ZoneWeights {
    match zone {
        "SP15" => ZoneWeights {
            load: 0.5,
            solar: 0.4,
            wind: 0.1,
            note: "SP15 is load-heavy (LA) but solar significantly impacts mid-day prices",
        },
        "ZP26" => ZoneWeights {
            load: 0.3,
            solar: 0.6,
            wind: 0.1,
            note: "ZP26 (Central) is dominated by utility-scale solar",
        },
        _ => ZoneWeights {
            load: 0.7,
            solar: 0.2,
            wind: 0.1,
            note: "NP15 is more load-driven; less local solar impact",
        },
    }
}

/// Resolve `NP15`/`SP15`/`ZP26` shorthand (any case) or a full hub id.
pub fn resolve_hub(node: &str) -> Result<&'static PricingNode> {
    let trimmed = node.trim();
    PRICING_HUBS
        .iter()
        .find(|hub| hub.zone.eq_ignore_ascii_case(trimmed) || hub.node_id == trimmed)
        .ok_or_else(|| AnalyticsError::UnknownNode(trimmed.to_owned()))
}

/// Map shorthand hub names to node ids, passing anything else through.
pub fn resolve_hub_id(location: &str) -> String {
    match resolve_hub(location) {
        Ok(hub) => hub.node_id.to_owned(),
        Err(_) => location.to_owned(),
    }
}

fn names_in_zone(points: &[WeatherPoint], zone: &str) -> Vec<&'static str> {
    points.iter().filter(|p| p.zone == zone).map(|p| p.name).collect()
}

/// Weather locations that drive price at `node`, weighted by zone.
pub fn weather_locations_for_node(node: &str) -> Result<NodeWeatherProfile> {
    let hub = resolve_hub(node)?;
    let weights = zone_weights(hub.zone);

    let mut loads: Vec<&WeatherPoint> = LOAD_CENTERS.iter().filter(|p| p.zone == hub.zone).collect();
    loads.sort_by(|a, b| b.size.cmp(&a.size));
    let load_names: Vec<&'static str> = loads.iter().take(MAX_LOAD_CENTERS).map(|p| p.name).collect();

    let zone_solar = names_in_zone(&SOLAR_SITES, hub.zone);
    let solar_names = if zone_solar.is_empty() {
        SOLAR_SITES.iter().take(2).map(|p| p.name).collect()
    } else {
        zone_solar.clone()
    };

    let mut wind_names = names_in_zone(&WIND_SITES, hub.zone);
    if wind_names.is_empty() {
        wind_names.push(FALLBACK_WIND_SITE);
    }

    let recommended_query = format!(
        "For {}, check temps in {} and solar conditions in {}",
        hub.node_id,
        load_names.first().copied().unwrap_or("N/A"),
        zone_solar.first().copied().unwrap_or(FALLBACK_SOLAR_SITE),
    );

    Ok(NodeWeatherProfile {
        node_id: hub.node_id,
        zone: hub.zone,
        analysis_note: weights.note,
        weather_locations: WeatherLocations {
            load_centers: WeightedLocations {
                locations: load_names,
                weight: weights.load,
                metric: "temperature (drives AC demand)",
            },
            solar_generation: WeightedLocations {
                locations: solar_names,
                weight: weights.solar,
                metric: "cloud cover, irradiance (drives solar output)",
            },
            wind_generation: WeightedLocations {
                locations: wind_names,
                weight: weights.wind,
                metric: "wind speed (drives wind output)",
            },
        },
        recommended_query,
    })
}

/// Daily temperature shape in degrees Celsius. The location and date are
/// echoed by the calling tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub max_temp: f64,
    pub min_temp: f64,
    pub noon_temp: Option<f64>,
    pub evening_peak_temp_1800: Option<f64>,
}

/// Summarise one day of hourly readings; an empty day is `NoData`.
pub fn summarize_temperature(readings: &[TemperatureReading]) -> Result<TemperatureSummary> {
    let first = readings
        .first()
        .ok_or_else(|| AnalyticsError::empty("temperature"))?;
    let (min, max) = readings.iter().fold(
        (first.temperature_c, first.temperature_c),
        |(lo, hi), r| (lo.min(r.temperature_c), hi.max(r.temperature_c)),
    );
    let at_hour = |hour: u32| {
        readings
            .iter()
            .find(|r| r.time.hour() == hour)
            .map(|r| r.temperature_c)
    };
    Ok(TemperatureSummary {
        max_temp: max,
        min_temp: min,
        noon_temp: at_hour(12),
        evening_peak_temp_1800: at_hour(18),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn shorthand_and_full_ids_resolve() {
        assert_eq!(resolve_hub("sp15").unwrap().node_id, "TH_SP15_GEN-APND");
        assert_eq!(resolve_hub("TH_ZP26_GEN-APND").unwrap().zone, "ZP26");
        assert_eq!(resolve_hub_id("NP15"), "TH_NP15_GEN-APND");
        assert_eq!(resolve_hub_id("DLAP_PGAE-APND"), "DLAP_PGAE-APND");
    }

    #[test]
    fn unknown_node_suggests_hubs() {
        let err = weather_locations_for_node("PATH15").unwrap_err();
        assert_eq!(err.to_string(), "Unknown node: PATH15. Try NP15, SP15, or ZP26.");
    }

    #[test]
    fn sp15_weights_load_over_solar() {
        let profile = weather_locations_for_node("SP15").unwrap();
        let locations = &profile.weather_locations;
        assert_eq!(
            locations.load_centers.locations,
            vec!["Los Angeles, CA", "San Diego, CA", "Riverside, CA"]
        );
        assert_eq!(locations.load_centers.weight, 0.5);
        assert_eq!(locations.solar_generation.weight, 0.4);
        assert_eq!(
            locations.solar_generation.locations,
            vec!["Mojave Desert, CA", "Imperial Valley, CA"]
        );
        assert_eq!(locations.wind_generation.locations, vec!["Tehachapi, CA"]);
        assert!(profile.recommended_query.contains("Los Angeles, CA"));
    }

    #[test]
    fn np15_falls_back_to_system_solar() {
        let profile = weather_locations_for_node("np15").unwrap();
        let locations = &profile.weather_locations;
        assert_eq!(locations.load_centers.weight, 0.7);
        assert_eq!(locations.load_centers.locations[0], "San Jose, CA");
        assert_eq!(
            locations.solar_generation.locations,
            vec!["Mojave Desert, CA", "Imperial Valley, CA"]
        );
        assert_eq!(locations.wind_generation.locations, vec!["Altamont Pass, CA"]);
        assert!(profile.recommended_query.ends_with("Mojave Desert, CA"));
    }

    #[test]
    fn zp26_is_solar_dominated() {
        let profile = weather_locations_for_node("ZP26").unwrap();
        assert_eq!(profile.weather_locations.solar_generation.weight, 0.6);
        assert_eq!(profile.weather_locations.wind_generation.locations, vec!["Tehachapi, CA"]);
    }

    #[test]
    fn temperature_summary_picks_noon_and_evening() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let readings: Vec<TemperatureReading> = (0..24)
            .map(|h| TemperatureReading {
                location: "Fresno, CA".into(),
                time: date.and_hms_opt(h, 0, 0).unwrap(),
                temperature_c: 20.0 + (h as f64 - 15.0).abs() * -1.0 + 15.0,
            })
            .collect();
        let summary = summarize_temperature(&readings).unwrap();
        assert_eq!(summary.max_temp, 35.0);
        assert_eq!(summary.min_temp, 20.0);
        assert_eq!(summary.noon_temp, Some(32.0));
        assert_eq!(summary.evening_peak_temp_1800, Some(32.0));
    }

    #[test]
    fn empty_day_is_no_data() {
        assert!(summarize_temperature(&[]).unwrap_err().is_no_data());
    }
}

//! crates/smart_city_core/src/metrics.rs
//!
//! Simulated city metrics for the dashboards. Values are random but seeded from the
//! city name, so a city always shows the same figures and different cities differ.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    NewDelhi,
    Mumbai,
    Bengaluru,
    Chennai,
    Kolkata,
}

impl City {
    pub const ALL: [City; 5] = [City::NewDelhi, City::Mumbai, City::Bengaluru, City::Chennai, City::Kolkata];

    pub fn name(&self) -> &'static str {
        match self {
            City::NewDelhi => "New Delhi",
            City::Mumbai => "Mumbai",
            City::Bengaluru => "Bengaluru",
            City::Chennai => "Chennai",
            City::Kolkata => "Kolkata",
        }
    }

    /// (latitude, longitude) of the city centre.
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            City::NewDelhi => (28.6139, 77.2090),
            City::Mumbai => (19.0760, 72.8777),
            City::Bengaluru => (12.9716, 77.5946),
            City::Chennai => (13.0827, 80.2707),
            City::Kolkata => (22.5726, 88.3639),
        }
    }

    fn rng(&self) -> StdRng {
        let seed: u64 = self.name().chars().map(|c| c as u64).sum();
        StdRng::seed_from_u64(seed)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown city '{0}'")]
pub struct UnknownCity(pub String);

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], " ");
        City::ALL
            .into_iter()
            .find(|city| city.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownCity(s.to_string()))
    }
}

//=========================================================================================
// Dashboard data
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyTraffic {
    pub hour: u8,
    pub congestion_pct: f64,
    pub average_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSnapshot {
    /// Simulated live vehicle positions as (latitude, longitude).
    pub vehicle_positions: Vec<(f64, f64)>,
    pub hourly: Vec<HourlyTraffic>,
}

/// A headline figure and its change against the previous period.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub value: f64,
    pub delta_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WasteSnapshot {
    pub recycling_rate_pct: MetricValue,
    pub landfill_diversion_pct: MetricValue,
    pub tonnes_per_day: MetricValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEnergy {
    pub hour: u8,
    pub consumption_mwh: f64,
}

const VEHICLE_COUNT: usize = 100;
const VEHICLE_SPREAD_DEG: f64 = 0.04;

pub fn traffic(city: City) -> TrafficSnapshot {
    let mut rng = city.rng();
    let (lat, lon) = city.coordinates();

    let vehicle_positions = (0..VEHICLE_COUNT)
        .map(|_| {
            (
                lat + rng.random_range(-VEHICLE_SPREAD_DEG..VEHICLE_SPREAD_DEG),
                lon + rng.random_range(-VEHICLE_SPREAD_DEG..VEHICLE_SPREAD_DEG),
            )
        })
        .collect();

    let hourly = (0..24u8)
        .map(|hour| HourlyTraffic {
            hour,
            congestion_pct: rng.random::<f64>() * 80.0 + 10.0,
            average_speed_kmh: rng.random::<f64>() * 40.0 + 20.0,
        })
        .collect();

    TrafficSnapshot {
        vehicle_positions,
        hourly,
    }
}

pub fn waste(city: City) -> WasteSnapshot {
    let mut rng = city.rng();
    WasteSnapshot {
        recycling_rate_pct: MetricValue {
            value: 70.0 + rng.random::<f64>() * 15.0,
            delta_pct: rng.random::<f64>() * 2.0 - 1.0,
        },
        landfill_diversion_pct: MetricValue {
            value: 75.0 + rng.random::<f64>() * 15.0,
            delta_pct: rng.random::<f64>() * 2.0 - 1.0,
        },
        tonnes_per_day: MetricValue {
            value: (10_000 + rng.random_range(0..5_000u32)) as f64,
            delta_pct: rng.random::<f64>() * 4.0 - 1.5,
        },
    }
}

pub fn energy(city: City) -> Vec<HourlyEnergy> {
    let mut rng = city.rng();
    let base = 450.0 + rng.random_range(0..100u32) as f64;
    (0..24u8)
        .map(|hour| HourlyEnergy {
            hour,
            consumption_mwh: base + rng.random::<f64>() * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figures_are_stable_per_city() {
        for city in City::ALL {
            assert_eq!(traffic(city), traffic(city));
            assert_eq!(waste(city), waste(city));
            assert_eq!(energy(city), energy(city));
        }
        assert_ne!(energy(City::Mumbai), energy(City::Chennai));
    }

    #[test]
    fn figures_stay_in_range() {
        for city in City::ALL {
            let t = traffic(city);
            assert_eq!(t.vehicle_positions.len(), 100);
            assert_eq!(t.hourly.len(), 24);
            let (lat, lon) = city.coordinates();
            assert!(t
                .vehicle_positions
                .iter()
                .all(|(a, b)| (a - lat).abs() <= 0.04 && (b - lon).abs() <= 0.04));
            assert!(t.hourly.iter().all(|h| (10.0..90.0).contains(&h.congestion_pct)));
            assert!(t.hourly.iter().all(|h| (20.0..60.0).contains(&h.average_speed_kmh)));

            let w = waste(city);
            assert!((70.0..85.0).contains(&w.recycling_rate_pct.value));
            assert!((75.0..90.0).contains(&w.landfill_diversion_pct.value));
            assert!((10_000.0..15_000.0).contains(&w.tonnes_per_day.value));

            let e = energy(city);
            assert_eq!(e.len(), 24);
            assert!(e.iter().all(|h| (450.0..650.0).contains(&h.consumption_mwh)));
        }
    }

    #[test]
    fn parses_city_names() {
        assert_eq!("new delhi".parse::<City>().unwrap(), City::NewDelhi);
        assert_eq!("New_Delhi".parse::<City>().unwrap(), City::NewDelhi);
        assert_eq!("Kolkata".parse::<City>().unwrap(), City::Kolkata);
        assert!("Atlantis".parse::<City>().is_err());
    }
}

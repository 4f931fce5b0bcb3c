//! Demo mode - generates fake alerts for running without network access

use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use storm_feed::{AlertProperties, AlertRecord, AlertSource};

const EVENTS: &[&str] = &[
    "Tornado Warning",
    "Severe Thunderstorm Warning",
    "Flash Flood Warning",
    "Flood Watch",
    "Winter Storm Warning",
    "Heat Advisory",
    "Wind Advisory",
    "Red Flag Warning",
    "Special Weather Statement",
    "Dense Fog Advisory",
    "Rip Current Statement",
];

const OFFICES: &[(&str, &[&str])] = &[
    ("NWS Peachtree City GA", &["Fulton", "Cobb", "DeKalb", "Gwinnett", "Clayton"]),
    ("NWS Norman OK", &["Cleveland", "McClain", "Oklahoma", "Canadian"]),
    ("NWS Miami FL", &["Miami-Dade", "Broward", "Monroe"]),
    ("NWS Seattle WA", &["King", "Pierce", "Snohomish"]),
    ("NWS Chicago IL", &["Cook", "DuPage", "Lake", "Will"]),
];

/// Alert source that invents a plausible feed on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource {
    max_alerts: usize,
}

impl DemoSource {
    /// Produce up to `max_alerts` alerts per fetch.
    pub const fn new(max_alerts: usize) -> Self {
        Self { max_alerts }
    }

    fn generate(&self) -> Vec<AlertRecord> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(0..=self.max_alerts);
        let now = Utc::now();

        (0..count)
            .map(|_| {
                let event = EVENTS.choose(&mut rng).copied().unwrap_or("Special Weather Statement");
                let (office, counties) = OFFICES.choose(&mut rng).copied().unwrap_or(OFFICES[0]);
                let take = rng.gen_range(1..=counties.len());
                let areas: Vec<&str> = counties.choose_multiple(&mut rng, take).copied().collect();
                let expires = now + Duration::minutes(rng.gen_range(30..360));

                // Leave the odd field out so the placeholders get exercised.
                let headline = rng.gen_bool(0.85).then(|| {
                    format!(
                        "{event} issued {} until {} by {office}",
                        now.format("%B %-d at %-I:%M%p"),
                        expires.format("%-I:%M%p"),
                    )
                });

                AlertRecord::new(AlertProperties {
                    event: Some(event.to_string()),
                    headline,
                    sender_name: Some(office.to_string()),
                    area_desc: Some(areas.join("; ")),
                    effective: Some(now.to_rfc3339_opts(SecondsFormat::Secs, false)),
                    expires: Some(expires.to_rfc3339_opts(SecondsFormat::Secs, false)),
                })
            })
            .collect()
    }
}

impl AlertSource for DemoSource {
    async fn fetch_alerts(&self) -> Vec<AlertRecord> {
        self.generate()
    }
}

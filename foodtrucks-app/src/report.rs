//! Headless commands: drive the same state transitions as the view and
//! print the result instead of drawing it.
use foodtrucks_core::actions::{run_find_nearby, run_initial_load};
use foodtrucks_core::{
    FoodTruckRecord, Geocoder, NearbyPolicy, NearbyTruck, TacoTruckSummary, TruckDetails,
    TruckSource, ViewState,
};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Available {
        trucks: Vec<FoodTruckRecord>,
    },
    Tacos {
        taco_trucks: Vec<TacoTruckSummary>,
    },
    Details {
        permit: String,
        details: TruckDetails,
    },
    Nearby {
        zip_code: String,
        radius_km: f64,
        trucks: Vec<NearbyTruck>,
    },
}

/// Error text exactly as the view would show it.
pub type Outcome = Result<Report, String>;

async fn loaded(source: &dyn TruckSource, limit: usize) -> Result<ViewState, String> {
    let mut state = ViewState::new();
    run_initial_load(&mut state, source, limit).await;
    match state.error() {
        Some(err) => Err(err.to_string()),
        None => Ok(state),
    }
}

pub async fn available(source: &dyn TruckSource, limit: usize) -> Outcome {
    let state = loaded(source, limit).await?;
    Ok(Report::Available {
        trucks: state.available().to_vec(),
    })
}

pub async fn tacos(source: &dyn TruckSource, limit: usize) -> Outcome {
    let state = loaded(source, limit).await?;
    Ok(Report::Tacos {
        taco_trucks: state.taco_trucks().to_vec(),
    })
}

pub async fn show(source: &dyn TruckSource, limit: usize, permit: &str) -> Outcome {
    let mut state = loaded(source, limit).await?;
    state.select_taco_truck(permit);
    match (state.details(), state.error()) {
        (Some(details), None) => Ok(Report::Details {
            permit: permit.to_string(),
            details,
        }),
        (_, err) => Err(err.unwrap_or_default().to_string()),
    }
}

pub async fn nearby(
    source: &dyn TruckSource,
    geocoder: &dyn Geocoder,
    limit: usize,
    policy: NearbyPolicy,
    zip_code: &str,
) -> Outcome {
    let mut state = loaded(source, limit).await?;
    state.set_zip_code(zip_code);
    run_find_nearby(&mut state, geocoder, policy).await;
    if let Some(err) = state.error() {
        return Err(err.to_string());
    }
    Ok(Report::Nearby {
        zip_code: zip_code.to_string(),
        radius_km: policy.radius_km,
        trucks: state.nearby().to_vec(),
    })
}

pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

pub fn render_error(message: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({ "error": message }).to_string(),
        OutputFormat::Text => format!("Error: {message}"),
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn food_line(out: &mut String, food: &str) {
    if !food.is_empty() {
        let _ = writeln!(out, "{:13}{food}", "");
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Available { trucks } => {
            if trucks.is_empty() {
                out.push_str("No food trucks available.\n");
            }
            for t in trucks {
                let _ = writeln!(
                    out,
                    "{:<12} {:<40} {}",
                    or_dash(t.permit_id()),
                    or_dash(t.name()),
                    or_dash(t.location())
                );
                food_line(&mut out, t.food_items());
            }
        }
        Report::Tacos { taco_trucks } => {
            if taco_trucks.is_empty() {
                out.push_str("No taco trucks found.\n");
            }
            for t in taco_trucks {
                let _ = writeln!(out, "{:<12} {}", or_dash(&t.permit), or_dash(&t.name));
            }
        }
        Report::Details { details, .. } => {
            let _ = writeln!(out, "Name: {}", details.name);
            let _ = writeln!(out, "Location: {}", details.location);
            let _ = writeln!(out, "Food Type: {}", details.food_type);
        }
        Report::Nearby {
            zip_code,
            radius_km,
            trucks,
        } => {
            if trucks.is_empty() {
                let _ = writeln!(out, "No food trucks within {radius_km} km of {zip_code}.");
            }
            for n in trucks {
                let _ = writeln!(
                    out,
                    "{:>6.2} km  {} - {}",
                    n.distance_km,
                    or_dash(n.record.name()),
                    or_dash(n.record.location())
                );
                food_line(&mut out, n.record.food_items());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use foodtrucks_common::{FoodTruckError, Result};
    use foodtrucks_core::GeoCoordinate;

    struct Fixed(serde_json::Value);

    #[async_trait]
    impl TruckSource for Fixed {
        async fn fetch_all(&self) -> Result<Vec<FoodTruckRecord>> {
            serde_json::from_value(self.0.clone()).map_err(|e| FoodTruckError::Dataset(e.to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Down;

    #[async_trait]
    impl TruckSource for Down {
        async fn fetch_all(&self) -> Result<Vec<FoodTruckRecord>> {
            Err(FoodTruckError::Dataset("timed out".into()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    struct Point(Option<GeoCoordinate>);

    #[async_trait]
    impl Geocoder for Point {
        async fn geocode(&self, address: &str) -> Result<GeoCoordinate> {
            self.0
                .ok_or_else(|| FoodTruckError::NoGeocodeResult(address.to_string()))
        }

        fn name(&self) -> &str {
            "point"
        }
    }

    fn dataset() -> Fixed {
        Fixed(serde_json::json!([
            {
                "applicant": "Taqueria Movil",
                "permit": "T1",
                "locationdescription": "16th St",
                "fooditems": "Tacos: burritos",
                "latitude": "37.7650",
                "longitude": "-122.4194"
            },
            { "applicant": "Brew Bus", "permit": "B1", "fooditems": "Coffee" },
            { "applicant": "Half Taco", "permit": "T2", "fooditems": "Fish tacos" }
        ]))
    }

    #[tokio::test]
    async fn show_prints_the_three_detail_fields() {
        let report = show(&dataset(), 10, "T1").await.unwrap();
        assert_eq!(
            render(&report, OutputFormat::Text).unwrap(),
            "Name: Taqueria Movil\nLocation: 16th St\nFood Type: Tacos: burritos\n"
        );
    }

    #[tokio::test]
    async fn show_incomplete_or_unavailable_truck_is_an_error() {
        let err = show(&dataset(), 10, "T2").await.unwrap_err();
        assert_eq!(err, "Selected taco truck has empty details.");

        let err = show(&dataset(), 1, "B1").await.unwrap_err();
        assert_eq!(err, "Selected taco truck has empty details.");
    }

    #[tokio::test]
    async fn tacos_come_from_the_whole_dataset() {
        let Report::Tacos { taco_trucks } = tacos(&dataset(), 1).await.unwrap() else {
            panic!("expected tacos report");
        };
        let permits: Vec<_> = taco_trucks.iter().map(|t| t.permit.as_str()).collect();
        assert_eq!(permits, ["T1", "T2"]);
    }

    #[tokio::test]
    async fn load_failure_is_reported_verbatim() {
        assert_eq!(
            available(&Down, 10).await.unwrap_err(),
            "Dataset fetch failed: timed out"
        );
    }

    #[tokio::test]
    async fn nearby_text_lists_distances() {
        let here = GeoCoordinate {
            lat: 37.7650,
            lng: -122.4194,
        };
        let report = nearby(&dataset(), &Point(Some(here)), 10, NearbyPolicy::default(), "94110")
            .await
            .unwrap();
        assert_eq!(
            render(&report, OutputFormat::Text).unwrap(),
            "  0.00 km  Taqueria Movil - 16th St\n             Tacos: burritos\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["kind"], "nearby");
        assert_eq!(json["zip_code"], "94110");
        assert_eq!(json["trucks"][0]["record"]["permit"], "T1");
    }

    #[tokio::test]
    async fn nearby_geocode_failure_uses_the_fixed_message() {
        let err = nearby(&dataset(), &Point(None), 10, NearbyPolicy::default(), "00000")
            .await
            .unwrap_err();
        assert_eq!(err, "Failed to get location coordinates.");
        assert_eq!(
            render_error(&err, OutputFormat::Json),
            r#"{"error":"Failed to get location coordinates."}"#
        );
    }

    #[test]
    fn empty_reports_say_so() {
        let report = Report::Nearby {
            zip_code: "94130".into(),
            radius_km: 2.0,
            trucks: vec![],
        };
        assert_eq!(
            render(&report, OutputFormat::Text).unwrap(),
            "No food trucks within 2 km of 94130.\n"
        );
    }
}

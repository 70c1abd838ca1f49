//! Wheat: irrigation, fertilization, pest/disease and spray safety
use rella_core::{Context, DerivedBuckets, Domain, Priority, Proposals, Reason, Rule, RuleError, ScenarioView};

pub struct Wheat;

#[derive(Debug, Clone, PartialEq)]
pub struct WheatFields {
    /// Max temperature, °C
    pub tmax: f64,
    /// Rain over the last 24h, mm
    pub rain24: f64,
    /// Forecast rain over the next 48h, mm
    pub rain48: f64,
    /// Wind, m/s
    pub wind: f64,
    pub humidity: f64,
    pub sm: f64,
    pub stage: String,
    pub water_available: bool,
    pub irrigation_possible: bool,
    pub aphids: bool,
    pub rust: bool,
}

type Ctx = Context<WheatFields>;

fn irrigation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if !(f.irrigation_possible && f.water_available) {
        out.advise_against(
            "IRRIGATE_TODAY",
            vec![Reason::new("irrigation_not_possible")
                .with("irrigation_possible", f.irrigation_possible)
                .with("water_available", f.water_available)],
        );
        return Ok(());
    }

    let derived = ctx.derived();
    let moisture = derived.category("moisture_bucket")?;
    let wet = derived.flag("wet_bucket")?;
    let rain_coming = derived.flag("rain_coming_48h")?;

    if moisture == "low" && !rain_coming && f.rain24 == 0.0 && !wet {
        out.recommend(
            "IRRIGATE_TODAY",
            Priority::High,
            vec![
                Reason::new("soil_moisture_low").with("sm", f.sm),
                Reason::new("dry_conditions").with("rain24", f.rain24).with("humidity", f.humidity),
                Reason::new("no_rain_expected_48h"),
            ],
        );
    } else if moisture == "low" && rain_coming {
        out.recommend(
            "IRRIGATE_REDUCED_OR_DELAY",
            Priority::Medium,
            vec![
                Reason::new("soil_moisture_low_rain_expected").with("sm", f.sm).with("rain48", f.rain48),
                Reason::new("delay_or_reduce_irrigation"),
            ],
        );
    } else if wet || moisture == "high" {
        out.advise_against(
            "IRRIGATE_TODAY",
            vec![
                Reason::new("wet_conditions").with("humidity", f.humidity).with("rain24", f.rain24),
                Reason::new("soil_moisture_level").with("sm", f.sm).with("moisture_bucket", moisture),
            ],
        );
    }
    Ok(())
}

fn fertilize(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    let moisture = ctx.derived().category("moisture_bucket")?;
    let wet = ctx.derived().flag("wet_bucket")?;

    if f.stage == "tillering" && moisture == "adequate" && f.tmax <= 30.0 && !wet {
        out.recommend(
            "FERTILIZE_TODAY",
            Priority::Medium,
            vec![
                Reason::new("stage_is").with("stage", f.stage.as_str()),
                Reason::new("soil_moisture_adequate").with("sm", f.sm),
                Reason::new("weather_suitable").with("tmax", f.tmax).with("humidity", f.humidity),
            ],
        );
    } else if wet || f.rain24 >= 10.0 {
        out.advise_against(
            "FERTILIZE_TODAY",
            vec![
                Reason::new("high_rain_humidity_runoff"),
                Reason::new("rain_humidity_values").with("rain24", f.rain24).with("humidity", f.humidity),
            ],
        );
    }
    Ok(())
}

fn pest_disease(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.aphids {
        out.recommend("SCOUT_APHIDS", Priority::Medium, vec![Reason::new("aphids_observed")]);
    }

    if f.rust || (f.humidity >= 90.0 && f.rain24 >= 2.0) {
        let (priority, cause) = if f.rust {
            (Priority::High, "rust_signs_observed")
        } else {
            (Priority::Medium, "rust_risk_weather")
        };
        out.recommend(
            "RUST_RISK_ALERT",
            priority,
            vec![
                Reason::new(cause),
                Reason::new("humidity_rain_values").with("humidity", f.humidity).with("rain24", f.rain24),
            ],
        );
    }
    Ok(())
}

fn spray_safety(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.wind >= 6.0 || f.tmax >= 35.0 {
        out.recommend(
            "AVOID_SPRAY_MIDDAY",
            Priority::Low,
            vec![
                Reason::new("wind_heat_reduce_spray").with("wind", f.wind).with("tmax", f.tmax),
                Reason::new("prefer_morning_evening"),
            ],
        );
    }
    Ok(())
}

static RULES: [Rule<WheatFields>; 4] = [
    Rule::new("irrigation", irrigation),
    Rule::new("fertilize", fertilize),
    Rule::new("pest_disease", pest_disease),
    Rule::new("spray_safety", spray_safety),
];

impl Domain for Wheat {
    type Fields = WheatFields;

    fn name(&self) -> &'static str {
        "wheat"
    }

    fn read_fields(&self, view: &ScenarioView<'_>) -> WheatFields {
        WheatFields {
            tmax: view.number(&["weather", "t_max_c"], 0.0),
            rain24: view.number(&["weather", "rain_mm_24h"], 0.0),
            rain48: view.number(&["weather", "forecast_rain_mm_48h"], 0.0),
            wind: view.number(&["weather", "wind_mps"], 0.0),
            humidity: view.number(&["weather", "humidity_pct"], 0.0),
            sm: view.number(&["soil", "soil_moisture_pct"], 0.0),
            stage: view.text(&["crop", "stage_code"], "unknown"),
            water_available: view.flag(&["constraints", "water_available"], true),
            irrigation_possible: view.flag(&["constraints", "irrigation_possible_today"], true),
            aphids: view.flag(&["observations", "pest_aphids_seen"], false),
            rust: view.flag(&["observations", "disease_rust_seen"], false),
        }
    }

    fn derive_buckets(&self, f: &WheatFields) -> DerivedBuckets {
        let moisture = if f.sm < 20.0 {
            "low"
        } else if f.sm <= 32.0 {
            "adequate"
        } else {
            "high"
        };
        let weather = if f.tmax >= 35.0 {
            "hot"
        } else if f.tmax >= 28.0 {
            "warm"
        } else {
            "mild"
        };

        DerivedBuckets::new()
            .with("moisture_bucket", moisture)
            .with("weather_bucket", weather)
            .with("wet_bucket", f.rain24 >= 5.0 || f.humidity >= 85.0)
            .with("rain_coming_48h", f.rain48 >= 6.0)
    }

    fn rules(&self) -> &[Rule<WheatFields>] {
        &RULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(record: serde_json::Value) -> WheatFields {
        Wheat.read_fields(&ScenarioView::decision_inputs(&record))
    }

    #[test]
    fn test_defaults() {
        let f = fields(json!({}));
        assert_eq!(f.sm, 0.0);
        assert_eq!(f.stage, "unknown");
        assert!(f.water_available);
        assert!(f.irrigation_possible);
        assert!(!f.aphids);
    }

    #[test]
    fn test_moisture_thresholds() {
        let bucket = |sm: f64| {
            let f = fields(json!({ "decision_inputs": { "soil": { "soil_moisture_pct": sm } } }));
            Wheat.derive_buckets(&f).category("moisture_bucket").unwrap().to_string()
        };
        assert_eq!(bucket(19.9), "low");
        assert_eq!(bucket(20.0), "adequate");
        assert_eq!(bucket(32.0), "adequate");
        assert_eq!(bucket(32.1), "high");
    }

    #[test]
    fn test_weather_and_wet_buckets() {
        let f = fields(json!({ "decision_inputs": { "weather": {
            "t_max_c": 35, "humidity_pct": 85, "forecast_rain_mm_48h": 6
        } } }));
        let d = Wheat.derive_buckets(&f);
        assert_eq!(d.category("weather_bucket").unwrap(), "hot");
        assert!(d.flag("wet_bucket").unwrap());
        assert!(d.flag("rain_coming_48h").unwrap());
    }

    #[test]
    fn test_rain_coming_delays_irrigation() {
        let record = json!({ "decision_inputs": {
            "soil": { "soil_moisture_pct": 12 },
            "weather": { "forecast_rain_mm_48h": 9, "humidity_pct": 50 }
        } });
        let output = rella_core::run_domain(&Wheat, &record).unwrap();
        assert_eq!(output.recommendation_codes(), vec!["IRRIGATE_REDUCED_OR_DELAY"]);
    }

    #[test]
    fn test_tillering_fertilize() {
        let record = json!({ "decision_inputs": {
            "soil": { "soil_moisture_pct": 25 },
            "weather": { "t_max_c": 24, "humidity_pct": 60 },
            "crop": { "stage_code": "tillering" }
        } });
        let output = rella_core::run_domain(&Wheat, &record).unwrap();
        let action = output.recommendation("FERTILIZE_TODAY").unwrap();
        assert_eq!(action.priority, Some(Priority::Medium));
        assert_eq!(action.reason_keys(), vec!["stage_is", "soil_moisture_adequate", "weather_suitable"]);
    }

    #[test]
    fn test_rust_priority() {
        let seen = json!({ "decision_inputs": { "observations": { "disease_rust_seen": true } } });
        let output = rella_core::run_domain(&Wheat, &seen).unwrap();
        assert_eq!(output.recommendation("RUST_RISK_ALERT").unwrap().priority, Some(Priority::High));

        let weather = json!({ "decision_inputs": { "weather": { "humidity_pct": 92, "rain_mm_24h": 3 } } });
        let output = rella_core::run_domain(&Wheat, &weather).unwrap();
        let action = output.recommendation("RUST_RISK_ALERT").unwrap();
        assert_eq!(action.priority, Some(Priority::Medium));
        assert_eq!(action.reason_keys()[0], "rust_risk_weather");
    }
}

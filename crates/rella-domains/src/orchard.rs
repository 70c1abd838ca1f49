//! Orchard (fruit trees)
use rella_core::{Context, DerivedBuckets, Domain, Priority, Proposals, Reason, Rule, RuleError, ScenarioView};

pub struct Orchard;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchardFields {
    pub temperature: f64,
    pub humidity: f64,
    /// Wind, km/h
    pub wind: f64,
    pub rain24: f64,
    pub frost_forecast: bool,
    pub soil_moisture: f64,
    pub soil_temp: f64,
    pub stage: String,
    pub fruit_load: String,
    pub health_status: String,
    pub codling_moth: bool,
    pub aphids: bool,
    pub mites: bool,
    pub fire_blight: bool,
    pub scab: bool,
    pub mildew: bool,
    pub water_available: bool,
    pub labor_available: bool,
}

type Ctx = Context<OrchardFields>;

fn irrigation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if !f.water_available {
        out.advise_against("IRRIGATE_ORCHARD", vec![Reason::new("no_water_available")]);
        return Ok(());
    }

    let moisture = ctx.derived().category("moisture_bucket")?;
    if moisture == "low" && matches!(f.stage.as_str(), "fruit_development" | "flowering") {
        out.recommend(
            "IRRIGATE_ORCHARD",
            Priority::High,
            vec![
                Reason::new("soil_moisture_critical").with("sm", f.soil_moisture),
                Reason::new("critical_growth_stage").with("stage", f.stage.as_str()),
            ],
        );
    } else if moisture == "low" {
        out.recommend(
            "IRRIGATE_ORCHARD",
            Priority::Medium,
            vec![Reason::new("soil_moisture_low").with("sm", f.soil_moisture)],
        );
    } else if ctx.derived().flag("wet_conditions")? || moisture == "high" {
        out.advise_against(
            "IRRIGATE_ORCHARD",
            vec![Reason::new("soil_too_wet").with("sm", f.soil_moisture).with("rain24", f.rain24)],
        );
    }
    Ok(())
}

fn frost_protection(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.frost_forecast && matches!(f.stage.as_str(), "flowering" | "early_growth") {
        out.recommend(
            "ACTIVATE_FROST_PROTECTION",
            Priority::High,
            vec![
                Reason::new("frost_warning").with("temp", f.temperature),
                Reason::new("frost_sensitive_stage").with("stage", f.stage.as_str()),
                Reason::new("frost_protection_methods"),
            ],
        );
    }
    Ok(())
}

fn pest_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.codling_moth {
        out.recommend(
            "TREAT_CODLING_MOTH",
            Priority::High,
            vec![Reason::new("codling_moth_detected"), Reason::new("fruit_damage_risk")],
        );
    }
    if f.aphids {
        out.recommend("MONITOR_APHIDS", Priority::Medium, vec![Reason::new("aphids_present")]);
    }
    if f.mites {
        out.recommend("TREAT_MITES", Priority::Medium, vec![Reason::new("mites_detected")]);
    }
    Ok(())
}

fn disease_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.fire_blight {
        out.recommend(
            "TREAT_FIRE_BLIGHT",
            Priority::High,
            vec![Reason::new("fire_blight_detected"), Reason::new("prune_infected_branches")],
        );
    }
    if f.scab {
        out.recommend("APPLY_FUNGICIDE_SCAB", Priority::High, vec![Reason::new("scab_signs_present")]);
    }
    if f.mildew {
        out.recommend("TREAT_MILDEW", Priority::Medium, vec![Reason::new("mildew_detected")]);
    }

    let any_disease = f.fire_blight || f.scab || f.mildew;
    if ctx.derived().flag("wet_conditions")? && !any_disease {
        out.recommend(
            "MONITOR_DISEASE",
            Priority::Low,
            vec![Reason::new("wet_conditions_disease_risk")
                .with("humidity", f.humidity)
                .with("rain24", f.rain24)],
        );
    }
    Ok(())
}

fn fruit_thinning(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.fruit_load == "heavy" && f.stage == "fruit_development" {
        out.recommend(
            "THIN_FRUIT",
            Priority::Medium,
            vec![Reason::new("heavy_fruit_load"), Reason::new("improve_fruit_quality")],
        );
    }
    Ok(())
}

fn fertilization(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.stage == "early_growth" && ctx.derived().category("moisture_bucket")? == "adequate" {
        out.recommend(
            "FERTILIZE_ORCHARD",
            Priority::Medium,
            vec![
                Reason::new("spring_growth_stage"),
                Reason::new("soil_moisture_adequate").with("sm", f.soil_moisture),
            ],
        );
    } else if ctx.derived().flag("wet_conditions")? {
        out.advise_against("FERTILIZE_ORCHARD", vec![Reason::new("too_wet_for_fertilizer")]);
    }
    Ok(())
}

fn harvest(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.stage == "harvest_ready" {
        if f.labor_available {
            out.recommend("BEGIN_HARVEST", Priority::High, vec![Reason::new("fruit_ready_harvest")]);
        } else {
            out.recommend("ARRANGE_HARVEST_LABOR", Priority::High, vec![Reason::new("harvest_ready_no_labor")]);
        }
    }
    Ok(())
}

fn storm_preparation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if ctx.derived().flag("high_wind")? {
        out.recommend(
            "SECURE_ORCHARD",
            Priority::High,
            vec![
                Reason::new("high_wind_warning").with("wind", f.wind),
                Reason::new("protect_trees_fruit"),
            ],
        );
        out.advise_against("SPRAY_PESTICIDES", vec![Reason::new("high_wind_no_spray").with("wind", f.wind)]);
    }
    Ok(())
}

static RULES: [Rule<OrchardFields>; 8] = [
    Rule::new("irrigation", irrigation),
    Rule::new("frost_protection", frost_protection),
    Rule::new("pest_management", pest_management),
    Rule::new("disease_management", disease_management),
    Rule::new("fruit_thinning", fruit_thinning),
    Rule::new("fertilization", fertilization),
    Rule::new("harvest", harvest),
    Rule::new("storm_preparation", storm_preparation),
];

impl Domain for Orchard {
    type Fields = OrchardFields;

    fn name(&self) -> &'static str {
        "orchard"
    }

    fn read_fields(&self, view: &ScenarioView<'_>) -> OrchardFields {
        OrchardFields {
            temperature: view.number(&["weather", "temperature_c"], 20.0),
            humidity: view.number(&["weather", "humidity_pct"], 60.0),
            wind: view.number(&["weather", "wind_kph"], 0.0),
            rain24: view.number(&["weather", "rain_mm_24h"], 0.0),
            frost_forecast: view.flag(&["weather", "forecast_frost"], false),
            soil_moisture: view.number(&["soil", "moisture_pct"], 0.0),
            soil_temp: view.number(&["soil", "soil_temp_c"], 0.0),
            stage: view.text(&["trees", "stage"], "unknown"),
            fruit_load: view.text(&["trees", "fruit_load"], "normal"),
            health_status: view.text(&["trees", "health_status"], "good"),
            codling_moth: view.flag(&["pests", "codling_moth_detected"], false),
            aphids: view.flag(&["pests", "aphids_detected"], false),
            mites: view.flag(&["pests", "mites_detected"], false),
            fire_blight: view.flag(&["diseases", "fire_blight_signs"], false),
            scab: view.flag(&["diseases", "scab_signs"], false),
            mildew: view.flag(&["diseases", "mildew_signs"], false),
            water_available: view.flag(&["resources", "water_available"], true),
            labor_available: view.flag(&["resources", "labor_available"], true),
        }
    }

    fn derive_buckets(&self, f: &OrchardFields) -> DerivedBuckets {
        let moisture = if f.soil_moisture < 20.0 {
            "low"
        } else if f.soil_moisture <= 32.0 {
            "adequate"
        } else {
            "high"
        };
        let temp_stress = if f.temperature >= 32.0 {
            "heat"
        } else if f.temperature <= 5.0 {
            "cold"
        } else {
            "normal"
        };

        DerivedBuckets::new()
            .with("moisture_bucket", moisture)
            .with("temp_stress", temp_stress)
            .with("wet_conditions", f.rain24 >= 10.0 || f.humidity >= 80.0)
            .with("high_wind", f.wind >= 40.0)
    }

    fn rules(&self) -> &[Rule<OrchardFields>] {
        &RULES
    }
}

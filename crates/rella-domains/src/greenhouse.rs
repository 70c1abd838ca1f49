use rella_core::{Context, DerivedBuckets, Domain, Priority, Proposals, Reason, Rule, RuleError, ScenarioView};

pub struct Greenhouse;

#[derive(Debug, Clone, PartialEq)]
pub struct GreenhouseFields {
    pub temperature: f64,
    pub humidity: f64,
    pub co2_ppm: f64,
    pub light_hours: f64,
    pub fan_status: String,
    pub vent_open_pct: f64,
    pub water_available: bool,
    pub soil_moisture: f64,
    pub last_watered_hours: f64,
    pub stage: String,
    pub health: String,
    pub whiteflies: bool,
    pub thrips: bool,
    pub aphids: bool,
    pub fungal_signs: bool,
    pub bacterial_signs: bool,
    pub virus_signs: bool,
}

type Ctx = Context<GreenhouseFields>;

fn temperature_control(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let temp = ctx.fields().temperature;
    match ctx.derived().category("temp_status")? {
        "too_hot" => out.recommend(
            "ACTIVATE_COOLING",
            Priority::High,
            vec![
                Reason::new("temperature_too_high").with("temp", temp),
                Reason::new("increase_ventilation"),
            ],
        ),
        "too_cold" => out.recommend(
            "ACTIVATE_HEATING",
            Priority::High,
            vec![
                Reason::new("temperature_too_low").with("temp", temp),
                Reason::new("close_vents"),
            ],
        ),
        _ => {}
    }
    Ok(())
}

fn humidity_control(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let humidity = ctx.fields().humidity;
    match ctx.derived().category("humidity_status")? {
        "too_high" => out.recommend(
            "INCREASE_VENTILATION",
            Priority::High,
            vec![
                Reason::new("humidity_too_high").with("humidity", humidity),
                Reason::new("disease_risk_high_humidity"),
            ],
        ),
        "too_low" => out.recommend(
            "INCREASE_HUMIDITY",
            Priority::Medium,
            vec![Reason::new("humidity_too_low").with("humidity", humidity)],
        ),
        _ => {}
    }
    Ok(())
}

fn ventilation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    if ctx.derived().category("co2_status")? == "high" {
        out.recommend(
            "IMPROVE_VENTILATION",
            Priority::Medium,
            vec![
                Reason::new("co2_too_high").with("co2", ctx.fields().co2_ppm),
                Reason::new("air_quality_poor"),
            ],
        );
    }
    Ok(())
}

fn irrigation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if !f.water_available {
        out.advise_against("WATER_CROPS", vec![Reason::new("no_water_available")]);
        return Ok(());
    }

    if ctx.derived().flag("needs_water")? {
        out.recommend(
            "WATER_CROPS",
            Priority::High,
            vec![
                Reason::new("soil_moisture_low").with("sm", f.soil_moisture),
                Reason::new("last_watered").with("hours", f.last_watered_hours),
            ],
        );
    }
    Ok(())
}

fn pest_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.whiteflies {
        out.recommend("TREAT_WHITEFLIES", Priority::High, vec![Reason::new("whiteflies_detected")]);
    }
    if f.thrips {
        out.recommend("TREAT_THRIPS", Priority::High, vec![Reason::new("thrips_detected")]);
    }
    if f.aphids {
        out.recommend("TREAT_APHIDS", Priority::Medium, vec![Reason::new("aphids_detected")]);
    }
    Ok(())
}

fn disease_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.fungal_signs {
        out.recommend(
            "APPLY_FUNGICIDE",
            Priority::High,
            vec![Reason::new("fungal_infection_detected"), Reason::new("reduce_humidity_disease")],
        );
    }
    if f.bacterial_signs {
        out.recommend(
            "TREAT_BACTERIAL_DISEASE",
            Priority::High,
            vec![Reason::new("bacterial_infection_detected")],
        );
    }
    if f.virus_signs {
        out.recommend("REMOVE_INFECTED_PLANTS", Priority::High, vec![Reason::new("virus_detected_remove")]);
    }
    Ok(())
}

fn crop_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.stage == "transplant_ready" {
        out.recommend("TRANSPLANT_SEEDLINGS", Priority::Medium, vec![Reason::new("seedlings_ready")]);
    }
    if f.health == "poor" {
        out.recommend("CHECK_NUTRIENT_LEVELS", Priority::Medium, vec![Reason::new("crop_health_poor")]);
    }
    Ok(())
}

static RULES: [Rule<GreenhouseFields>; 7] = [
    Rule::new("temperature_control", temperature_control),
    Rule::new("humidity_control", humidity_control),
    Rule::new("ventilation", ventilation),
    Rule::new("irrigation", irrigation),
    Rule::new("pest_management", pest_management),
    Rule::new("disease_management", disease_management),
    Rule::new("crop_management", crop_management),
];

impl Domain for Greenhouse {
    type Fields = GreenhouseFields;

    fn name(&self) -> &'static str {
        "greenhouse"
    }

    fn read_fields(&self, view: &ScenarioView<'_>) -> GreenhouseFields {
        GreenhouseFields {
            temperature: view.number(&["environment", "temperature_c"], 20.0),
            humidity: view.number(&["environment", "humidity_pct"], 60.0),
            co2_ppm: view.number(&["environment", "co2_ppm"], 400.0),
            light_hours: view.number(&["environment", "light_hours"], 12.0),
            fan_status: view.text(&["ventilation", "fan_status"], "off"),
            vent_open_pct: view.number(&["ventilation", "vent_open_pct"], 0.0),
            water_available: view.flag(&["irrigation", "water_available"], true),
            soil_moisture: view.number(&["irrigation", "soil_moisture_pct"], 0.0),
            last_watered_hours: view.number(&["irrigation", "last_watered_hours"], 24.0),
            stage: view.text(&["crops", "stage"], "unknown"),
            health: view.text(&["crops", "health"], "good"),
            whiteflies: view.flag(&["pests", "whiteflies"], false),
            thrips: view.flag(&["pests", "thrips"], false),
            aphids: view.flag(&["pests", "aphids"], false),
            fungal_signs: view.flag(&["diseases", "fungal_signs"], false),
            bacterial_signs: view.flag(&["diseases", "bacterial_signs"], false),
            virus_signs: view.flag(&["diseases", "virus_signs"], false),
        }
    }

    fn derive_buckets(&self, f: &GreenhouseFields) -> DerivedBuckets {
        let temp_status = if f.temperature >= 32.0 {
            "too_hot"
        } else if f.temperature <= 15.0 {
            "too_cold"
        } else {
            "optimal"
        };
        let humidity_status = if f.humidity >= 85.0 {
            "too_high"
        } else if f.humidity <= 45.0 {
            "too_low"
        } else {
            "optimal"
        };
        let co2_status = if f.co2_ppm >= 1000.0 {
            "high"
        } else if f.co2_ppm <= 350.0 {
            "low"
        } else {
            "optimal"
        };

        DerivedBuckets::new()
            .with("temp_status", temp_status)
            .with("humidity_status", humidity_status)
            .with("co2_status", co2_status)
            .with("needs_water", f.soil_moisture < 22.0 || f.last_watered_hours >= 24.0)
    }

    fn rules(&self) -> &[Rule<GreenhouseFields>] {
        &RULES
    }
}

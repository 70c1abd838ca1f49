//! Mixed farm: crops and a small herd competing for water, labor and budget
//!
//! Rules run animals first: health, watering, feeding, then crops.
use rella_core::{Context, DerivedBuckets, Domain, Priority, Proposals, Reason, Rule, RuleError, ScenarioView};

use crate::round1;

pub struct Mixed;

#[derive(Debug, Clone, PartialEq)]
pub struct MixedFields {
    pub soil_moisture: f64,
    pub crop_stage: String,
    pub crop_health: String,
    pub pest_pressure: String,
    pub animal_count: i64,
    pub feed_kg: f64,
    pub water_liters: f64,
    pub sick_count: i64,
    pub labor_hours: f64,
    pub water_available: bool,
    pub budget_available: bool,
    pub temperature: f64,
    pub rain24: f64,
    pub rain48_forecast: f64,
}

type Ctx = Context<MixedFields>;

fn health_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let sick = ctx.fields().sick_count;
    if sick > 0 {
        let priority = if sick >= 3 { Priority::High } else { Priority::Medium };
        out.recommend(
            "CHECK_SICK_ANIMALS",
            priority,
            vec![
                Reason::new("sick_animals_mixed").with("count", sick),
                Reason::new("isolate_if_needed"),
            ],
        );
    }
    Ok(())
}

fn livestock_watering(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let derived = ctx.derived();
    if derived.flag("water_critical")? {
        out.recommend(
            "WATER_ANIMALS_URGENT",
            Priority::High,
            vec![
                Reason::new("water_critical_animals").with("per_animal", derived.measure("water_per_animal")?),
                Reason::new("dehydration_risk"),
            ],
        );
    }
    Ok(())
}

fn livestock_feeding(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let derived = ctx.derived();
    let per_animal = derived.measure("feed_per_animal")?;
    if derived.flag("feed_critical")? {
        out.recommend(
            "FEED_ANIMALS_URGENT",
            Priority::High,
            vec![
                Reason::new("feed_critical_mixed").with("per_animal", per_animal),
                Reason::new("animal_welfare_risk").with("count", ctx.fields().animal_count),
            ],
        );
    } else if per_animal < 5.0 {
        out.recommend(
            "ORDER_FEED_MIXED",
            Priority::Medium,
            vec![Reason::new("feed_low_mixed").with("per_animal", per_animal)],
        );
    }
    Ok(())
}

fn crop_irrigation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if !f.water_available {
        out.advise_against("IRRIGATE_CROPS", vec![Reason::new("no_water_mixed")]);
        return Ok(());
    }

    let derived = ctx.derived();
    if derived.flag("crop_critical")? {
        out.recommend(
            "IRRIGATE_CROPS_URGENT",
            Priority::High,
            vec![
                Reason::new("crop_critical_stage").with("stage", f.crop_stage.as_str()),
                Reason::new("soil_moisture_low").with("sm", f.soil_moisture),
            ],
        );
    } else if derived.flag("crop_needs_water")? && !derived.flag("water_critical")? {
        out.recommend(
            "IRRIGATE_CROPS",
            Priority::Medium,
            vec![Reason::new("crop_needs_irrigation").with("sm", f.soil_moisture)],
        );
    }
    Ok(())
}

fn pest_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    match ctx.fields().pest_pressure.as_str() {
        "high" => out.recommend("TREAT_CROP_PESTS", Priority::Medium, vec![Reason::new("high_pest_pressure")]),
        "medium" => out.recommend(
            "MONITOR_PEST_LEVELS",
            Priority::Low,
            vec![Reason::new("moderate_pest_pressure")],
        ),
        _ => {}
    }
    Ok(())
}

fn harvest_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    if ctx.fields().crop_stage == "harvest_ready" {
        out.recommend(
            "HARVEST_CROPS",
            Priority::High,
            vec![Reason::new("crops_ready_harvest"), Reason::new("timely_harvest_quality")],
        );
    }
    Ok(())
}

fn resource_allocation(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    let derived = ctx.derived();

    if derived.flag("labor_limited")? && derived.flag("multiple_needs")? {
        out.recommend(
            "PRIORITIZE_TASKS",
            Priority::High,
            vec![
                Reason::new("limited_labor").with("hours", f.labor_hours),
                Reason::new("multiple_operations_needed"),
                Reason::new("prioritize_animals_first"),
            ],
        );
    }

    if !f.budget_available && (derived.flag("feed_critical")? || derived.flag("crop_critical")?) {
        out.recommend(
            "SECURE_EMERGENCY_FUNDS",
            Priority::High,
            vec![Reason::new("budget_constraint_critical")],
        );
    }
    Ok(())
}

fn weather_planning(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if f.rain48_forecast >= 10.0 && ctx.derived().flag("crop_needs_water")? {
        out.recommend(
            "DELAY_IRRIGATION_RAIN",
            Priority::Low,
            vec![
                Reason::new("rain_forecast_mixed").with("rain", f.rain48_forecast),
                Reason::new("save_water_resources"),
            ],
        );
    }

    if f.rain24 >= 15.0 {
        out.advise_against("APPLY_FERTILIZER", vec![Reason::new("heavy_rain_runoff").with("rain", f.rain24)]);
    }
    Ok(())
}

static RULES: [Rule<MixedFields>; 8] = [
    Rule::new("health_management", health_management),
    Rule::new("livestock_watering", livestock_watering),
    Rule::new("livestock_feeding", livestock_feeding),
    Rule::new("crop_irrigation", crop_irrigation),
    Rule::new("pest_management", pest_management),
    Rule::new("harvest_management", harvest_management),
    Rule::new("resource_allocation", resource_allocation),
    Rule::new("weather_planning", weather_planning),
];

impl Domain for Mixed {
    type Fields = MixedFields;

    fn name(&self) -> &'static str {
        "mixed"
    }

    fn read_fields(&self, view: &ScenarioView<'_>) -> MixedFields {
        MixedFields {
            soil_moisture: view.number(&["crops", "soil_moisture_pct"], 0.0),
            crop_stage: view.text(&["crops", "stage"], "unknown"),
            crop_health: view.text(&["crops", "health"], "good"),
            pest_pressure: view.text(&["crops", "pest_pressure"], "low"),
            animal_count: view.integer(&["livestock", "animal_count"], 0),
            feed_kg: view.number(&["livestock", "feed_kg"], 0.0),
            water_liters: view.number(&["livestock", "water_liters"], 0.0),
            sick_count: view.integer(&["livestock", "sick_count"], 0),
            labor_hours: view.number(&["resources", "labor_hours"], 8.0),
            water_available: view.flag(&["resources", "water_available"], true),
            budget_available: view.flag(&["resources", "budget_available"], true),
            temperature: view.number(&["weather", "temperature_c"], 20.0),
            rain24: view.number(&["weather", "rain_mm_24h"], 0.0),
            rain48_forecast: view.number(&["weather", "forecast_rain_48h"], 0.0),
        }
    }

    fn derive_buckets(&self, f: &MixedFields) -> DerivedBuckets {
        let per_animal = |amount: f64| {
            if f.animal_count > 0 {
                amount / f.animal_count as f64
            } else {
                0.0
            }
        };

        let crop_needs_water = f.soil_moisture < 20.0;
        let crop_critical =
            matches!(f.crop_stage.as_str(), "flowering" | "fruit_development") && f.soil_moisture < 18.0;

        let feed_per_animal = per_animal(f.feed_kg);
        let feed_critical = feed_per_animal < 3.0;
        let water_per_animal = per_animal(f.water_liters);
        let water_critical = water_per_animal < 8.0;

        let pressing = [crop_needs_water, feed_critical, water_critical, f.sick_count > 0]
            .iter()
            .filter(|&&need| need)
            .count();

        DerivedBuckets::new()
            .with("crop_needs_water", crop_needs_water)
            .with("crop_critical", crop_critical)
            .with("feed_per_animal", round1(feed_per_animal))
            .with("feed_critical", feed_critical)
            .with("water_per_animal", round1(water_per_animal))
            .with("water_critical", water_critical)
            .with("labor_limited", f.labor_hours < 6.0)
            .with("multiple_needs", pressing >= 2)
    }

    fn rules(&self) -> &[Rule<MixedFields>] {
        &RULES
    }
}

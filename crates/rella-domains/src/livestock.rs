//! Livestock (dairy herd): feeding, health, heat stress, milking and water
use rella_core::{Context, DerivedBuckets, Domain, Priority, Proposals, Reason, Rule, RuleError, ScenarioView};

use crate::round1;

pub struct Livestock;

#[derive(Debug, Clone, PartialEq)]
pub struct LivestockFields {
    pub temperature: f64,
    pub humidity: f64,
    pub feed_kg: f64,
    pub water_liters: f64,
    pub milk_yield: f64,
    pub animal_count: i64,
    pub sick_count: i64,
    pub disease_detected: bool,
    pub stress_signs: bool,
    pub vet_available: bool,
    pub feed_delivery_today: bool,
}

impl LivestockFields {
    fn per_animal(&self, amount: f64) -> f64 {
        if self.animal_count > 0 {
            amount / self.animal_count as f64
        } else {
            0.0
        }
    }
}

type Ctx = Context<LivestockFields>;

fn feeding(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    let status = ctx.derived().category("feed_status")?;
    let per_animal = ctx.derived().measure("feed_per_animal")?;

    match status {
        "critical" => out.recommend(
            "ORDER_FEED_URGENT",
            Priority::High,
            vec![
                Reason::new("feed_critical").with("per_animal", per_animal),
                Reason::new("feed_shortage_impact").with("count", f.animal_count),
            ],
        ),
        "low" if !f.feed_delivery_today => out.recommend(
            "ORDER_FEED_TODAY",
            Priority::Medium,
            vec![
                Reason::new("feed_low").with("per_animal", per_animal),
                Reason::new("plan_feed_delivery"),
            ],
        ),
        "adequate" if f.feed_delivery_today => out.advise_against(
            "ORDER_FEED_TODAY",
            vec![Reason::new("feed_adequate_delivery_expected")],
        ),
        _ => {}
    }
    Ok(())
}

fn health_monitoring(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    let health = ctx.derived().category("health_bucket")?;
    let urgent = f.disease_detected || health == "critical";

    if urgent {
        let cause = if f.disease_detected {
            Reason::new("disease_detected")
        } else {
            Reason::new("multiple_sick_animals").with("count", f.sick_count)
        };
        out.recommend(
            "VET_CHECK_URGENT",
            Priority::High,
            vec![cause, Reason::new("isolate_sick_animals").with("count", f.sick_count)],
        );
    } else if health == "warning" {
        out.recommend(
            "MONITOR_HEALTH",
            Priority::Medium,
            vec![
                Reason::new("sick_animals_present").with("count", f.sick_count),
                Reason::new("daily_health_check"),
            ],
        );
    }

    if urgent && !f.vet_available {
        out.recommend(
            "CONTACT_EMERGENCY_VET",
            Priority::High,
            vec![Reason::new("vet_unavailable_emergency")],
        );
    }
    Ok(())
}

fn heat_stress(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if ctx.derived().flag("temp_stress")? || f.stress_signs {
        out.recommend(
            "ACTIVATE_COOLING",
            Priority::High,
            vec![
                Reason::new("heat_stress_risk").with("temp", f.temperature),
                Reason::new("increase_water_access"),
                Reason::new("provide_shade"),
            ],
        );
        out.advise_against(
            "MOVE_ANIMALS",
            vec![Reason::new("heat_stress_avoid_movement").with("temp", f.temperature)],
        );
    }
    Ok(())
}

fn milking_schedule(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    if ctx.derived().category("milk_bucket")? == "low" {
        out.recommend(
            "CHECK_NUTRITION",
            Priority::Medium,
            vec![
                Reason::new("milk_yield_low").with("yield_val", f.milk_yield),
                Reason::new("review_feed_quality"),
            ],
        );
    }

    if ctx.derived().category("health_bucket")? != "good" {
        out.recommend(
            "SANITIZE_MILKING_EQUIPMENT",
            Priority::High,
            vec![Reason::new("prevent_disease_spread")],
        );
    }
    Ok(())
}

fn water_management(ctx: &Ctx, out: &mut Proposals) -> Result<(), RuleError> {
    let f = ctx.fields();
    // ~80 L per cow per day
    let required = f.animal_count as f64 * 80.0;
    let per_animal = round1(f.per_animal(f.water_liters));

    if f.water_liters < required * 0.5 {
        out.recommend(
            "REFILL_WATER_URGENT",
            Priority::High,
            vec![
                Reason::new("water_critical").with("per_animal", per_animal),
                Reason::new("dehydration_risk"),
            ],
        );
    } else if f.water_liters < required {
        out.recommend(
            "REFILL_WATER_TODAY",
            Priority::Medium,
            vec![Reason::new("water_low").with("per_animal", per_animal)],
        );
    }
    Ok(())
}

static RULES: [Rule<LivestockFields>; 5] = [
    Rule::new("feeding", feeding),
    Rule::new("health_monitoring", health_monitoring),
    Rule::new("heat_stress", heat_stress),
    Rule::new("milking_schedule", milking_schedule),
    Rule::new("water_management", water_management),
];

impl Domain for Livestock {
    type Fields = LivestockFields;

    fn name(&self) -> &'static str {
        "livestock"
    }

    fn read_fields(&self, view: &ScenarioView<'_>) -> LivestockFields {
        LivestockFields {
            temperature: view.number(&["environment", "temperature_c"], 20.0),
            humidity: view.number(&["environment", "humidity_pct"], 60.0),
            feed_kg: view.number(&["resources", "feed_kg"], 0.0),
            water_liters: view.number(&["resources", "water_liters"], 0.0),
            milk_yield: view.number(&["production", "milk_liters"], 0.0),
            animal_count: view.integer(&["livestock", "animal_count"], 0),
            sick_count: view.integer(&["health", "sick_count"], 0),
            disease_detected: view.flag(&["health", "disease_detected"], false),
            stress_signs: view.flag(&["health", "stress_signs"], false),
            vet_available: view.flag(&["constraints", "vet_available"], true),
            feed_delivery_today: view.flag(&["constraints", "feed_delivery_expected"], false),
        }
    }

    fn derive_buckets(&self, f: &LivestockFields) -> DerivedBuckets {
        let feed_per_animal = f.per_animal(f.feed_kg);
        let feed_status = if feed_per_animal < 15.0 {
            "critical"
        } else if feed_per_animal < 25.0 {
            "low"
        } else {
            "adequate"
        };

        let health = if f.sick_count > 3 {
            "critical"
        } else if f.sick_count > 0 {
            "warning"
        } else {
            "good"
        };

        // ~20 L per cow per day
        let expected_yield = f.animal_count as f64 * 20.0;
        let milk = if f.milk_yield < expected_yield * 0.7 {
            "low"
        } else if f.milk_yield < expected_yield * 0.9 {
            "adequate"
        } else {
            "good"
        };

        DerivedBuckets::new()
            .with("feed_status", feed_status)
            .with("health_bucket", health)
            .with("temp_stress", f.temperature >= 28.0)
            .with("milk_bucket", milk)
            .with("feed_per_animal", round1(feed_per_animal))
    }

    fn rules(&self) -> &[Rule<LivestockFields>] {
        &RULES
    }
}

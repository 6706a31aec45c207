//! Pricing
//!
//! Prices are computed by a multiplicative pipeline over the rule's base price, applied in a fixed
//! order: indoor, then peak, then weekend. Equipment and coaching are flat hourly additions that no
//! multiplier touches. Every recorded component and the total are rounded to two decimal places,
//! half away from zero; the running court price is carried unrounded between steps.

use jiff::civil::{Date, Time, Weekday, time};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::courts::CourtKind;

/// Name given to the fallback rule used when no active rule is configured.
pub const DEFAULT_RULE_NAME: &str = "Standard Rule";

/// Multiplier and base price configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Display name.
    pub name: String,

    /// Inclusive start of the peak window.
    pub peak_start: Time,

    /// Exclusive end of the peak window.
    pub peak_end: Time,

    /// Applied when the slot starts inside the peak window.
    pub peak_multiplier: Decimal,

    /// Applied on Saturdays and Sundays.
    pub weekend_multiplier: Decimal,

    /// Applied to indoor courts.
    pub indoor_multiplier: Decimal,

    /// Court price before any multiplier.
    pub base_price: Decimal,
}

impl Default for PricingRule {
    fn default() -> Self {
        Self {
            name: DEFAULT_RULE_NAME.to_string(),
            peak_start: time(18, 0, 0, 0),
            peak_end: time(21, 0, 0, 0),
            peak_multiplier: Decimal::new(15, 1),
            weekend_multiplier: Decimal::new(13, 1),
            indoor_multiplier: Decimal::new(14, 1),
            base_price: Decimal::new(500, 0),
        }
    }
}

impl PricingRule {
    /// Whether a slot starting at `start` falls in the `[peak_start, peak_end)` window.
    pub fn is_peak(&self, start: Time) -> bool {
        self.peak_start <= start && start < self.peak_end
    }
}

/// Itemised price of a single slot booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// The rule's base price.
    pub base: Decimal,

    /// Amount added by the indoor multiplier.
    pub court_premium: Decimal,

    /// Amount added by the peak multiplier.
    pub peak_surcharge: Decimal,

    /// Amount added by the weekend multiplier.
    pub weekend_surcharge: Decimal,

    /// Court price after every multiplier.
    pub court_price: Decimal,

    /// Sum of equipment hourly rates.
    pub equipment: Decimal,

    /// Coach hourly rate, zero without a coach.
    pub coach: Decimal,

    /// Amount charged.
    pub total: Decimal,
}

/// Computes the itemised price of a booking.
///
/// `equipment_rates` holds one hourly rate per requested equipment unit. `coach_rate` is `None`
/// when no coach was requested or the requested coach could not be resolved.
pub fn compute_breakdown(
    rule: &PricingRule,
    court: CourtKind,
    date: Date,
    start: Time,
    equipment_rates: &[Decimal],
    coach_rate: Option<Decimal>,
) -> PriceBreakdown {
    let mut running = rule.base_price;

    let court_premium = apply(&mut running, rule.indoor_multiplier, court == CourtKind::Indoor);
    let peak_surcharge = apply(&mut running, rule.peak_multiplier, rule.is_peak(start));
    let weekend_surcharge = apply(&mut running, rule.weekend_multiplier, is_weekend(date));

    let equipment: Decimal = equipment_rates.iter().sum();
    let coach = coach_rate.unwrap_or(Decimal::ZERO);

    PriceBreakdown {
        base: round_money(rule.base_price),
        court_premium,
        peak_surcharge,
        weekend_surcharge,
        court_price: round_money(running),
        equipment: round_money(equipment),
        coach: round_money(coach),
        total: round_money(running + equipment + coach),
    }
}

/// Saturdays and Sundays.
pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Rounds a money amount to two decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies the running price when `applies`, returning the rounded delta.
fn apply(running: &mut Decimal, multiplier: Decimal, applies: bool) -> Decimal {
    if !applies {
        return Decimal::ZERO;
    }

    let delta = *running * (multiplier - Decimal::ONE);

    *running *= multiplier;

    round_money(delta)
}

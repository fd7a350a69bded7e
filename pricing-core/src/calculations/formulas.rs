//! Closed-form pricing formulas.
//!
//! Every function here is pure and total: instead of failing on missing,
//! zero, or out-of-range input it returns a neutral value (`0.0`, the input
//! price, or `f64::INFINITY` where a quantity is unbounded).
//!
//! # Absent values
//!
//! A value of `0.0` or `NaN` counts as "not supplied" for the guard checks.
//! This means a genuine zero cost is indistinguishable from a missing one,
//! which is the behaviour downstream reports depend on. Callers holding an
//! `Option<f64>` should pass `value.unwrap_or_default()`.
//!
//! | Function | Formula | Degenerate result |
//! |----------|---------|-------------------|
//! | [`margin`] | (price − cost) / price | 0 |
//! | [`price_from_margin`] | cost / (1 − margin) | 0 |
//! | [`markup_pct`] | (price − cost) / cost | 0 |
//! | [`price_from_markup`] | cost × (1 + markup) | 0 |
//! | [`break_even_volume`] | fixed / (price − var) | +∞ |
//! | [`break_even_price`] | var + fixed / volume | 0 |
//! | [`profit`] | (price − cost) × volume | 0 |
//! | [`revenue`] | price × volume | 0 |
//! | [`total_cost`] | fixed + var × volume | 0 |
//! | [`average_cost`] | fixed / volume + var | 0 |
//! | [`roi`] | profit / investment | 0 |
//! | [`payback_period`] | investment / annual profit | +∞ |
//! | [`elasticity`] | \|%ΔQ / %ΔP\| | 0 |
//! | [`optimal_price`] | price × e / (e − 1) | price |
//! | [`weighted_average`] | Σ vᵢwᵢ / Σ wᵢ | 0 |
//! | [`pct_change`] | (new − base) / base | 0 |
//! | [`pct_difference`] | \|a − b\| / mean(\|a\|, \|b\|) | 0 |

/// Returns `true` when `value` should be treated as "not supplied".
#[inline]
pub fn is_absent(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

fn any_absent(values: &[f64]) -> bool {
    values.iter().copied().any(is_absent)
}

/// Gross margin as a fraction of price.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::margin;
///
/// assert_eq!(margin(100.0, 60.0), 0.4);
/// assert_eq!(margin(0.0, 60.0), 0.0);
/// assert_eq!(margin(100.0, 0.0), 0.0); // zero cost counts as absent
/// ```
pub fn margin(
    price: f64,
    cost: f64,
) -> f64 {
    if any_absent(&[price, cost]) || price <= 0.0 {
        return 0.0;
    }
    (price - cost) / price
}

/// Price that yields `margin` on top of `cost`.
///
/// A margin of `0.0` is a valid input and returns `cost` unchanged.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::price_from_margin;
///
/// assert_eq!(price_from_margin(60.0, 0.4), 100.0);
/// assert_eq!(price_from_margin(60.0, 1.0), 0.0);
/// ```
pub fn price_from_margin(
    cost: f64,
    margin: f64,
) -> f64 {
    if is_absent(cost) || cost <= 0.0 || margin.is_nan() || margin >= 1.0 {
        return 0.0;
    }
    cost / (1.0 - margin)
}

/// Markup over cost as a fraction of cost.
pub fn markup_pct(
    price: f64,
    cost: f64,
) -> f64 {
    if any_absent(&[price, cost]) || cost <= 0.0 {
        return 0.0;
    }
    (price - cost) / cost
}

/// Price obtained by applying `markup_pct` to `cost`.
///
/// A zero markup counts as absent and yields `0.0`, not `cost`.
pub fn price_from_markup(
    cost: f64,
    markup_pct: f64,
) -> f64 {
    if any_absent(&[cost, markup_pct]) || cost <= 0.0 {
        return 0.0;
    }
    cost * (1.0 + markup_pct)
}

/// Units needed to cover `fixed` costs at the given contribution per unit.
///
/// Unbounded (`f64::INFINITY`) when each sale does not contribute anything.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::break_even_volume;
///
/// assert_eq!(break_even_volume(1000.0, 15.0, 5.0), 100.0);
/// assert!(break_even_volume(1000.0, 5.0, 5.0).is_infinite());
/// ```
pub fn break_even_volume(
    fixed: f64,
    price: f64,
    var_cost: f64,
) -> f64 {
    if any_absent(&[fixed, price, var_cost]) || price <= var_cost {
        return f64::INFINITY;
    }
    fixed / (price - var_cost)
}

/// Unit price needed to break even at `volume` units.
pub fn break_even_price(
    fixed: f64,
    volume: f64,
    var_cost: f64,
) -> f64 {
    if any_absent(&[fixed, volume, var_cost]) || volume <= 0.0 {
        return 0.0;
    }
    var_cost + fixed / volume
}

pub fn profit(
    price: f64,
    cost: f64,
    volume: f64,
) -> f64 {
    if any_absent(&[price, cost, volume]) {
        return 0.0;
    }
    (price - cost) * volume
}

pub fn revenue(
    price: f64,
    volume: f64,
) -> f64 {
    if any_absent(&[price, volume]) {
        return 0.0;
    }
    price * volume
}

pub fn total_cost(
    fixed: f64,
    var_cost: f64,
    volume: f64,
) -> f64 {
    if any_absent(&[fixed, var_cost, volume]) {
        return 0.0;
    }
    fixed + var_cost * volume
}

/// Fully loaded cost per unit at `volume` units.
pub fn average_cost(
    fixed: f64,
    var_cost: f64,
    volume: f64,
) -> f64 {
    if any_absent(&[fixed, var_cost, volume]) || volume <= 0.0 {
        return 0.0;
    }
    fixed / volume + var_cost
}

/// Return on investment as a fraction.
pub fn roi(
    profit: f64,
    investment: f64,
) -> f64 {
    if any_absent(&[profit, investment]) || investment <= 0.0 {
        return 0.0;
    }
    profit / investment
}

/// Years needed to recover `investment`; unbounded if the business never
/// turns a profit.
pub fn payback_period(
    investment: f64,
    annual_profit: f64,
) -> f64 {
    if any_absent(&[investment, annual_profit]) || annual_profit <= 0.0 {
        return f64::INFINITY;
    }
    investment / annual_profit
}

/// Price elasticity of demand (absolute value).
pub fn elasticity(
    pct_change_quantity: f64,
    pct_change_price: f64,
) -> f64 {
    if any_absent(&[pct_change_quantity, pct_change_price]) {
        return 0.0;
    }
    (pct_change_quantity / pct_change_price).abs()
}

/// Revenue-maximising price for constant elasticity demand.
///
/// Inelastic demand (`elasticity <= 1`) has no finite optimum, so the current
/// price is returned as is.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::optimal_price;
///
/// assert_eq!(optimal_price(10.0, 2.0), 20.0);
/// assert_eq!(optimal_price(10.0, 0.8), 10.0);
/// ```
pub fn optimal_price(
    price: f64,
    elasticity: f64,
) -> f64 {
    if any_absent(&[price, elasticity]) || elasticity <= 1.0 {
        return price;
    }
    price * elasticity / (elasticity - 1.0)
}

/// Weighted mean of `values`.
///
/// Returns `0.0` when the slices differ in length, are empty, or the weights
/// sum to zero.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::weighted_average;
///
/// assert_eq!(weighted_average(&[10.0, 20.0], &[1.0, 3.0]), 17.5);
/// assert_eq!(weighted_average(&[], &[]), 0.0);
/// assert_eq!(weighted_average(&[5.0], &[0.0]), 0.0);
/// ```
pub fn weighted_average(
    values: &[f64],
    weights: &[f64],
) -> f64 {
    if values.is_empty() || values.len() != weights.len() {
        return 0.0;
    }
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum == 0.0 {
        return 0.0;
    }
    let weighted: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    weighted / weight_sum
}

/// Relative change from `base` to `new`.
pub fn pct_change(
    base: f64,
    new: f64,
) -> f64 {
    if is_absent(base) {
        return 0.0;
    }
    (new - base) / base
}

/// Symmetric percentage difference between two values.
///
/// # Examples
///
/// ```
/// use pricing_core::calculations::formulas::pct_difference;
///
/// assert_eq!(pct_difference(100.0, 150.0), 0.4);
/// assert_eq!(pct_difference(0.0, 150.0), 0.0);
/// ```
pub fn pct_difference(
    a: f64,
    b: f64,
) -> f64 {
    if a == 0.0 || b == 0.0 {
        return 0.0;
    }
    (a - b).abs() / ((a.abs() + b.abs()) / 2.0)
}

//! Properties that must hold for every calculation, checked over a grid of
//! requests against a small but irregular market table.

use std::sync::Arc;

use crop_core::calculations::common::round_half_up;
use crop_core::calculations::{PricingCalculator, TOP_STATES_LIMIT};
use crop_core::models::{CalculationRequest, MspTable, ReferenceData, StatePriceTable, StatePrices};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference() -> ReferenceData {
    let msp: MspTable = [
        ("Gram".to_string(), dec!(5875)),
        ("Tomato".to_string(), dec!(3139.63)),
    ]
    .into_iter()
    .collect();

    let gram: StatePrices = [
        ("Rajasthan".to_string(), Some(dec!(5900))),
        ("Maharashtra".to_string(), Some(dec!(6120.25))),
        ("Karnataka".to_string(), None),
        ("Madhya Pradesh".to_string(), Some(dec!(6120.25))),
        ("Gujarat".to_string(), Some(dec!(5400))),
        ("Uttar Pradesh".to_string(), Some(dec!(5999.99))),
    ]
    .into_iter()
    .collect();

    let tomato: StatePrices = [
        ("Andhra Pradesh".to_string(), Some(dec!(1200))),
        ("Odisha".to_string(), None),
    ]
    .into_iter()
    .collect();

    let mut state_prices = StatePriceTable::new();
    state_prices.insert("Gram", gram);
    state_prices.insert("Tomato", tomato);
    ReferenceData::new(msp, state_prices)
}

fn requests() -> Vec<CalculationRequest> {
    let mut requests = Vec::new();
    for crop in ["Gram", "Tomato", "Jute"] {
        for (cost, quantity) in [
            (dec!(0), dec!(1)),
            (dec!(10000), dec!(500)),
            (dec!(987.65), dec!(3)),
            (dec!(250000), dec!(12345.678)),
        ] {
            for profit in [dec!(0), dec!(7.5), dec!(33.333), dec!(150)] {
                for state in [None, Some("Gujarat"), Some("Odisha"), Some("Kerala")] {
                    requests.push(CalculationRequest {
                        crop: crop.to_string(),
                        total_cost: cost,
                        total_quantity_kg: quantity,
                        profit_percent: profit,
                        selected_state: state.map(str::to_string),
                    });
                }
            }
        }
    }
    requests
}

#[test]
fn total_revenue_is_required_price_times_quantity() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        let cost_per_kg = request.total_cost / request.total_quantity_kg;
        let required = cost_per_kg * (Decimal::ONE + request.profit_percent / dec!(100));
        assert_eq!(
            result.total_revenue,
            round_half_up(required * request.total_quantity_kg),
            "{request:?}"
        );
    }
}

#[test]
fn required_price_never_below_cost_for_non_negative_profit() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        assert!(
            result.required_price_per_kg >= result.cost_per_kg,
            "{request:?}"
        );
    }
}

#[test]
fn state_revenues_cover_exactly_the_priced_states() {
    let data = reference();
    let calculator = PricingCalculator::new(Arc::new(data.clone()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        let expected: Vec<&str> = data
            .state_prices
            .get(&request.crop)
            .map(|prices| prices.priced().map(|(state, _)| state).collect())
            .unwrap_or_default();
        let actual: Vec<&str> = result
            .state_revenues
            .iter()
            .map(|r| r.state.as_str())
            .collect();
        assert_eq!(actual, expected, "{request:?}");
    }
}

#[test]
fn best_state_is_one_of_the_revenue_states() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        match &result.best_state {
            Some(best) => assert!(
                result.state_revenues.iter().any(|r| &r.state == best),
                "{request:?}"
            ),
            None => assert!(result.state_revenues.is_empty(), "{request:?}"),
        }
    }
}

#[test]
fn top_states_are_bounded_and_descending() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        assert!(result.top_states.len() <= TOP_STATES_LIMIT);
        assert!(
            result
                .top_states
                .windows(2)
                .all(|pair| pair[0].revenue >= pair[1].revenue),
            "{request:?}"
        );
        if let (Some(first), Some(best)) = (result.top_states.first(), &result.best_state) {
            assert_eq!(&first.state, best);
        }
    }
}

#[test]
fn outputs_are_already_rounded() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    for request in requests() {
        let result = calculator.calculate(&request).unwrap();

        for value in [
            result.cost_per_kg,
            result.required_price_per_kg,
            result.total_revenue,
            result.msp_per_kg,
        ] {
            assert_eq!(round_half_up(value), value, "{request:?}");
        }
    }
}

#[test]
fn gram_tie_goes_to_first_listed_state() {
    let calculator = PricingCalculator::new(Arc::new(reference()));

    let result = calculator
        .calculate(&CalculationRequest {
            crop: "Gram".to_string(),
            total_cost: dec!(50000),
            total_quantity_kg: dec!(1000),
            profit_percent: dec!(20),
            selected_state: Some("Madhya Pradesh".to_string()),
        })
        .unwrap();

    assert_eq!(result.best_state.as_deref(), Some("Maharashtra"));
    let top: Vec<_> = result.top_states.iter().map(|r| r.state.as_str()).collect();
    assert_eq!(top, vec!["Maharashtra", "Madhya Pradesh", "Uttar Pradesh"]);
}

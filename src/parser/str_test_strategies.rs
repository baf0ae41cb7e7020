use proptest::prelude::*;


pub(crate) fn number_strategy() -> impl Strategy<Value = String> {
    (1u32..=1000).prop_map(|n| n.to_string())
}

pub(crate) fn decimal_strategy() -> impl Strategy<Value = String> {
    (1u32..=1000, 1u32..=99).prop_map(|(whole, frac)| format!("{whole}.{frac}"))
}

pub(crate) fn percent_strategy() -> impl Strategy<Value = String> {
    Just("%".to_string())
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = String> {
    (1u32..=100, 2u32..=100, prop_oneof!["d", "D"])
        .prop_map(|(count, sides, d)| format!("{count}{d}{sides}"))
}

pub(crate) fn dice_with_take_strategy() -> impl Strategy<Value = String> {
    (1u32..=100, 2u32..=100, prop_oneof!["h", "H", "l", "L"])
        .prop_flat_map(|(count, sides, mode)| {
            (
                Just(count),
                Just(sides),
                Just(mode),
                prop::option::of(1u32..=count),
            )
        })
        .prop_map(|(count, sides, mode, take)| match take {
            Some(take) => format!("{count}d{sides}{mode}{take}"),
            None => format!("{count}d{sides}{mode}"),
        })
}

pub(crate) fn parenthesized_strategy(
    inner: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({expr})"))
}

pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (
        left,
        prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")],
        right,
    )
        .prop_map(|(l, op, r)| format!("{l} {op} {r}"))
}

pub(crate) fn dice_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        number_strategy(),
        decimal_strategy(),
        percent_strategy(),
        dice_strategy(),
        dice_with_take_strategy(),
    ];

    leaf.prop_recursive(4, 32, 10, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}

/// Like [`dice_expression_strategy`] but dice-free and division-free, so
/// repeated evaluation is exactly reproducible (no NaN from `0 / 0`).
pub(crate) fn constant_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![number_strategy(), decimal_strategy()];

    leaf.prop_recursive(4, 32, 10, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            (
                inner.clone(),
                prop_oneof![Just("+"), Just("-"), Just("*")],
                inner
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        ]
    })
}

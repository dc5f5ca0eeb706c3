//! Property-based invariant checks
//!
//! Random action sequences against a fresh exchange must preserve the
//! structural invariants (share conservation, solvency, an uncrossed book),
//! and targeted properties pin down the reservation arithmetic.

use engine::{Exchange, SubmitRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;
use types::ids::{OrderId, SymbolId, UserId};
use types::numeric::Price;
use types::order::{OrderType, Side};
use types::user::Role;

fn limit(symbol_id: SymbolId, side: Side, price: u64, qty: u64) -> SubmitRequest {
    SubmitRequest {
        symbol_id,
        side,
        order_type: OrderType::Limit,
        price: Some(Decimal::from(price)),
        quantity: qty,
    }
}

fn market(symbol_id: SymbolId, side: Side, qty: u64) -> SubmitRequest {
    SubmitRequest {
        symbol_id,
        side,
        order_type: OrderType::Market,
        price: None,
        quantity: qty,
    }
}

#[derive(Debug, Clone)]
enum Action {
    LimitOrder { user: usize, side: Side, price: u64, qty: u64 },
    MarketOrder { user: usize, side: Side, qty: u64 },
    Cancel { user: usize, pick: usize },
    Mint { qty: u64 },
    Burn { qty: u64 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let side = prop_oneof![Just(Side::Buy), Just(Side::Sell)];
    prop_oneof![
        4 => (0..3usize, side.clone(), 1..60u64, 1..8u64)
            .prop_map(|(user, side, price, qty)| Action::LimitOrder { user, side, price, qty }),
        3 => (0..3usize, side, 1..8u64)
            .prop_map(|(user, side, qty)| Action::MarketOrder { user, side, qty }),
        2 => (0..3usize, 0..usize::MAX).prop_map(|(user, pick)| Action::Cancel { user, pick }),
        1 => (1..50u64).prop_map(|qty| Action::Mint { qty }),
        1 => (1..50u64).prop_map(|qty| Action::Burn { qty }),
    ]
}

/// Three accounts (the first is the manager holding the initial float of
/// 100 shares), one symbol
fn setup() -> (Exchange, Vec<UserId>, SymbolId) {
    let exchange = Exchange::new();
    let manager = exchange.register_user("manager", Role::Manager).unwrap().user_id;
    let alice = exchange.register_user("alice", Role::User).unwrap().user_id;
    let bob = exchange.register_user("bob", Role::User).unwrap().user_id;
    let symbol = exchange.create_symbol(&manager, "S").unwrap();
    exchange.mint(&manager, &symbol, 100).unwrap();
    (exchange, vec![manager, alice, bob], symbol)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Share conservation, solvency and the uncrossed book survive any
    /// sequence of submissions, cancellations, mints and burns.
    #[test]
    fn random_walk_preserves_invariants(actions in prop::collection::vec(action_strategy(), 1..60)) {
        let (exchange, users, symbol) = setup();
        let mut float: i64 = 100;
        let mut orders: Vec<OrderId> = Vec::new();

        for action in &actions {
            match action {
                Action::LimitOrder { user, side, price, qty } => {
                    if let Ok(outcome) = exchange.submit(users[*user], limit(symbol, *side, *price, *qty)) {
                        orders.push(outcome.order_id.expect("limit orders carry an id"));
                    }
                }
                Action::MarketOrder { user, side, qty } => {
                    let _ = exchange.submit(users[*user], market(symbol, *side, *qty));
                }
                Action::Cancel { user, pick } => {
                    if !orders.is_empty() {
                        let order_id = orders[pick % orders.len()];
                        let _ = exchange.cancel(users[*user], order_id);
                    }
                }
                Action::Mint { qty } => {
                    if exchange.mint(&users[0], &symbol, *qty).is_ok() {
                        float += *qty as i64;
                    }
                }
                Action::Burn { qty } => {
                    if exchange.burn(&users[0], &symbol, *qty).is_ok() {
                        float -= *qty as i64;
                    }
                }
            }

            // No user is ever overdrawn at rest
            for user in &users {
                prop_assert!(exchange.ledger().cash(user).unwrap() >= Decimal::ZERO);
            }

            // The book never rests crossed
            let snapshot = exchange.book_snapshot("S").unwrap();
            if let (Some((bid, _)), Some((ask, _))) =
                (snapshot.buy_orders.first(), snapshot.sell_orders.first())
            {
                prop_assert!(bid < ask, "book rests crossed: {} >= {}", bid, ask);
            }
        }

        // Fills move shares between accounts without creating or destroying
        // them; only mint and burn change the total.
        prop_assert_eq!(exchange.ledger().total_position(&symbol), float);

        // Reservations only ever move cash out of circulation, never print it
        let total_cash: Decimal = users.iter().map(|u| exchange.ledger().cash(u).unwrap()).sum();
        prop_assert!(total_cash <= Decimal::from(30_000));
    }

    /// The buyer's net spend is the sum of fill values, independent of how
    /// the order was filled and when the residual was cancelled.
    #[test]
    fn refund_independent_of_fill_pattern(
        price in 1..50u64,
        qty in 1..10u64,
        chunks in prop::collection::vec(1..4u64, 0..6),
    ) {
        let (exchange, users, symbol) = setup();
        let (manager, alice) = (users[0], users[1]);

        let outcome = exchange.submit(alice, limit(symbol, Side::Buy, price, qty)).unwrap();
        let order_id = outcome.order_id.unwrap();

        let mut filled = 0u64;
        for chunk in chunks {
            if exchange.submit(manager, market(symbol, Side::Sell, chunk)).is_ok() {
                filled += chunk.min(qty - filled);
            }
        }

        let _ = exchange.cancel(alice, order_id);

        let expected = Decimal::from(10_000) - Decimal::from(price) * Decimal::from(filled);
        prop_assert_eq!(exchange.ledger().cash(&alice).unwrap(), expected);
        prop_assert_eq!(exchange.ledger().position(&alice, &symbol), filled as i64);
    }

    /// Crossing your own resting order moves no net cash and no net shares,
    /// while still printing a trade at the maker's price.
    #[test]
    fn self_trade_is_cash_and_position_neutral(
        price in 1..50u64,
        qty in 1..10u64,
        sell_qty in 1..10u64,
    ) {
        let (exchange, users, symbol) = setup();
        let alice = users[1];

        let outcome = exchange.submit(alice, limit(symbol, Side::Buy, price, qty)).unwrap();
        let order_id = outcome.order_id.unwrap();

        let sell = sell_qty.min(qty);
        exchange.submit(alice, market(symbol, Side::Sell, sell)).unwrap();

        // Net position is zero; the residual reservation is all that is
        // missing from the balance, and cancelling returns it.
        prop_assert_eq!(exchange.ledger().position(&alice, &symbol), 0);
        let reserved = Decimal::from(price) * Decimal::from(qty - sell);
        prop_assert_eq!(exchange.ledger().cash(&alice).unwrap(), Decimal::from(10_000) - reserved);

        let trades = exchange.recent_trades("S", 20).unwrap();
        prop_assert!(trades[0].is_self_trade());
        prop_assert_eq!(trades[0].price, Price::from_u64(price));

        if qty > sell {
            exchange.cancel(alice, order_id).unwrap();
            prop_assert_eq!(exchange.ledger().cash(&alice).unwrap(), Decimal::from(10_000));
        }
    }

    /// Buying back your own resting short sell moves no net cash and no net
    /// shares either: the collateral consumed by the self-paid fill is
    /// released, and the residual reservation survives until cancel.
    #[test]
    fn short_sell_self_trade_is_cash_and_position_neutral(
        price in 1..50u64,
        qty in 1..10u64,
        buy_qty in 1..10u64,
    ) {
        let (exchange, users, symbol) = setup();
        let alice = users[1];

        // Alice owns nothing, so the whole order is short collateral
        let outcome = exchange.submit(alice, limit(symbol, Side::Sell, price, qty)).unwrap();
        let order_id = outcome.order_id.unwrap();

        let buy = buy_qty.min(qty);
        exchange.submit(alice, market(symbol, Side::Buy, buy)).unwrap();

        prop_assert_eq!(exchange.ledger().position(&alice, &symbol), 0);
        let reserved = Decimal::from(price) * Decimal::from(qty - buy);
        prop_assert_eq!(exchange.ledger().cash(&alice).unwrap(), Decimal::from(10_000) - reserved);

        let trades = exchange.recent_trades("S", 20).unwrap();
        prop_assert!(trades[0].is_self_trade());
        prop_assert_eq!(trades[0].price, Price::from_u64(price));

        if qty > buy {
            exchange.cancel(alice, order_id).unwrap();
            prop_assert_eq!(exchange.ledger().cash(&alice).unwrap(), Decimal::from(10_000));
        }
    }

    /// A crossing order always consumes the best-priced makers first, and
    /// within one price the earliest order id first.
    #[test]
    fn fills_follow_price_time_priority(
        asks in prop::collection::vec((1..6u64, 1..5u64), 2..12),
        take in 1..20u64,
    ) {
        let (exchange, users, symbol) = setup();
        let (manager, alice) = (users[0], users[1]);

        for (price, qty) in &asks {
            // Prices 10..60 keep the spend well inside the balance
            exchange.submit(manager, limit(symbol, Side::Sell, price * 10, *qty)).unwrap();
        }

        if exchange.submit(alice, market(symbol, Side::Buy, take)).is_ok() {
            let mut trades = exchange.recent_trades("S", 20).unwrap();
            trades.reverse(); // oldest first

            for pair in trades.windows(2) {
                let earlier = &pair[0];
                let later = &pair[1];
                prop_assert!(earlier.price <= later.price, "price priority violated");
                if earlier.price == later.price {
                    prop_assert!(
                        earlier.sell_order_id < later.sell_order_id,
                        "time priority violated within a level"
                    );
                }
            }
        }
    }
}

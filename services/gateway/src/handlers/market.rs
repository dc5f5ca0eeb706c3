use crate::error::AppError;
use crate::models::{BookSnapshotResponse, LevelView, TradeView};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use engine::RECENT_TRADES;
use types::numeric::{Price, Quantity};

pub async fn get_book(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<BookSnapshotResponse>, AppError> {
    let snapshot = state.exchange.book_snapshot(&ticker)?;

    let to_levels = |levels: Vec<(Price, Quantity)>| {
        levels
            .into_iter()
            .map(|(price, quantity)| LevelView {
                price,
                quantity: quantity.as_u64(),
            })
            .collect()
    };

    Ok(Json(BookSnapshotResponse {
        symbol: snapshot.symbol,
        last_price: snapshot.last_price,
        price_direction: snapshot.direction,
        buy_orders: to_levels(snapshot.buy_orders),
        sell_orders: to_levels(snapshot.sell_orders),
    }))
}

pub async fn get_trades(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Vec<TradeView>>, AppError> {
    let trades = state.exchange.recent_trades(&ticker, RECENT_TRADES)?;

    Ok(Json(
        trades
            .into_iter()
            .map(|trade| TradeView {
                price: trade.price,
                quantity: trade.quantity.as_u64(),
                taker_side: trade.taker_side,
                timestamp: trade.executed_at,
            })
            .collect(),
    ))
}

//! Wire DTOs
//!
//! Field names follow the existing wire contract: order responses and book
//! snapshots are camelCase, trade and profile fields are snake_case.

use engine::{FillSummary, SubmitStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{OrderId, SymbolId, UserId};
use types::numeric::Price;
use types::order::{OrderType, Side};
use types::symbol::PriceDirection;
use types::user::Role;

// ── Orders ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub symbol_id: u64,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: Option<Decimal>,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    #[serde(rename = "orderStatus")]
    pub order_status: SubmitStatus,
    #[serde(rename = "tradesExecuted")]
    pub trades_executed: Vec<FillSummary>,
    #[serde(rename = "orderId")]
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ── Market data ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LevelView {
    pub price: Price,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookSnapshotResponse {
    pub symbol: String,
    #[serde(rename = "lastPrice")]
    pub last_price: Option<Price>,
    #[serde(rename = "priceDirection")]
    pub price_direction: PriceDirection,
    #[serde(rename = "buyOrders")]
    pub buy_orders: Vec<LevelView>,
    #[serde(rename = "sellOrders")]
    pub sell_orders: Vec<LevelView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    pub price: Price,
    pub quantity: u64,
    pub taker_side: Side,
    pub timestamp: i64,
}

// ── Accounts ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionEntry {
    pub symbol_id: SymbolId,
    pub symbol: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub cash_balance: Decimal,
    pub positions: Vec<PositionEntry>,
}

// ── Admin ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSymbolRequest {
    pub ticker: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolCreatedResponse {
    pub symbol_id: SymbolId,
    pub ticker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MintRequest {
    pub quantity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BurnRequest {
    pub quantity: u64,
}

//! # Cart Reducer
//!
//! The authoritative view of the cart and the only code that changes it.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart State Transitions                            │
//! │                                                                         │
//! │  Operation        Dispatch event            Resolution event            │
//! │  ─────────        ──────────────            ────────────────            │
//! │                                                                         │
//! │  fetch   ───────► Started(Fetch) ─────┬──► Loaded(Fetch, snapshot)      │
//! │                                       └──► Failed(Fetch, msg)           │
//! │                                            (prior data untouched)       │
//! │                                                                         │
//! │  add     ───────► AddStarted(ticket) ─┬──► AddConfirmed(ticket, snap)   │
//! │                   item_count += 1     └──► AddRolledBack(ticket, msg)   │
//! │                   ticket = Pending         item_count -= 1 (floor 0)    │
//! │                                                                         │
//! │  update  ───────► Started(Update, p) ─┬──► Loaded(Update, p, snapshot)  │
//! │  remove           p marked busy       └──► Failed(Update, p, msg)       │
//! │                                                                         │
//! │  Local only: LineStaged, CountSet, Cleared                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Add Tickets
//! Every optimistic add gets a ticket. A ticket leaves `Pending` exactly
//! once; settling an unknown or already settled ticket is an error and
//! leaves the state untouched.
//!
//! ```text
//!              ┌──────────► Confirmed
//!   Pending ───┤
//!              └──────────► RolledBack
//! ```
//!
//! ## Usage
//! ```rust
//! use freshcart_core::cart::{CartEvent, CartState, TicketId};
//! use freshcart_core::CartSnapshot;
//!
//! let mut state = CartState::default();
//! let ticket = TicketId::new();
//!
//! state.apply(CartEvent::AddStarted { ticket, product_id: "p1".into() }).unwrap();
//! assert_eq!(state.item_count, 1);
//! assert!(state.is_loading());
//!
//! state.apply(CartEvent::AddRolledBack { ticket, message: "offline".into() }).unwrap();
//! assert_eq!(state.item_count, 0);
//! assert_eq!(state.last_error.as_deref(), Some("offline"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CartOp, CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, CartSnapshot};
use crate::TEMP_LINE_PREFIX;

// =============================================================================
// Add Tickets
// =============================================================================

/// Identity of one in-flight optimistic add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    pub fn new() -> Self {
        TicketId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an optimistic add stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Pending,
    Confirmed,
    RolledBack,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Ledger entry for one add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTicket {
    pub product_id: String,
    pub status: TicketStatus,
}

// =============================================================================
// Events
// =============================================================================

/// Everything that can happen to the cart.
///
/// Async operations emit one dispatch event and exactly one resolution
/// event. The local events have no server round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A fetch, update or remove was dispatched.
    Started {
        op: CartOp,
        product_id: Option<String>,
    },

    /// An optimistic add was dispatched.
    AddStarted { ticket: TicketId, product_id: String },

    /// A fetch, update or remove resolved with a snapshot.
    Loaded {
        op: CartOp,
        product_id: Option<String>,
        snapshot: CartSnapshot,
    },

    /// An optimistic add was accepted by the server.
    AddConfirmed {
        ticket: TicketId,
        snapshot: CartSnapshot,
    },

    /// An optimistic add was rejected.
    AddRolledBack { ticket: TicketId, message: String },

    /// A fetch, update or remove failed.
    Failed {
        op: CartOp,
        product_id: Option<String>,
        message: String,
    },

    /// A line was staged locally ahead of the server.
    ///
    /// Dispatched only by `CartStore::stage_line`, which the terminal app
    /// leaves unwired.
    LineStaged {
        product_id: String,
        title: Option<String>,
        unit_price: Option<Money>,
    },

    /// The badge count was set directly.
    CountSet(u32),

    /// Everything was reset (sign-out).
    Cleared,
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart as the screens see it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Operations dispatched but not yet resolved.
    pub in_flight: u32,

    /// Message of the most recent failure; cleared on every dispatch.
    pub last_error: Option<String>,

    pub item_count: u32,
    pub cart_id: Option<String>,
    pub items: Vec<CartItem>,
    pub total_price: Money,

    /// Ticket ledger of optimistic adds.
    pub pending_adds: BTreeMap<TicketId, AddTicket>,

    /// Products with an update or remove in flight, with how many.
    busy: BTreeMap<String, u32>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the parts of the cart that survive a restart.
    pub fn restored(cart_id: Option<String>, item_count: u32) -> Self {
        CartState {
            cart_id,
            item_count,
            ..Default::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether `product_id` has an update or remove in flight.
    pub fn is_busy(&self, product_id: &str) -> bool {
        self.busy.contains_key(product_id)
    }

    pub fn ticket_status(&self, ticket: TicketId) -> Option<TicketStatus> {
        self.pending_adds.get(&ticket).map(|t| t.status)
    }

    /// Number of adds still waiting on the server.
    pub fn pending_count(&self) -> usize {
        self.pending_adds
            .values()
            .filter(|t| t.status == TicketStatus::Pending)
            .count()
    }

    /// Finds the line holding `product_id`.
    pub fn line_for(&self, product_id: &str) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|l| l.product_id.as_deref() == Some(product_id))
    }

    /// Applies one event.
    ///
    /// ## Errors
    /// Ticket misuse (`UnknownTicket`, `DuplicateTicket`, `TicketSettled`).
    /// The state is unchanged when an error is returned.
    pub fn apply(&mut self, event: CartEvent) -> CoreResult<()> {
        match event {
            CartEvent::Started { product_id, .. } => {
                self.begin();
                if let Some(product_id) = product_id {
                    *self.busy.entry(product_id).or_insert(0) += 1;
                }
            }

            CartEvent::AddStarted { ticket, product_id } => {
                if self.pending_adds.contains_key(&ticket) {
                    return Err(CoreError::DuplicateTicket(ticket.as_uuid()));
                }
                self.begin();
                self.item_count += 1;
                self.pending_adds.insert(
                    ticket,
                    AddTicket {
                        product_id,
                        status: TicketStatus::Pending,
                    },
                );
            }

            CartEvent::Loaded {
                product_id,
                snapshot,
                ..
            } => {
                self.finish(product_id.as_deref());
                self.merge(snapshot);
            }

            CartEvent::AddConfirmed { ticket, snapshot } => {
                self.settle(ticket, TicketStatus::Confirmed)?;
                self.finish(None);
                self.merge(snapshot);
            }

            CartEvent::AddRolledBack { ticket, message } => {
                self.settle(ticket, TicketStatus::RolledBack)?;
                self.finish(None);
                self.item_count = self.item_count.saturating_sub(1);
                self.last_error = Some(message);
            }

            CartEvent::Failed {
                product_id,
                message,
                ..
            } => {
                self.finish(product_id.as_deref());
                self.last_error = Some(message);
            }

            CartEvent::LineStaged {
                product_id,
                title,
                unit_price,
            } => {
                self.items.push(CartItem {
                    cart_item_id: format!("{}{}", TEMP_LINE_PREFIX, Uuid::new_v4()),
                    product_id: Some(product_id),
                    title,
                    image_url: None,
                    unit_price,
                    quantity: 1,
                });
                self.item_count += 1;
                self.total_price += unit_price.unwrap_or_default();
            }

            CartEvent::CountSet(count) => {
                self.item_count = count;
            }

            CartEvent::Cleared => {
                *self = CartState::default();
            }
        }

        Ok(())
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.last_error = None;
    }

    fn finish(&mut self, product_id: Option<&str>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(product_id) = product_id {
            if let Some(count) = self.busy.get_mut(product_id) {
                *count -= 1;
                if *count == 0 {
                    self.busy.remove(product_id);
                }
            }
        }
    }

    /// Moves a pending ticket to `to`, leaving the state untouched on error.
    fn settle(&mut self, ticket: TicketId, to: TicketStatus) -> CoreResult<()> {
        let entry = self
            .pending_adds
            .get_mut(&ticket)
            .ok_or(CoreError::UnknownTicket(ticket.as_uuid()))?;
        if entry.status != TicketStatus::Pending {
            return Err(CoreError::TicketSettled {
                ticket: ticket.as_uuid(),
                current_status: entry.status.to_string(),
            });
        }
        entry.status = to;
        Ok(())
    }

    /// Snapshot overwrite. A snapshot without a cart id keeps the known one.
    fn merge(&mut self, snapshot: CartSnapshot) {
        if snapshot.cart_id.is_some() {
            self.cart_id = snapshot.cart_id;
        }
        self.item_count = snapshot.item_count;
        self.total_price = snapshot.total_price;
        self.items = snapshot.items;
    }
}

// =============================================================================
// Selectors
// =============================================================================
// Pure projections, recomputed on every read.

pub fn select_items(state: &CartState) -> &[CartItem] {
    &state.items
}

pub fn select_count(state: &CartState) -> u32 {
    state.item_count
}

pub fn select_total(state: &CartState) -> Money {
    state.total_price
}

pub fn select_cart_id(state: &CartState) -> Option<&str> {
    state.cart_id.as_deref()
}

/// Tab badge; hidden when the cart is empty.
pub fn select_badge(state: &CartState) -> Option<u32> {
    (state.item_count > 0).then_some(state.item_count)
}

// =============================================================================
// Unit Tests
// =============================================================================

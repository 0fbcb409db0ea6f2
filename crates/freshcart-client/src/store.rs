//! # Cart Store
//!
//! The async container around [`CartState`]. Every operation dispatches a
//! start event, awaits the collaborator, then applies exactly one
//! resolution event.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  token? ── no ──► CartError::AuthRequired (collaborator never called)   │
//! │    │                                                                    │
//! │   yes                                                                   │
//! │    ▼                                                                    │
//! │  lock ─► apply(Started | AddStarted) ─► unlock                          │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  [mutation gate when cart.serialize_mutations]                          │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  collaborator.await            (no lock held here)                      │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  lock ─► apply(Loaded | AddConfirmed | AddRolledBack | Failed) ─► unlock│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the gate, concurrent mutations resolve independently and the
//! last snapshot to arrive wins.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tracing::{debug, error, warn};

use freshcart_core::cart::{select_badge, select_count, select_total};
use freshcart_core::{
    AuthToken, CartError, CartEvent, CartItem, CartOp, CartSnapshot, CartState, Money, TicketId,
};

use crate::api::CartApi;
use crate::error::ClientError;

/// Cart state container.
pub struct CartStore<A: CartApi> {
    api: Arc<A>,
    state: Mutex<CartState>,
    gate: Option<AsyncMutex<()>>,
}

impl<A: CartApi> CartStore<A> {
    /// A store with an empty cart and last-write-wins ordering.
    pub fn new(api: Arc<A>) -> Self {
        Self::with_state(api, CartState::new(), false)
    }

    /// A store starting from `state`. With `serialize_mutations` at most one
    /// add, update or remove talks to the server at a time.
    pub fn with_state(api: Arc<A>, state: CartState, serialize_mutations: bool) -> Self {
        CartStore {
            api,
            state: Mutex::new(state),
            gate: serialize_mutations.then(|| AsyncMutex::new(())),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&CartState) -> R) -> R {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// A copy of the current state.
    pub fn state(&self) -> CartState {
        self.read(CartState::clone)
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.read(|s| s.items.clone())
    }

    pub fn count(&self) -> u32 {
        self.read(select_count)
    }

    pub fn total(&self) -> Money {
        self.read(select_total)
    }

    pub fn badge(&self) -> Option<u32> {
        self.read(select_badge)
    }

    pub fn cart_id(&self) -> Option<String> {
        self.read(|s| s.cart_id.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.read(CartState::is_loading)
    }

    pub fn is_busy(&self, product_id: &str) -> bool {
        self.read(|s| s.is_busy(product_id))
    }

    pub fn last_error(&self) -> Option<String> {
        self.read(|s| s.last_error.clone())
    }

    // =========================================================================
    // Async Operations
    // =========================================================================

    /// Replaces the cart with the server snapshot.
    ///
    /// On failure `last_error` is set and the previous contents stay.
    pub async fn fetch_cart(&self, token: Option<&AuthToken>) -> Result<(), CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        self.dispatch(CartEvent::Started {
            op: CartOp::Fetch,
            product_id: None,
        });

        debug!("Fetching cart");
        let result = self.api.fetch_cart_snapshot(token).await;
        self.resolve(CartOp::Fetch, None, result)
    }

    /// Adds one unit of `product_id`.
    ///
    /// The badge count goes up immediately. It is replaced by the server
    /// count on success and taken back down by one on failure.
    pub async fn add_to_cart(
        &self,
        product_id: &str,
        token: Option<&AuthToken>,
    ) -> Result<TicketId, CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        let ticket = TicketId::new();
        self.dispatch(CartEvent::AddStarted {
            ticket,
            product_id: product_id.to_string(),
        });

        let _permit = self.mutation_permit().await;
        debug!(%product_id, %ticket, "Adding to cart");

        match self.api.add_item(product_id, token).await {
            Ok(snapshot) => {
                self.dispatch(CartEvent::AddConfirmed { ticket, snapshot });
                Ok(ticket)
            }
            Err(err) => {
                warn!(%product_id, %ticket, error = %err, "Add to cart failed");
                let err = cart_error(CartOp::Add, &err);
                self.dispatch(CartEvent::AddRolledBack {
                    ticket,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Sets the quantity of `product_id` to `count`. Zero removes the line.
    pub async fn update_cart_item(
        &self,
        token: Option<&AuthToken>,
        product_id: &str,
        count: u32,
    ) -> Result<(), CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        if count == 0 {
            return self.remove_cart_item(Some(token), product_id).await;
        }

        self.dispatch(CartEvent::Started {
            op: CartOp::Update,
            product_id: Some(product_id.to_string()),
        });

        let _permit = self.mutation_permit().await;
        debug!(%product_id, count, "Updating cart item");
        let result = self.api.set_item_quantity(token, product_id, count).await;
        self.resolve(CartOp::Update, Some(product_id), result)
    }

    pub async fn remove_cart_item(
        &self,
        token: Option<&AuthToken>,
        product_id: &str,
    ) -> Result<(), CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        self.dispatch(CartEvent::Started {
            op: CartOp::Remove,
            product_id: Some(product_id.to_string()),
        });

        let _permit = self.mutation_permit().await;
        debug!(%product_id, "Removing cart item");
        let result = self.api.remove_item(token, product_id).await;
        self.resolve(CartOp::Remove, Some(product_id), result)
    }

    /// The minus control: removes the line at quantity 1, otherwise
    /// updates to one less.
    pub async fn decrease_quantity(
        &self,
        token: Option<&AuthToken>,
        product_id: &str,
    ) -> Result<(), CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        let quantity = self.quantity_of(CartOp::Update, product_id)?;
        if quantity <= 1 {
            self.remove_cart_item(Some(token), product_id).await
        } else {
            self.update_cart_item(Some(token), product_id, quantity - 1)
                .await
        }
    }

    /// The plus control.
    pub async fn increase_quantity(
        &self,
        token: Option<&AuthToken>,
        product_id: &str,
    ) -> Result<(), CartError> {
        let token = token.ok_or(CartError::AuthRequired)?;
        let quantity = self.quantity_of(CartOp::Update, product_id)?;
        self.update_cart_item(Some(token), product_id, quantity.saturating_add(1))
            .await
    }

    // =========================================================================
    // Local Operations
    // =========================================================================

    /// Shows a temporary line until the next snapshot replaces it.
    ///
    /// The terminal app does not call this. Its commands await the server
    /// reply before rendering, so a staged line would never be drawn; front
    /// ends that redraw while an add is in flight stage the line first.
    pub fn stage_line(&self, product_id: &str, title: Option<String>, unit_price: Option<Money>) {
        self.dispatch(CartEvent::LineStaged {
            product_id: product_id.to_string(),
            title,
            unit_price,
        });
    }

    pub fn set_count(&self, count: u32) {
        self.dispatch(CartEvent::CountSet(count));
    }

    /// Resets everything; runs on sign-out.
    pub fn clear(&self) {
        self.dispatch(CartEvent::Cleared);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn dispatch(&self, event: CartEvent) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = guard.apply(event) {
            error!(error = %e, "Cart event rejected");
        }
    }

    fn resolve(
        &self,
        op: CartOp,
        product_id: Option<&str>,
        result: Result<CartSnapshot, ClientError>,
    ) -> Result<(), CartError> {
        let product_id = product_id.map(str::to_string);
        match result {
            Ok(snapshot) => {
                debug!(%op, items = snapshot.items.len(), count = snapshot.item_count, "Cart snapshot received");
                self.dispatch(CartEvent::Loaded {
                    op,
                    product_id,
                    snapshot,
                });
                Ok(())
            }
            Err(err) => {
                warn!(%op, ?product_id, error = %err, "Cart operation failed");
                let err = cart_error(op, &err);
                self.dispatch(CartEvent::Failed {
                    op,
                    product_id,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn mutation_permit(&self) -> Option<AsyncMutexGuard<'_, ()>> {
        match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }

    fn quantity_of(&self, op: CartOp, product_id: &str) -> Result<u32, CartError> {
        self.read(|s| s.line_for(product_id).map(|line| line.quantity))
            .ok_or_else(|| {
                CartError::for_op(op, Some(format!("{} is not in the cart", product_id)))
            })
    }
}

fn cart_error(op: CartOp, err: &ClientError) -> CartError {
    CartError::for_op(op, err.server_message().map(str::to_string))
}

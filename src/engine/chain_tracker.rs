// ============================================================================
// Order Chain Tracker
// Resolves new/modify/fill messages onto linear order chains
// ============================================================================

use crate::analytics::VwapAccumulator;
use crate::domain::{
    ChainSummary, ConfigError, ExchangeMessage, Fill, ModifyOrder, NewOrder, OrderId, Side,
};
use crate::numeric::{NumericError, Price, Quantity};
use crate::utils::LruCache;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Reasons a well-formed message cannot be applied to the chains
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("order id {0} is already in use")]
    DuplicateOrderId(OrderId),

    #[error("order id {0} is not known")]
    UnknownOrder(OrderId),

    #[error("modify references {order_id} but the chain's current order is {current}")]
    StaleModify { order_id: OrderId, current: OrderId },

    #[error("chain {root} is fully filled")]
    ChainComplete { root: OrderId },

    #[error("order {order_id}: quantity must be positive")]
    InvalidQuantity { order_id: OrderId },

    #[error("order {order_id}: price must be positive, got {price}")]
    InvalidPrice { order_id: OrderId, price: Price },

    #[error("fill of {requested} on order {order_id} exceeds open quantity {open}")]
    Overfill {
        order_id: OrderId,
        requested: Quantity,
        open: Quantity,
    },

    #[error("fill on order {order_id} names symbol {got}, chain trades {expected}")]
    SymbolMismatch {
        order_id: OrderId,
        expected: String,
        got: String,
    },

    #[error("fill on order {order_id} names side {got}, chain is {expected}")]
    SideMismatch {
        order_id: OrderId,
        expected: Side,
        got: Side,
    },

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// What an applied message did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainUpdate {
    Opened {
        root: OrderId,
    },
    Modified {
        root: OrderId,
    },
    Filled {
        root: OrderId,
        open_quantity: Quantity,
        complete: bool,
    },
}

impl ChainUpdate {
    pub fn root(&self) -> OrderId {
        match *self {
            ChainUpdate::Opened { root }
            | ChainUpdate::Modified { root }
            | ChainUpdate::Filled { root, .. } => root,
        }
    }
}

#[derive(Debug, Clone)]
struct OrderChain {
    root: OrderId,
    current: OrderId,
    symbol: String,
    side: Side,
    limit_price: Price,
    open_quantity: Quantity,
    fills: VwapAccumulator,
}

impl OrderChain {
    fn is_complete(&self) -> bool {
        self.open_quantity == 0
    }

    fn summary(&self) -> ChainSummary {
        ChainSummary {
            root: self.root,
            current: self.current,
            symbol: self.symbol.clone(),
            side: self.side,
            limit_price: self.limit_price,
            open_quantity: self.open_quantity,
            filled_quantity: self.fills.total_quantity(),
            fill_count: self.fills.count(),
            average_price: self.fills.vwap(),
            complete: self.is_complete(),
        }
    }
}

/// Tracks every order chain seen in a message stream.
///
/// A chain is linear: each `modify` must reference the chain's current
/// order, whose id then becomes superseded. Fills may reference the current
/// id or any superseded id still held in the bounded superseded index; an
/// accepted fill refreshes that id. Root ids are never reused. A rejected
/// message leaves all state unchanged, including the eviction order.
pub struct OrderChainTracker {
    /// Chains in first-seen order
    chains: Vec<OrderChain>,
    /// Root id -> chain slot
    roots: HashMap<OrderId, usize>,
    /// Current order id -> chain slot
    current: HashMap<OrderId, usize>,
    /// Replaced order ids -> chain slot, least recently used evicted first
    superseded: LruCache<OrderId, usize>,
}

impl OrderChainTracker {
    pub fn new(superseded_capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            chains: Vec::new(),
            roots: HashMap::new(),
            current: HashMap::new(),
            superseded: LruCache::new(superseded_capacity)?,
        })
    }

    pub fn apply(&mut self, message: &ExchangeMessage) -> Result<ChainUpdate, ChainError> {
        match message {
            ExchangeMessage::New(m) => self.open(m),
            ExchangeMessage::Modify(m) => self.modify(m),
            ExchangeMessage::Fill(m) => self.fill(m),
        }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Summary of the chain opened by `root`
    pub fn chain(&self, root: OrderId) -> Option<ChainSummary> {
        self.roots.get(&root).map(|&slot| self.chains[slot].summary())
    }

    /// All chains in first-seen order
    pub fn chains(&self) -> impl Iterator<Item = ChainSummary> + '_ {
        self.chains.iter().map(OrderChain::summary)
    }

    /// Root of the chain `order_id` belongs to, if it is still resolvable
    pub fn root_of(&self, order_id: OrderId) -> Option<OrderId> {
        self.current
            .get(&order_id)
            .or_else(|| self.superseded.peek(&order_id))
            .map(|&slot| self.chains[slot].root)
    }

    // ========================================================================
    // Message handlers
    // ========================================================================

    fn open(&mut self, m: &NewOrder) -> Result<ChainUpdate, ChainError> {
        self.ensure_unused(m.order_id)?;
        check_terms(m.order_id, m.quantity, m.price)?;

        let slot = self.chains.len();
        self.chains.push(OrderChain {
            root: m.order_id,
            current: m.order_id,
            symbol: m.symbol.clone(),
            side: m.side,
            limit_price: m.price,
            open_quantity: m.quantity,
            fills: VwapAccumulator::new(),
        });
        self.roots.insert(m.order_id, slot);
        self.current.insert(m.order_id, slot);

        tracing::debug!(root = %m.order_id, symbol = %m.symbol, "chain opened");
        Ok(ChainUpdate::Opened { root: m.order_id })
    }

    fn modify(&mut self, m: &ModifyOrder) -> Result<ChainUpdate, ChainError> {
        self.ensure_unused(m.order_id)?;

        let slot = match self.current.get(&m.prev_order_id) {
            Some(&slot) => slot,
            None => {
                return Err(match self.superseded.peek(&m.prev_order_id) {
                    Some(&slot) => ChainError::StaleModify {
                        order_id: m.prev_order_id,
                        current: self.chains[slot].current,
                    },
                    None => ChainError::UnknownOrder(m.prev_order_id),
                });
            },
        };

        let chain = &self.chains[slot];
        if chain.is_complete() {
            return Err(ChainError::ChainComplete { root: chain.root });
        }
        check_terms(m.order_id, m.quantity, m.price)?;
        if let Some(symbol) = &m.symbol {
            if *symbol != chain.symbol {
                return Err(ChainError::SymbolMismatch {
                    order_id: m.order_id,
                    expected: chain.symbol.clone(),
                    got: symbol.clone(),
                });
            }
        }

        let chain = &mut self.chains[slot];
        chain.current = m.order_id;
        chain.open_quantity = m.quantity;
        chain.limit_price = m.price;
        let root = chain.root;

        self.current.remove(&m.prev_order_id);
        self.current.insert(m.order_id, slot);
        if let Some((evicted, _)) = self.superseded.put(m.prev_order_id, slot) {
            tracing::debug!(order_id = %evicted, "superseded order id evicted");
        }

        tracing::debug!(root = %root, order_id = %m.order_id, prev = %m.prev_order_id, "chain modified");
        Ok(ChainUpdate::Modified { root })
    }

    fn fill(&mut self, m: &Fill) -> Result<ChainUpdate, ChainError> {
        let (slot, superseded) = match self.current.get(&m.order_id) {
            Some(&slot) => (slot, false),
            None => match self.superseded.peek(&m.order_id) {
                Some(&slot) => (slot, true),
                None => return Err(ChainError::UnknownOrder(m.order_id)),
            },
        };
        check_terms(m.order_id, m.quantity, m.price)?;

        let chain = &mut self.chains[slot];
        if let Some(symbol) = &m.symbol {
            if *symbol != chain.symbol {
                return Err(ChainError::SymbolMismatch {
                    order_id: m.order_id,
                    expected: chain.symbol.clone(),
                    got: symbol.clone(),
                });
            }
        }
        if let Some(side) = m.side {
            if side != chain.side {
                return Err(ChainError::SideMismatch {
                    order_id: m.order_id,
                    expected: chain.side,
                    got: side,
                });
            }
        }
        if m.quantity > chain.open_quantity {
            return Err(ChainError::Overfill {
                order_id: m.order_id,
                requested: m.quantity,
                open: chain.open_quantity,
            });
        }

        chain.fills.add(m.price, m.quantity)?;
        chain.open_quantity -= m.quantity;
        if superseded {
            // Only an accepted fill refreshes the superseded id
            self.superseded.get(&m.order_id);
        }
        let chain = &self.chains[slot];

        tracing::debug!(
            root = %chain.root,
            order_id = %m.order_id,
            quantity = m.quantity,
            price = %m.price,
            open = chain.open_quantity,
            "fill applied"
        );
        Ok(ChainUpdate::Filled {
            root: chain.root,
            open_quantity: chain.open_quantity,
            complete: chain.is_complete(),
        })
    }

    /// Roots stay reserved even after their id leaves the superseded index,
    /// so `roots` always maps a root to exactly one chain.
    fn ensure_unused(&self, order_id: OrderId) -> Result<(), ChainError> {
        if self.current.contains_key(&order_id)
            || self.superseded.contains(&order_id)
            || self.roots.contains_key(&order_id)
        {
            return Err(ChainError::DuplicateOrderId(order_id));
        }
        Ok(())
    }
}

fn check_terms(order_id: OrderId, quantity: Quantity, price: Price) -> Result<(), ChainError> {
    if quantity == 0 {
        return Err(ChainError::InvalidQuantity { order_id });
    }
    if price <= Decimal::ZERO {
        return Err(ChainError::InvalidPrice { order_id, price });
    }
    Ok(())
}

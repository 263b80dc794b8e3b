use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct NumberInStock(i32);

impl NumberInStock {
    pub fn new(amount: impl Into<i32>) -> Self {
        Self(amount.into())
    }

    /// `None` when the change would take the counter below zero.
    pub fn apply(self, delta: StockDelta) -> Option<Self> {
        let next = self.0.checked_add(delta.amount())?;
        (next >= 0).then_some(Self(next))
    }
}

/// The only two ways stock moves once a movie exists.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StockDelta {
    Decrement,
    Increment,
}

impl StockDelta {
    pub fn amount(&self) -> i32 {
        match self {
            StockDelta::Decrement => -1,
            StockDelta::Increment => 1,
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            StockDelta::Decrement => StockDelta::Increment,
            StockDelta::Increment => StockDelta::Decrement,
        }
    }
}

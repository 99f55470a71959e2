//! Typed UI signals exchanged between the navigation shell and the views.

use serde::{Deserialize, Serialize};

use crate::bus::{EventBus, Subscription};
use crate::in_memory_bus::{InMemoryBusError, InMemoryEventBus};

/// Fire-and-forget notifications from the shell to a specific view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum UiSignal {
    /// Open the product-creation form in the inventory view (empty form, no edit target).
    OpenProductForm,
}

/// Signal channel owned by the shell. Views call [`SignalBus::subscribe`] once.
#[derive(Debug, Default)]
pub struct SignalBus {
    inner: InMemoryEventBus<UiSignal>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, signal: UiSignal) -> Result<(), InMemoryBusError> {
        tracing::debug!(?signal, "ui signal");
        self.inner.publish(signal)
    }

    /// "Quick add" from the header: switch to inventory and open the product form.
    pub fn request_product_form(&self) -> Result<(), InMemoryBusError> {
        self.send(UiSignal::OpenProductForm)
    }

    pub fn subscribe(&self) -> Subscription<UiSignal> {
        self.inner.subscribe()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, CustomerId, DomainError, Price, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Price captured when the product was first added.
    pub unit_price: Price,
}

impl CartLine {
    pub fn line_total(&self) -> Price {
        self.unit_price
            .checked_mul(self.quantity)
            .unwrap_or(Price::from_minor(u64::MAX))
    }
}

/// Aggregate root: a shopper's cart. At most one line per product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    customer_id: CustomerId,
    lines: Vec<CartLine>,
    last_changed: Option<DateTime<Utc>>,
    version: u64,
}

impl Cart {
    pub fn empty(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            lines: Vec::new(),
            last_changed: None,
            version: 0,
        }
    }

    /// When the most recent event was applied; `None` for a fresh cart.
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.last_changed
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Lines in the order products were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}

impl AggregateRoot for Cart {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.customer_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddToCart (insert the product, or increase its quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCart {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Price,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity (set an existing line's quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveFromCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFromCart {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddToCart(AddToCart),
    UpdateQuantity(UpdateQuantity),
    RemoveFromCart(RemoveFromCart),
}

/// Event: ItemAdded (a new line was inserted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Price,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityIncreased (an add hit an existing line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityIncreased {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub added: u32,
    pub new_quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdated {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityIncreased(QuantityIncreased),
    QuantityUpdated(QuantityUpdated),
    ItemRemoved(ItemRemoved),
}

impl CartEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::QuantityIncreased(_) => "cart.item.quantity_increased",
            CartEvent::QuantityUpdated(_) => "cart.item.quantity_updated",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityIncreased(e) => e.occurred_at,
            CartEvent::QuantityUpdated(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.lines.push(CartLine {
                    product_id: e.product_id,
                    quantity: e.quantity,
                    unit_price: e.unit_price,
                });
            }
            CartEvent::QuantityIncreased(e) => {
                if let Some(line) = self.line_mut(e.product_id) {
                    line.quantity = e.new_quantity;
                }
            }
            CartEvent::QuantityUpdated(e) => {
                if let Some(line) = self.line_mut(e.product_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.lines.retain(|l| l.product_id != e.product_id);
            }
        }

        self.last_changed = Some(event.occurred_at());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            CartCommand::AddToCart(cmd) => self.handle_add(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update(cmd),
            CartCommand::RemoveFromCart(cmd) => self.handle_remove(cmd),
        }?;
        tracing::debug!(
            customer_id = %self.customer_id,
            events = ?events.iter().map(CartEvent::event_type).collect::<Vec<_>>(),
            "cart command accepted"
        );
        Ok(events)
    }
}

impl Cart {
    fn ensure_customer(&self, customer_id: CustomerId) -> Result<(), DomainError> {
        if self.customer_id != customer_id {
            return Err(DomainError::invariant("customer mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddToCart) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_customer(cmd.customer_id)?;
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        match self.line(cmd.product_id) {
            Some(existing) => {
                let new_quantity = existing
                    .quantity
                    .checked_add(cmd.quantity)
                    .ok_or_else(|| DomainError::validation("quantity overflow"))?;
                Ok(vec![CartEvent::QuantityIncreased(QuantityIncreased {
                    customer_id: cmd.customer_id,
                    product_id: cmd.product_id,
                    added: cmd.quantity,
                    new_quantity,
                    occurred_at: cmd.occurred_at,
                })])
            }
            None => Ok(vec![CartEvent::ItemAdded(ItemAdded {
                customer_id: cmd.customer_id,
                product_id: cmd.product_id,
                quantity: cmd.quantity,
                unit_price: cmd.unit_price,
                occurred_at: cmd.occurred_at,
            })]),
        }
    }

    fn handle_update(&self, cmd: &UpdateQuantity) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_customer(cmd.customer_id)?;
        if cmd.quantity == 0 {
            return Err(DomainError::validation(
                "quantity must be at least 1; remove the item instead",
            ));
        }
        if self.line(cmd.product_id).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::QuantityUpdated(QuantityUpdated {
            customer_id: cmd.customer_id,
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveFromCart) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_customer(cmd.customer_id)?;
        if self.line(cmd.product_id).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            customer_id: cmd.customer_id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

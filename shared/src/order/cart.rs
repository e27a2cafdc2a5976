//! Cart pricing
//!
//! The storefront keeps a cart client-side; checkout rebuilds it here from
//! the restaurant's own menu so the stored order never trusts client prices.

use crate::error::{AppError, ErrorCode};
use crate::models::{CheckoutLine, MenuItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Largest quantity accepted on a single checkout line
pub const MAX_LINE_QUANTITY: i32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart is empty")]
    Empty,
    #[error("menu item {0} does not exist")]
    UnknownItem(i64),
    #[error("{name} is not available")]
    Unavailable { id: i64, name: String },
    #[error("quantity {quantity} for menu item {id} must be between 1 and 99")]
    InvalidQuantity { id: i64, quantity: i32 },
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let (code, id) = match &err {
            CartError::Empty => (ErrorCode::OrderEmpty, None),
            CartError::UnknownItem(id) => (ErrorCode::MenuItemNotFound, Some(*id)),
            CartError::Unavailable { id, .. } => (ErrorCode::MenuItemUnavailable, Some(*id)),
            CartError::InvalidQuantity { id, .. } => (ErrorCode::InvalidQuantity, Some(*id)),
        };
        let app = AppError::with_message(code, err.to_string());
        match id {
            Some(id) => app.with_detail("menu_item_id", id),
            None => app,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`, opening a line at quantity 1 if needed
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: 1,
                notes: None,
            }),
        }
    }

    /// Change a line's quantity by `delta`. Clamps at zero and drops the
    /// line when it reaches zero. Unknown ids are ignored.
    pub fn update_quantity(&mut self, menu_item_id: i64, delta: i32) {
        let Some(pos) = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)
        else {
            return;
        };
        let line = &mut self.lines[pos];
        let next = (i64::from(line.quantity) + i64::from(delta)).max(0);
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        if line.quantity == 0 {
            self.lines.remove(pos);
        }
    }

    /// Sum of unit price x quantity
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of units across all lines
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Build a priced cart from checkout lines against the restaurant menu.
    ///
    /// Each request line stays its own cart line so per-line notes survive.
    pub fn price(requested: &[CheckoutLine], menu: &[MenuItem]) -> Result<Cart, CartError> {
        if requested.is_empty() {
            return Err(CartError::Empty);
        }
        let by_id: HashMap<i64, &MenuItem> = menu.iter().map(|m| (m.id, m)).collect();

        let mut lines = Vec::with_capacity(requested.len());
        for req in requested {
            if !(1..=MAX_LINE_QUANTITY).contains(&req.quantity) {
                return Err(CartError::InvalidQuantity {
                    id: req.menu_item_id,
                    quantity: req.quantity,
                });
            }
            let item = by_id
                .get(&req.menu_item_id)
                .ok_or(CartError::UnknownItem(req.menu_item_id))?;
            if !item.is_available {
                return Err(CartError::Unavailable {
                    id: item.id,
                    name: item.name.clone(),
                });
            }
            lines.push(CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: req.quantity.unsigned_abs(),
                notes: req
                    .notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from),
            });
        }
        Ok(Cart { lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, cents: i64, available: bool) -> MenuItem {
        MenuItem {
            id,
            restaurant_id: 1,
            category_id: None,
            name: name.to_string(),
            description: None,
            price: Decimal::new(cents, 2),
            image_url: None,
            is_available: available,
            created_at: 0,
        }
    }

    fn line(id: i64, quantity: i32) -> CheckoutLine {
        CheckoutLine {
            menu_item_id: id,
            quantity,
            notes: None,
        }
    }

    #[test]
    fn test_add_and_total() {
        let pizza = item(1, "Pizza", 1250, true);
        let cola = item(2, "Cola", 300, true);
        let mut cart = Cart::new();
        cart.add(&pizza);
        cart.add(&pizza);
        cart.add(&cola);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), Decimal::new(2800, 2));
    }

    #[test]
    fn test_update_quantity_down_to_removal() {
        let pizza = item(1, "Pizza", 1000, true);
        let mut cart = Cart::new();
        cart.add(&pizza);
        cart.update_quantity(1, 2);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), Decimal::new(3000, 2));

        cart.update_quantity(1, -1);
        assert_eq!(cart.total(), Decimal::new(2000, 2));

        cart.update_quantity(1, -10);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_update_unknown_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(&item(1, "Pizza", 1000, true));
        cart.update_quantity(99, 5);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_price_uses_menu_prices() {
        let menu = vec![item(1, "Pizza", 1250, true), item(2, "Cola", 300, true)];
        let cart = Cart::price(&[line(1, 2), line(2, 1)], &menu).unwrap();
        assert_eq!(cart.total(), Decimal::new(2800, 2));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_price_rejections() {
        let menu = vec![item(1, "Pizza", 1250, true), item(2, "Soup", 500, false)];
        assert_eq!(Cart::price(&[], &menu), Err(CartError::Empty));
        assert_eq!(
            Cart::price(&[line(3, 1)], &menu),
            Err(CartError::UnknownItem(3))
        );
        assert_eq!(
            Cart::price(&[line(2, 1)], &menu),
            Err(CartError::Unavailable {
                id: 2,
                name: "Soup".to_string()
            })
        );
        assert_eq!(
            Cart::price(&[line(1, 0)], &menu),
            Err(CartError::InvalidQuantity { id: 1, quantity: 0 })
        );
        assert_eq!(
            Cart::price(&[line(1, 100)], &menu),
            Err(CartError::InvalidQuantity {
                id: 1,
                quantity: 100
            })
        );
    }

    #[test]
    fn test_cart_error_codes() {
        let err: AppError = CartError::Empty.into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        let err: AppError = CartError::UnknownItem(7).into();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
        assert_eq!(err.details.unwrap()["menu_item_id"], 7);
    }
}

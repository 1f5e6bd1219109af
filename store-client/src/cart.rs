//! Cart state container
//!
//! Client-session-scoped collection of cart lines keyed by
//! `(product_id, size)`. Lines with the same key merge by adding
//! quantities; different sizes of the same product stay distinct. Every
//! mutation is a pure reducer over the in-memory state (no I/O), so the
//! container is unit-testable without any UI harness.
//!
//! Stock validation, if any, is external to this layer.

/// Flat shipping fee, applied only when the cart is non-empty
pub const SHIPPING_FEE: f64 = 19.9;

/// One cart line: (product, size, quantity) plus display snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: f64,
    pub image: String,
    pub size: String,
    pub team: String,
    pub quantity: i64,
}

impl CartLine {
    /// New line with quantity 1
    pub fn new(
        product_id: i64,
        name: impl Into<String>,
        unit_price: f64,
        image: impl Into<String>,
        size: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            image: image.into(),
            size: size.into(),
            team: team.into(),
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// In-memory cart
#[derive(Debug, Clone, Default)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: i64, size: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.product_id == product_id && l.size == size)
    }

    /// Add an item: merge on `(product_id, size)`, else append.
    /// A non-positive quantity on the incoming item counts as 1.
    pub fn add_item(&mut self, item: CartLine) {
        let added = item.quantity.max(1);
        match self.position(item.product_id, &item.size) {
            Some(index) => self.lines[index].quantity += added,
            None => self.lines.push(CartLine {
                quantity: added,
                ..item
            }),
        }
    }

    /// Set a line's quantity; `new_quantity <= 0` removes the line
    pub fn update_quantity(&mut self, product_id: i64, size: &str, new_quantity: i64) {
        if let Some(index) = self.position(product_id, size) {
            if new_quantity <= 0 {
                self.lines.remove(index);
            } else {
                self.lines[index].quantity = new_quantity;
            }
        }
    }

    /// Drop a line if present; no-op otherwise
    pub fn remove_item(&mut self, product_id: i64, size: &str) {
        if let Some(index) = self.position(product_id, size) {
            self.lines.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of `unit_price × quantity` over all lines
    pub fn subtotal(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.unit_price * l.quantity as f64)
            .sum()
    }

    /// Flat fee, zero for an empty cart
    pub fn shipping(&self) -> f64 {
        if self.is_empty() { 0.0 } else { SHIPPING_FEE }
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.shipping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, size: &str) -> CartLine {
        CartLine::new(
            product_id,
            "Camisa Brasil I 2024",
            349.9,
            "https://cdn.example.com/front.jpg",
            size,
            "Brasil",
        )
    }

    #[test]
    fn same_key_merges_quantities() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M"));
        cart.add_item(line(1, "M"));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn different_size_is_a_distinct_line() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M"));
        cart.add_item(line(1, "G"));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn add_respects_explicit_quantity_and_defaults_to_one() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M").with_quantity(3));
        cart.add_item(line(1, "M"));
        assert_eq!(cart.lines()[0].quantity, 4);

        // Non-positive incoming quantity counts as 1
        cart.add_item(line(2, "P").with_quantity(0));
        assert_eq!(cart.lines()[1].quantity, 1);
    }

    #[test]
    fn update_quantity_zero_removes_the_line() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M"));
        cart.update_quantity(1, "M", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_sets_value() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M"));
        cart.update_quantity(1, "M", 5);
        assert_eq!(cart.lines()[0].quantity, 5);

        // Unknown key is a no-op
        cart.update_quantity(9, "M", 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn remove_item_is_noop_when_missing() {
        let mut cart = CartState::new();
        cart.add_item(line(1, "M"));
        cart.remove_item(1, "G");
        assert_eq!(cart.lines().len(), 1);
        cart.remove_item(1, "M");
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_and_shipping() {
        let mut cart = CartState::new();
        assert_eq!(cart.shipping(), 0.0);
        assert_eq!(cart.total(), 0.0);

        cart.add_item(line(1, "M").with_quantity(2));
        cart.add_item(
            CartLine::new(2, "Camisa Flamengo I", 100.0, "img", "G", "Flamengo").with_quantity(1),
        );

        assert_eq!(cart.total_items(), 3);
        let expected_subtotal = 349.9 * 2.0 + 100.0;
        assert!((cart.subtotal() - expected_subtotal).abs() < 1e-9);
        assert_eq!(cart.shipping(), SHIPPING_FEE);
        assert!((cart.total() - (expected_subtotal + SHIPPING_FEE)).abs() < 1e-9);
    }
}

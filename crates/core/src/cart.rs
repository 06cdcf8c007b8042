//! Cart aggregation.
//!
//! A cart only stores `(productId, quantity)` pairs. Prices come from a
//! side-fetched [`ProductLookup`] filled after the cart loads. Hydration is
//! best-effort: any item whose product could not be fetched is priced at zero
//! instead of failing the whole total, and is reported in
//! [`CartTotal::unpriced`] so callers can warn about an understated total.

use std::collections::HashMap;

use crate::models::{Cart, CartItem, Product};
use crate::types::{Price, ProductId};

/// Best-effort `productId → Product` map built while hydrating a cart.
///
/// An id that is absent (fetch failed or still pending) counts as unpriced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductLookup {
    products: HashMap<ProductId, Product>,
}

impl ProductLookup {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully fetched product under the id the cart used.
    pub fn insert(&mut self, product_id: ProductId, product: Product) {
        self.products.insert(product_id, product);
    }

    /// The product for `product_id`, if it was fetched.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Number of products that were fetched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether no product was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<(ProductId, Product)> for ProductLookup {
    fn from_iter<T: IntoIterator<Item = (ProductId, Product)>>(iter: T) -> Self {
        Self {
            products: iter.into_iter().collect(),
        }
    }
}

/// One priced cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotal<'a> {
    pub item: &'a CartItem,
    /// `None` when the product lookup failed.
    pub product: Option<&'a Product>,
    pub unit_price: Price,
    pub subtotal: Price,
}

impl LineTotal<'_> {
    /// Whether the line was priced from a fetched product.
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        self.product.is_some()
    }
}

/// Result of totalling a cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartTotal {
    /// Σ price × quantity, with unpriced items contributing zero.
    pub amount: Price,
    /// Items whose product lookup was missing, in cart order.
    pub unpriced: Vec<ProductId>,
}

impl CartTotal {
    /// Whether every item was priced, so `amount` is not understated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unpriced.is_empty()
    }
}

impl Cart {
    /// Price every line against `lookup`.
    pub fn lines<'a>(&'a self, lookup: &'a ProductLookup) -> impl Iterator<Item = LineTotal<'a>> {
        self.products.iter().map(move |item| {
            let product = lookup.get(&item.product_id);
            let unit_price = product.map_or(Price::ZERO, |p| p.price);
            LineTotal {
                item,
                product,
                unit_price,
                subtotal: unit_price.times(item.quantity),
            }
        })
    }

    /// Total the cart against `lookup`. Never fails.
    #[must_use]
    pub fn total(&self, lookup: &ProductLookup) -> CartTotal {
        let mut total = CartTotal::default();
        for line in self.lines(lookup) {
            total.amount = total.amount + line.subtotal;
            if !line.is_priced() {
                total.unpriced.push(line.item.product_id.clone());
            }
        }
        total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: Price) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            desc: String::new(),
            img: String::new(),
            price,
            stock: 10,
            categories: vec![],
            size: None,
            color: None,
            active: true,
        }
    }

    fn cart(items: &[(&str, u32)]) -> Cart {
        Cart {
            user_id: None,
            products: items
                .iter()
                .map(|(id, qty)| CartItem::new(*id, *qty))
                .collect(),
        }
    }

    #[test]
    fn test_single_item_total() {
        let cart = cart(&[("A", 2)]);
        let lookup: ProductLookup = [(ProductId::new("A"), product("A", Price::from(50u32)))]
            .into_iter()
            .collect();

        let total = cart.total(&lookup);
        assert_eq!(total.amount, Price::from(100u32));
        assert!(total.is_complete());
    }

    #[test]
    fn test_total_is_exact_sum_of_lines() {
        let cart = cart(&[("A", 3), ("B", 1), ("C", 7)]);
        let lookup: ProductLookup = [
            (ProductId::new("A"), product("A", Price::from_cents(1999))),
            (ProductId::new("B"), product("B", Price::from_cents(1))),
            (ProductId::new("C"), product("C", Price::from_cents(10))),
        ]
        .into_iter()
        .collect();

        // 59.97 + 0.01 + 0.70
        assert_eq!(cart.total(&lookup).amount, Price::from_cents(6068));
    }

    #[test]
    fn test_missing_lookup_contributes_zero() {
        let cart = cart(&[("A", 2), ("GONE", 5)]);
        let lookup: ProductLookup = [(ProductId::new("A"), product("A", Price::from(50u32)))]
            .into_iter()
            .collect();

        let total = cart.total(&lookup);
        assert_eq!(total.amount, Price::from(100u32));
        assert_eq!(total.unpriced, vec![ProductId::new("GONE")]);
        assert!(!total.is_complete());
    }

    #[test]
    fn test_empty_lookup_totals_zero() {
        let cart = cart(&[("A", 1), ("B", 1)]);
        let total = cart.total(&ProductLookup::new());
        assert_eq!(total.amount, Price::ZERO);
        assert_eq!(total.unpriced.len(), 2);
    }

    #[test]
    fn test_empty_cart() {
        let total = Cart::default().total(&ProductLookup::new());
        assert_eq!(total.amount, Price::ZERO);
        assert!(total.is_complete());
    }

    #[test]
    fn test_huge_price_times_quantity_does_not_panic() {
        let cart = cart(&[("A", 3), ("B", u32::MAX)]);
        let huge = Price::new(rust_decimal::Decimal::MAX);
        let lookup: ProductLookup = [
            (ProductId::new("A"), product("A", huge)),
            (ProductId::new("B"), product("B", Price::from_cents(70_000_000_000))),
        ]
        .into_iter()
        .collect();

        let total = cart.total(&lookup);
        assert_eq!(total.amount, huge);
        assert!(total.is_complete());
        assert_eq!(cart.unit_count(), u32::MAX);
    }

    #[test]
    fn test_line_subtotals() {
        let cart = cart(&[("A", 4)]);
        let lookup: ProductLookup = [(ProductId::new("A"), product("A", Price::from_cents(250)))]
            .into_iter()
            .collect();
        let line = cart.lines(&lookup).next().unwrap();
        assert_eq!(line.unit_price, Price::from_cents(250));
        assert_eq!(line.subtotal, Price::from(10u32));
        assert!(line.is_priced());
    }

    #[test]
    fn test_remove_and_set_quantity() {
        let mut cart = cart(&[("A", 1), ("B", 2)]);
        assert!(cart.set_quantity(&ProductId::new("B"), 5));
        assert_eq!(cart.unit_count(), 6);
        assert!(cart.remove(&ProductId::new("A")));
        assert!(!cart.remove(&ProductId::new("A")));
        assert_eq!(cart.products, vec![CartItem::new("B", 5)]);
    }
}

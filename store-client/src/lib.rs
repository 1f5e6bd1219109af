//! Store Client - client-side layer of the storefront
//!
//! What the browser holds in the original storefront lives here as plain,
//! testable state containers plus a typed HTTP client:
//!
//! - [`StoreClient`] - typed API client (catalog, auth, addresses, orders)
//! - [`CartState`] - cart lines keyed by (product, size) with pure reducers
//! - [`CheckoutWizard`] - linear cart → address → payment state machine
//! - [`promo_pricing`] - deterministic display-only discount transform

pub mod cart;
pub mod checkout;
pub mod client;
pub mod error;
pub mod pricing;

pub use cart::{CartLine, CartState, SHIPPING_FEE};
pub use checkout::{
    CheckoutConfirmation, CheckoutError, CheckoutStep, CheckoutWizard, NewAddressForm,
    PaymentMethod,
};
pub use client::{ProductQuery, StoreClient};
pub use error::ClientError;
pub use pricing::{PromoPricing, promo_pricing};

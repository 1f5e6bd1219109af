//! Checkout wizard state machine
//!
//! Strictly linear flow: `CartReview → Address → Payment`. Forward
//! transitions are gated; backward transitions are always permitted and
//! never clear previously entered data.
//!
//! Submission is a client-side confirmation only: this flow deliberately
//! does not persist an order on the server.

use crate::cart::CartState;
use crate::client::StoreClient;
use crate::error::ClientError;
use shared::models::{Address, AddressCreate};

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    CartReview,
    Address,
    Payment,
}

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Card,
}

/// Locally-filled new-address form (not yet persisted)
#[derive(Debug, Clone, Default)]
pub struct NewAddressForm {
    pub label: Option<String>,
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl NewAddressForm {
    /// The Address gate only requires a recipient name
    pub fn has_recipient(&self) -> bool {
        !self.recipient.trim().is_empty()
    }

    pub fn to_create_payload(&self) -> AddressCreate {
        AddressCreate {
            label: self.label.clone(),
            recipient: self.recipient.clone(),
            street: self.street.clone(),
            number: self.number.clone(),
            complement: self.complement.clone(),
            district: self.district.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
        }
    }
}

/// Why a transition or submission was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout requires an authenticated session")]
    NotAuthenticated,

    #[error("select an address or fill in a recipient first")]
    AddressRequired,

    #[error("already at the final step")]
    AtFinalStep,

    #[error("choose a payment method first")]
    PaymentMethodRequired,

    #[error("cannot submit before the payment step")]
    NotAtPaymentStep,

    #[error("the cart is empty")]
    EmptyCart,
}

/// Client-side completion notice. No order is persisted by the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfirmation {
    pub payment_method: PaymentMethod,
    pub total: f64,
}

/// Linear checkout wizard
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    addresses: Vec<Address>,
    selected_address: Option<i64>,
    pub new_address: NewAddressForm,
    payment_method: Option<PaymentMethod>,
}

impl CheckoutWizard {
    /// Start the wizard for an authenticated client
    ///
    /// `addresses` is the user's existing address book (may be empty).
    pub fn start(client: &StoreClient, addresses: Vec<Address>) -> Result<Self, CheckoutError> {
        if !client.is_authenticated() {
            return Err(CheckoutError::NotAuthenticated);
        }
        Ok(Self::with_addresses(addresses))
    }

    /// Construct directly (caller vouches for the authenticated session)
    pub fn with_addresses(addresses: Vec<Address>) -> Self {
        Self {
            step: CheckoutStep::CartReview,
            addresses,
            selected_address: None,
            new_address: NewAddressForm::default(),
            payment_method: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address?;
        self.addresses.iter().find(|a| a.id == id)
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Select an existing address by id; ignored if unknown
    pub fn select_address(&mut self, id: i64) -> bool {
        if self.addresses.iter().any(|a| a.id == id) {
            self.selected_address = Some(id);
            true
        } else {
            false
        }
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    /// Ingest an address created through the external collaborator:
    /// append it to the in-wizard list and auto-select it.
    pub fn address_created(&mut self, address: Address) {
        self.selected_address = Some(address.id);
        self.addresses.push(address);
    }

    /// Create the new-address form through the client, then ingest it
    pub async fn create_and_select_address(
        &mut self,
        client: &StoreClient,
    ) -> Result<Address, ClientError> {
        let created = client
            .create_address(&self.new_address.to_create_payload())
            .await?;
        self.address_created(created.clone());
        Ok(created)
    }

    /// Advance one step; gated per step
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.step = match self.step {
            CheckoutStep::CartReview => CheckoutStep::Address,
            CheckoutStep::Address => {
                if self.selected_address().is_none() && !self.new_address.has_recipient() {
                    return Err(CheckoutError::AddressRequired);
                }
                CheckoutStep::Payment
            }
            CheckoutStep::Payment => return Err(CheckoutError::AtFinalStep),
        };
        Ok(self.step)
    }

    /// Go back one step; always permitted, keeps entered data
    pub fn back(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::CartReview => CheckoutStep::CartReview,
            CheckoutStep::Address => CheckoutStep::CartReview,
            CheckoutStep::Payment => CheckoutStep::Address,
        };
        self.step
    }

    /// Terminal action from the payment step.
    ///
    /// Returns a client-side confirmation; intentionally does not place an
    /// order on the server.
    pub fn submit(&self, cart: &CartState) -> Result<CheckoutConfirmation, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::NotAtPaymentStep);
        }
        let payment_method = self
            .payment_method
            .ok_or(CheckoutError::PaymentMethodRequired)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(CheckoutConfirmation {
            payment_method,
            total: cart.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;

    fn address(id: i64) -> Address {
        Address {
            id,
            user_id: 1,
            label: Some("Casa".to_string()),
            recipient: "João Silva".to_string(),
            street: "Rua Exemplo".to_string(),
            number: "123".to_string(),
            complement: None,
            district: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip: "01234-567".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn cart_with_item() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(CartLine::new(1, "Camisa", 100.0, "img", "M", "Brasil"));
        cart
    }

    #[test]
    fn start_requires_authenticated_client() {
        let client = StoreClient::new("http://localhost:3000");
        assert_eq!(
            CheckoutWizard::start(&client, Vec::new()).err(),
            Some(CheckoutError::NotAuthenticated)
        );

        let mut client = StoreClient::new("http://localhost:3000");
        client.set_token("token");
        assert!(CheckoutWizard::start(&client, Vec::new()).is_ok());
    }

    #[test]
    fn cart_review_to_address_is_unconditional() {
        let mut wizard = CheckoutWizard::with_addresses(Vec::new());
        assert_eq!(wizard.next().unwrap(), CheckoutStep::Address);
    }

    #[test]
    fn address_gate_requires_selection_or_recipient() {
        let mut wizard = CheckoutWizard::with_addresses(Vec::new());
        wizard.next().unwrap();
        assert_eq!(wizard.next(), Err(CheckoutError::AddressRequired));

        // Filling in just a recipient opens the gate
        wizard.new_address.recipient = "Maria".to_string();
        assert_eq!(wizard.next().unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn address_gate_accepts_selected_existing_address() {
        let mut wizard = CheckoutWizard::with_addresses(vec![address(7)]);
        wizard.next().unwrap();
        assert!(wizard.select_address(7));
        assert!(!wizard.select_address(99));
        assert_eq!(wizard.next().unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn backward_transitions_keep_data() {
        let mut wizard = CheckoutWizard::with_addresses(vec![address(7)]);
        wizard.next().unwrap();
        wizard.select_address(7);
        wizard.next().unwrap();
        wizard.set_payment_method(PaymentMethod::Pix);

        assert_eq!(wizard.back(), CheckoutStep::Address);
        assert_eq!(wizard.back(), CheckoutStep::CartReview);
        // Going back from the first step stays put
        assert_eq!(wizard.back(), CheckoutStep::CartReview);

        // Nothing was cleared
        assert!(wizard.selected_address().is_some());
        assert_eq!(wizard.payment_method(), Some(PaymentMethod::Pix));
    }

    #[test]
    fn submit_requires_payment_step_method_and_items() {
        let mut wizard = CheckoutWizard::with_addresses(vec![address(7)]);
        let cart = cart_with_item();

        assert_eq!(wizard.submit(&cart), Err(CheckoutError::NotAtPaymentStep));

        wizard.next().unwrap();
        wizard.select_address(7);
        wizard.next().unwrap();

        assert_eq!(
            wizard.submit(&cart),
            Err(CheckoutError::PaymentMethodRequired)
        );

        wizard.set_payment_method(PaymentMethod::Card);
        assert_eq!(
            wizard.submit(&CartState::new()),
            Err(CheckoutError::EmptyCart)
        );

        let confirmation = wizard.submit(&cart).unwrap();
        assert_eq!(confirmation.payment_method, PaymentMethod::Card);
        assert!((confirmation.total - cart.total()).abs() < 1e-9);
    }

    #[test]
    fn created_address_is_appended_and_auto_selected() {
        let mut wizard = CheckoutWizard::with_addresses(vec![address(1)]);
        wizard.address_created(address(42));

        assert_eq!(wizard.addresses().len(), 2);
        assert_eq!(wizard.selected_address().map(|a| a.id), Some(42));
    }

    #[test]
    fn next_past_payment_is_refused() {
        let mut wizard = CheckoutWizard::with_addresses(vec![address(1)]);
        wizard.next().unwrap();
        wizard.select_address(1);
        wizard.next().unwrap();
        assert_eq!(wizard.next(), Err(CheckoutError::AtFinalStep));
    }
}

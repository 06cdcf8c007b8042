//! Admin product add/edit form.

use shopfront_core::{Price, PriceError, Product, ProductId, ProductInput};
use thiserror::Error;
use tracing::{info, instrument};

use crate::access::AdminAccess;
use crate::api::{ApiClient, ApiError};
use crate::screen::LoadState;
use crate::session::Session;

/// Category choices offered by the form.
pub const CATEGORIES: [&str; 6] = ["Electronics", "Clothing", "Books", "Home", "Sports", "Beauty"];

/// Size choices offered by the form.
pub const SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// Color choices offered by the form.
pub const COLORS: [&str; 8] = [
    "Red", "Blue", "Green", "Black", "White", "Yellow", "Purple", "Orange",
];

pub const PRODUCT_ADDED: &str = "Product added successfully!";
pub const PRODUCT_UPDATED: &str = "Product updated successfully!";

/// Errors from validating or submitting the product form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error("Unknown {field}: {value}")]
    UnknownOption { field: &'static str, value: String },

    /// The backend refused the product or could not be reached.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Raw form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub desc: String,
    pub img: String,
    pub price: String,
    pub stock: String,
    pub categories: Vec<String>,
    pub size: String,
    pub color: String,
}

impl ProductForm {
    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            desc: product.desc.clone(),
            img: product.img.clone(),
            price: product.price.to_string(),
            stock: product.stock_on_hand().to_string(),
            categories: product.categories.clone(),
            size: product.size.clone().unwrap_or_default(),
            color: product.color.clone().unwrap_or_default(),
        }
    }

    /// Set categories from a comma-separated string.
    pub fn set_categories(&mut self, raw: &str) {
        self.categories = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect();
    }

    /// Check required fields and convert to a request body.
    ///
    /// `stock` is read from its leading whole number (`"12abc"` is 12,
    /// `"7.5"` is 7); input with no leading digits becomes 0.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingRequired` when title, description, image
    /// or price is blank, `FormError::InvalidPrice` when the price does not
    /// parse, `FormError::NegativeStock` for a stock below zero, and
    /// `FormError::UnknownOption` for a size or color not on offer.
    pub fn validate(&self) -> Result<ProductInput, FormError> {
        let required = [&self.title, &self.desc, &self.img, &self.price];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(FormError::MissingRequired);
        }

        Ok(ProductInput {
            title: self.title.trim().to_string(),
            desc: self.desc.trim().to_string(),
            img: self.img.trim().to_string(),
            price: Price::parse(&self.price)?,
            stock: parse_stock(&self.stock)?,
            categories: self.categories.clone(),
            size: pick_option("size", &self.size, &SIZES)?,
            color: pick_option("color", &self.color, &COLORS)?,
        })
    }
}

/// Leading whole number of `input`, after an optional sign.
/// Values past `u32::MAX` saturate.
fn parse_stock(input: &str) -> Result<u32, FormError> {
    let input = input.trim();
    let (negative, rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest.get(..digits_end).unwrap_or_default();
    if digits.is_empty() {
        return Ok(0);
    }
    let stock = digits.parse::<u32>().unwrap_or(u32::MAX);
    if negative && stock > 0 {
        return Err(FormError::NegativeStock);
    }
    Ok(stock)
}

/// Match `value` against `choices` ignoring case; blank means unset.
fn pick_option(
    field: &'static str,
    value: &str,
    choices: &[&str],
) -> Result<Option<String>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(value))
        .map(|choice| Some((*choice).to_string()))
        .ok_or_else(|| FormError::UnknownOption {
            field,
            value: value.to_string(),
        })
}

/// Whether the editor creates a product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit(ProductId),
}

/// Admin product editor.
#[derive(Debug)]
pub struct ProductEditorScreen {
    client: ApiClient,
    mode: EditorMode,
    state: LoadState<()>,
    pub form: ProductForm,
}

impl ProductEditorScreen {
    /// An editor for `mode`. Requires admin access.
    #[must_use]
    pub fn new(
        client: &ApiClient,
        session: &Session,
        _access: AdminAccess,
        mode: EditorMode,
    ) -> Self {
        let state = match mode {
            EditorMode::Add => LoadState::Ready(()),
            EditorMode::Edit(_) => LoadState::Loading,
        };
        Self {
            client: session.client(client),
            mode,
            state,
            form: ProductForm::default(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState<()> {
        &self.state
    }

    /// Prefill the form when editing. A no-op when adding.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        let EditorMode::Edit(id) = &self.mode else {
            return;
        };
        self.state = LoadState::Loading;
        let result = self.client.get_product(id).await.map(|product| {
            self.form = ProductForm::from_product(&product);
        });
        self.state = LoadState::from_result(result, "Failed to load product");
    }

    /// Validate and save the form. Returns the success message.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending a request, or
    /// `FormError::Api` when the backend refuses.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&self) -> Result<&'static str, FormError> {
        let input = self.form.validate()?;

        match &self.mode {
            EditorMode::Add => {
                self.client
                    .add_product(&input)
                    .await
                    .map_err(|e| api_error(e, "Failed to add product"))?;
                info!(title = %input.title, "Product added");
                Ok(PRODUCT_ADDED)
            }
            EditorMode::Edit(id) => {
                self.client
                    .update_product(id, &input)
                    .await
                    .map_err(|e| api_error(e, "Failed to update product"))?;
                info!(product_id = %id, "Product updated");
                Ok(PRODUCT_UPDATED)
            }
        }
    }
}

fn api_error(source: ApiError, fallback: &str) -> FormError {
    FormError::Api {
        message: source.user_message(fallback),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            title: "Desk Lamp".to_string(),
            desc: "Warm light".to_string(),
            img: "https://img.example.com/lamp.png".to_string(),
            price: "24.50".to_string(),
            stock: "7".to_string(),
            categories: vec!["Home".to_string()],
            size: String::new(),
            color: "black".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let input = filled().validate().unwrap();
        assert_eq!(input.price, Price::from_cents(2450));
        assert_eq!(input.stock, 7);
        assert_eq!(input.size, None);
        assert_eq!(input.color.as_deref(), Some("Black"));
    }

    #[test]
    fn test_required_fields() {
        let clears: [fn(&mut ProductForm); 4] = [
            |f| f.title.clear(),
            |f| f.desc = "   ".to_string(),
            |f| f.img.clear(),
            |f| f.price.clear(),
        ];
        for clear in clears {
            let mut form = filled();
            clear(&mut form);
            let err = form.validate().unwrap_err();
            assert_eq!(err.to_string(), "Please fill in all required fields");
        }
    }

    #[test]
    fn test_stock_defaults_to_zero() {
        let mut form = filled();
        form.stock = String::new();
        assert_eq!(form.validate().unwrap().stock, 0);
        form.stock = "lots".to_string();
        assert_eq!(form.validate().unwrap().stock, 0);
    }

    #[test]
    fn test_stock_reads_leading_whole_number() {
        let cases = [("7.5", 7), ("12abc", 12), (" 42 ", 42), ("+3", 3), ("-0", 0)];
        for (raw, expected) in cases {
            let mut form = filled();
            form.stock = raw.to_string();
            assert_eq!(form.validate().unwrap().stock, expected, "stock {raw:?}");
        }

        let mut form = filled();
        form.stock = "99999999999".to_string();
        assert_eq!(form.validate().unwrap().stock, u32::MAX);
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let mut form = filled();
        form.stock = "-5".to_string();
        assert!(matches!(form.validate(), Err(FormError::NegativeStock)));
    }

    #[test]
    fn test_bad_price() {
        let mut form = filled();
        form.price = "cheap".to_string();
        assert!(matches!(form.validate(), Err(FormError::InvalidPrice(_))));
    }

    #[test]
    fn test_unknown_size() {
        let mut form = filled();
        form.size = "XXXL".to_string();
        assert!(matches!(
            form.validate(),
            Err(FormError::UnknownOption { field: "size", .. })
        ));
    }

    #[test]
    fn test_categories_from_comma_string() {
        let mut form = filled();
        form.set_categories("Books, Home,,  Sports ");
        assert_eq!(form.categories, vec!["Books", "Home", "Sports"]);
    }

    #[test]
    fn test_prefill_round_trip() {
        let product = Product {
            id: ProductId::new("p1"),
            title: "Desk Lamp".to_string(),
            desc: "Warm light".to_string(),
            img: "lamp.png".to_string(),
            price: Price::from_cents(2450),
            stock: 7,
            categories: vec!["Home".to_string()],
            size: Some("M".to_string()),
            color: None,
            active: true,
        };
        let input = ProductForm::from_product(&product).validate().unwrap();
        assert_eq!(input, ProductInput::from(&product));
    }
}

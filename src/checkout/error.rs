use thiserror::Error;

/// Checkout failure taxonomy
///
/// Every variant except `Database` is a business-rule failure detected
/// before any write (or under the row lock, for `InsufficientStock`),
/// and renders as a specific message to the buyer. `Database` covers
/// infrastructure faults and renders as a generic "try again".
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Sign in to place an order")]
    Unauthenticated,

    #[error("Select a payment method")]
    InvalidPayment,

    #[error("Cart data could not be read")]
    InvalidCart,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    InvalidAddress(String),

    #[error("Some products are no longer available")]
    ProductUnavailable,

    #[error("\"{product_name}\" — not enough stock (available: {available})")]
    InsufficientStock {
        product_name: String,
        available: i32,
    },
}

impl CheckoutError {
    /// True for failures the buyer can fix; false for infrastructure faults
    pub fn is_business(&self) -> bool {
        !matches!(self, CheckoutError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_names_product_and_count() {
        let err = CheckoutError::InsufficientStock {
            product_name: "Brake Pad Set".to_string(),
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "\"Brake Pad Set\" — not enough stock (available: 2)"
        );
    }

    #[test]
    fn test_database_errors_are_not_business() {
        let err = CheckoutError::Database(sqlx::Error::PoolTimedOut);
        assert!(!err.is_business());
        assert!(CheckoutError::EmptyCart.is_business());
    }
}

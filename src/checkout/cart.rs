//! Cart payload parsing
//!
//! The cart arrives as a JSON-encoded array the storefront serialized
//! from its local cart state. Only `productId` and `quantity` are read;
//! any price or name fields a tampered client embeds are ignored, prices
//! always come from the catalog.

use super::error::CheckoutError;
use serde::Deserialize;
use uuid::Uuid;

/// One product+quantity pairing from the cart payload
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Parse the cart JSON into an ordered, non-empty line list
///
/// Line order is preserved: validation and reservation both walk the
/// cart in the order the caller supplied it.
pub fn parse_cart_lines(cart_json: &str) -> Result<Vec<CartLine>, CheckoutError> {
    let lines: Vec<CartLine> =
        serde_json::from_str(cart_json).map_err(|_| CheckoutError::InvalidCart)?;

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    // Zero quantities and absurd ones (beyond any real warehouse) are
    // both payload corruption, not a stock problem.
    if lines.iter().any(|l| l.quantity == 0 || l.quantity > 1_000_000) {
        return Err(CheckoutError::InvalidCart);
    }

    Ok(lines)
}

/// Distinct product ids, first-occurrence order
pub fn distinct_product_ids(lines: &[CartLine]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(lines.len());
    for line in lines {
        if !ids.contains(&line.product_id) {
            ids.push(line.product_id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let json = format!(
            r#"[{{"productId":"{}","quantity":2}},{{"productId":"{}","quantity":1}}]"#,
            a, b
        );
        let lines = parse_cart_lines(&json).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, a);
        assert_eq!(lines[1].product_id, b);
    }

    #[test]
    fn test_client_price_fields_are_ignored() {
        let id = Uuid::new_v4();
        // tampered payload smuggling a price: parsing must not read it
        let json = format!(
            r#"[{{"productId":"{}","quantity":1,"unitPrice":"0.01","name":"fake"}}]"#,
            id
        );
        let lines = parse_cart_lines(&json).unwrap();
        assert_eq!(
            lines[0],
            CartLine {
                product_id: id,
                quantity: 1
            }
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(parse_cart_lines("[]"), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_cart_lines("{not json"),
            Err(CheckoutError::InvalidCart)
        ));
        assert!(matches!(
            parse_cart_lines(r#"{"productId":"x"}"#),
            Err(CheckoutError::InvalidCart)
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let json = format!(r#"[{{"productId":"{}","quantity":0}}]"#, Uuid::new_v4());
        assert!(matches!(
            parse_cart_lines(&json),
            Err(CheckoutError::InvalidCart)
        ));
    }

    #[test]
    fn test_distinct_ids_keep_first_occurrence_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lines = vec![
            CartLine {
                product_id: a,
                quantity: 1,
            },
            CartLine {
                product_id: b,
                quantity: 2,
            },
            CartLine {
                product_id: a,
                quantity: 3,
            },
        ];
        assert_eq!(distinct_product_ids(&lines), vec![a, b]);
    }
}

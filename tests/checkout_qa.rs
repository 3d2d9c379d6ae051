use dk_parts::checkout::service::build_order_lines;
use dk_parts::checkout::{CheckoutError, generate_order_number, parse_cart_lines};
use dk_parts::models::ProductStock;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Helper to build a ProductStock snapshot
fn product(name: &str, price: i64, quantity: i32, reserved_qty: i32) -> ProductStock {
    ProductStock {
        product_id: Uuid::new_v4(),
        sku: format!("SKU-{}", name.replace(' ', "-")),
        name: name.to_string(),
        price: Decimal::from(price),
        quantity,
        reserved_qty,
    }
}

fn cart_json(lines: &[(Uuid, u32)]) -> String {
    let items: Vec<serde_json::Value> = lines
        .iter()
        .map(|(id, qty)| serde_json::json!({"productId": id, "quantity": qty}))
        .collect();
    serde_json::to_string(&items).unwrap()
}

#[test]
fn qa_full_cart_prices_from_catalog_only() {
    // Setup: two products; the payload also smuggles client-side prices
    // which must never be read.
    let p1 = product("Oil Filter", 45_000, 10, 0);
    let p2 = product("Brake Pad Set", 120_000, 8, 2);

    let json = format!(
        r#"[{{"productId":"{}","quantity":2,"unitPrice":"0.01"}},
            {{"productId":"{}","quantity":1,"price":1}}]"#,
        p1.product_id, p2.product_id
    );

    let lines = parse_cart_lines(&json).expect("payload parses");
    let (order_lines, subtotal) =
        build_order_lines(&lines, &[p1, p2]).expect("both lines in stock");

    assert_eq!(order_lines[0].unit_price, Decimal::from(45_000));
    assert_eq!(order_lines[1].unit_price, Decimal::from(120_000));
    // subtotal = 2*45000 + 1*120000
    assert_eq!(subtotal, Decimal::from(210_000));
}

#[test]
fn qa_lines_checked_in_cart_order() {
    // Setup: line 1 short by a little, line 2 short by a lot.
    // The first line in cart order must be the one reported.
    let p1 = product("Air Filter", 50_000, 3, 2); // available 1
    let p2 = product("Timing Belt", 200_000, 0, 0); // available 0

    let json = cart_json(&[(p1.product_id, 2), (p2.product_id, 5)]);
    let lines = parse_cart_lines(&json).unwrap();

    match build_order_lines(&lines, &[p1, p2]).unwrap_err() {
        CheckoutError::InsufficientStock {
            product_name,
            available,
        } => {
            assert_eq!(product_name, "Air Filter");
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }
}

#[test]
fn qa_duplicate_lines_each_checked_independently() {
    // The same product twice: each line is validated against the same
    // snapshot, not cumulatively. 3 + 3 passes against available 4
    // at validation time; the cumulative effect lands at reservation,
    // where each increment happens under the row lock.
    let p = product("Spark Plug", 30_000, 4, 0);
    let json = cart_json(&[(p.product_id, 3), (p.product_id, 3)]);

    let lines = parse_cart_lines(&json).unwrap();
    let (order_lines, subtotal) = build_order_lines(&lines, &[p]).expect("per-line check passes");

    assert_eq!(order_lines.len(), 2);
    assert_eq!(subtotal, Decimal::from(180_000));
}

#[test]
fn qa_empty_and_malformed_carts() {
    assert!(matches!(parse_cart_lines("[]"), Err(CheckoutError::EmptyCart)));
    assert!(matches!(
        parse_cart_lines("not json at all"),
        Err(CheckoutError::InvalidCart)
    ));
    assert!(matches!(
        parse_cart_lines(r#"[{"quantity":1}]"#),
        Err(CheckoutError::InvalidCart)
    ));
}

#[test]
fn qa_order_number_shape() {
    // DK-YYYYMMDD-NNN, suffix zero-padded to 3 digits
    let n = generate_order_number();
    assert_eq!(n.len(), "DK-20260830-042".len());
    assert!(n.starts_with("DK-"));
    let suffix: u32 = n[n.len() - 3..].parse().expect("numeric suffix");
    assert!(suffix < 1000);
}

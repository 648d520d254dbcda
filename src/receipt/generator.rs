use chrono::Utc;
use fastrand::Rng;
use serde::Deserialize;
use uuid::Uuid;

use super::faker;
use super::model::{
    Address, Barcode, Card, Merchant, Receipt, ReceiptItem, Terminal, TransactionAmount,
};
use super::{ReceiptError, round2};

#[derive(Debug, Clone, Deserialize)]
pub struct ItemOverride {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Fields a caller may pin instead of having them generated.
///
/// Unknown keys are ignored so the same object can carry unrelated
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationOverrides {
    pub items: Option<Vec<ItemOverride>>,
    pub merchant_name: Option<String>,
    pub total_ttc: Option<f64>,
    pub tax_rate: Option<f64>,
    pub transaction_date_time: Option<String>,
}

impl GenerationOverrides {
    pub fn from_value(value: Option<serde_json::Value>) -> Result<Self, ReceiptError> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ReceiptError::InvalidOverrides(e.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub tax_rate: f64,
    pub num_items: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            tax_rate: 0.1,
            num_items: 3,
        }
    }
}

pub fn generate_receipt(
    overrides: &GenerationOverrides,
    options: GenerationOptions,
    rng: &mut Rng,
) -> Result<Receipt, ReceiptError> {
    let tax_rate = overrides.tax_rate.unwrap_or(options.tax_rate);
    if !tax_rate.is_finite() || tax_rate < 0.0 {
        return Err(ReceiptError::InvalidOverrides(
            "tax_rate must be a non-negative number".into(),
        ));
    }

    let (items, forced_ttc_cents) = if let Some(forced) = &overrides.items {
        (items_from_overrides(forced, tax_rate)?, None)
    } else if let Some(total_ttc) = overrides.total_ttc {
        if !total_ttc.is_finite() || total_ttc < 0.0 {
            return Err(ReceiptError::InvalidOverrides(
                "total_ttc must be a non-negative number".into(),
            ));
        }
        let ttc_cents = to_cents(total_ttc);
        let items = items_for_total(ttc_cents, tax_rate, options.num_items, rng);
        (items, Some(ttc_cents))
    } else {
        (random_items(options.num_items, tax_rate, rng), None)
    };

    let ht_total: f64 = items.iter().map(|item| item.line_total).sum();
    // A pinned total is kept exactly; the tax takes whatever the items leave.
    let (tax_amount, ttc) = match forced_ttc_cents {
        Some(ttc_cents) => (
            from_cents(ttc_cents - to_cents(ht_total)),
            from_cents(ttc_cents),
        ),
        None => {
            let tax_amount = round2(ht_total * tax_rate);
            (tax_amount, ht_total + tax_amount)
        }
    };

    let transaction_id: String = Uuid::new_v4().to_string().chars().take(12).collect();

    Ok(Receipt {
        transaction_id,
        authorization_code: faker::digits(rng, 6),
        transaction_date_time: overrides
            .transaction_date_time
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        status: "APPROVED".to_string(),
        transaction_amount: TransactionAmount {
            amount: format!("{ht_total:.2}"),
            currency: "EUR".to_string(),
            tax_rate: format!("{:.0}%", tax_rate * 100.0),
            tax_amount: format!("{tax_amount:.2}"),
            amount_tendered: format!("{ttc:.2}"),
        },
        receipt_number: format!("RCPT-{}", faker::digits(rng, 6)),
        merchant: Merchant {
            name: overrides
                .merchant_name
                .clone()
                .unwrap_or_else(|| faker::company(rng)),
            merchant_id: format!("M{}", faker::digits(rng, 9)),
            vat_id: format!("VAT FR{}", faker::digits(rng, 9)),
            registration_id: format!("CRN {}", faker::digits(rng, 8)),
            address: Address {
                line1: faker::street_address(rng),
                city: faker::city(rng),
                state: faker::department(rng),
                postal_code: faker::postcode(rng),
                country: "FR".to_string(),
            },
            phone: faker::phone_number(rng),
            website: faker::url(rng),
            logo_url: "https://dummyimage.com/400x100".to_string(),
            logo_alt_text: "Logo".to_string(),
            custom_footer_lines: vec!["Thank you for your visit!".to_string()],
        },
        terminal: Terminal {
            terminal_id: format!("T{}", faker::digits(rng, 9)),
            entry_mode: "CHIP".to_string(),
        },
        card: Card {
            card_number_masked: "************1234".to_string(),
            cardholder_name: faker::name(rng),
            payment_network: "VISA".to_string(),
            card_type: "DEBIT".to_string(),
        },
        items,
        barcode: Barcode {
            barcode_data: format!("TXN:{}", faker::digits(rng, 10)),
            barcode_type: "QR".to_string(),
        },
    })
}

fn items_from_overrides(
    forced: &[ItemOverride],
    tax_rate: f64,
) -> Result<Vec<ReceiptItem>, ReceiptError> {
    forced
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                return Err(ReceiptError::InvalidOverrides(format!(
                    "item {i} has a negative unit_price"
                )));
            }
            let line_total = round2(f64::from(item.quantity) * item.unit_price);
            Ok(ReceiptItem {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total,
                tax: Some(round2(line_total * tax_rate)),
            })
        })
        .collect()
}

fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Splits the pre-tax share of `ttc_cents` across single-unit lines priced
/// in whole cents. The line count drops below `num_items` when the share
/// cannot give every line a cent. The last line absorbs the remainder.
fn items_for_total(
    ttc_cents: i64,
    tax_rate: f64,
    num_items: usize,
    rng: &mut Rng,
) -> Vec<ReceiptItem> {
    let ht_cents = (ttc_cents as f64 / (1.0 + tax_rate)).round() as i64;
    let num_items = num_items
        .min(usize::try_from(ht_cents).unwrap_or(0))
        .max(1);
    let mut remaining = ht_cents;
    let mut items = Vec::with_capacity(num_items);

    for i in 0..num_items - 1 {
        let reserved = (num_items - i - 1) as i64;
        let price = rng.i64(1..=remaining - reserved);
        items.push(single_unit_item(
            faker::capitalize(&faker::word(rng)),
            from_cents(price),
        ));
        remaining -= price;
    }

    items.push(single_unit_item(
        faker::capitalize(&faker::word(rng)),
        from_cents(remaining),
    ));
    items
}

fn single_unit_item(description: String, price: f64) -> ReceiptItem {
    ReceiptItem {
        description,
        quantity: 1,
        unit_price: price,
        line_total: price,
        tax: None,
    }
}

fn random_items(num_items: usize, tax_rate: f64, rng: &mut Rng) -> Vec<ReceiptItem> {
    (0..num_items.max(1))
        .map(|_| {
            let quantity = rng.u32(1..=2);
            let unit_price = round2(1.0 + rng.f64() * 9.0);
            let line_total = round2(unit_price * f64::from(quantity));
            ReceiptItem {
                description: faker::capitalize(&faker::word(rng)),
                quantity,
                unit_price,
                line_total,
                tax: Some(round2(unit_price * f64::from(quantity) * tax_rate)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cents(value: f64) -> i64 {
        (value * 100.0).round() as i64
    }

    #[test]
    fn test_random_receipt_shape() {
        let mut rng = Rng::with_seed(1);
        let receipt = generate_receipt(
            &GenerationOverrides::default(),
            GenerationOptions::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(receipt.items.len(), 3);
        assert_eq!(receipt.transaction_id.len(), 12);
        assert_eq!(receipt.authorization_code.len(), 6);
        assert_eq!(receipt.status, "APPROVED");
        assert_eq!(receipt.transaction_amount.currency, "EUR");
        assert_eq!(receipt.transaction_amount.tax_rate, "10%");
        assert!(receipt.receipt_number.starts_with("RCPT-"));
        assert!(receipt.merchant.vat_id.starts_with("VAT FR"));
        assert_eq!(receipt.merchant.address.country, "FR");
        assert!(receipt.barcode.barcode_data.starts_with("TXN:"));

        for item in &receipt.items {
            assert!((1..=2).contains(&item.quantity));
            assert!(item.unit_price >= 1.0 && item.unit_price <= 10.0);
            assert_eq!(
                cents(item.line_total),
                cents(item.unit_price * f64::from(item.quantity))
            );
        }
    }

    #[test]
    fn test_totals_are_consistent() {
        let mut rng = Rng::with_seed(99);
        let receipt = generate_receipt(
            &GenerationOverrides::default(),
            GenerationOptions::default(),
            &mut rng,
        )
        .unwrap();

        let ht: f64 = receipt.items.iter().map(|i| i.line_total).sum();
        let amount: f64 = receipt.transaction_amount.amount.parse().unwrap();
        let tax: f64 = receipt.transaction_amount.tax_amount.parse().unwrap();
        let tendered: f64 = receipt.transaction_amount.amount_tendered.parse().unwrap();

        assert_eq!(cents(amount), cents(ht));
        assert_eq!(cents(tax), cents(ht * 0.1));
        assert_eq!(cents(tendered), cents(amount + tax));
    }

    #[test]
    fn test_zero_items_still_generates_one() {
        let mut rng = Rng::with_seed(5);
        let receipt = generate_receipt(
            &GenerationOverrides::default(),
            GenerationOptions {
                tax_rate: 0.1,
                num_items: 0,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(receipt.items.len(), 1);
    }

    #[test]
    fn test_forced_items() {
        let overrides = GenerationOverrides::from_value(Some(json!({
            "items": [
                {"description": "Coffee", "quantity": 2, "unit_price": 3.5},
                {"description": "Bread", "quantity": 1, "unit_price": 2.0}
            ],
            "merchant_name": "Café de Flore"
        })))
        .unwrap();

        let mut rng = Rng::with_seed(2);
        let receipt =
            generate_receipt(&overrides, GenerationOptions::default(), &mut rng).unwrap();

        assert_eq!(receipt.merchant.name, "Café de Flore");
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].line_total, 7.0);
        assert_eq!(receipt.items[0].tax, Some(0.7));
        assert_eq!(receipt.transaction_amount.amount, "9.00");
        assert_eq!(receipt.transaction_amount.tax_amount, "0.90");
        assert_eq!(receipt.transaction_amount.amount_tendered, "9.90");
    }

    #[test]
    fn test_forced_total_ttc() {
        let overrides = GenerationOverrides {
            total_ttc: Some(55.0),
            ..Default::default()
        };

        for seed in 0..20 {
            let mut rng = Rng::with_seed(seed);
            let receipt =
                generate_receipt(&overrides, GenerationOptions::default(), &mut rng).unwrap();

            assert_eq!(receipt.items.len(), 3);
            assert_eq!(receipt.transaction_amount.amount, "50.00");
            assert_eq!(receipt.transaction_amount.amount_tendered, "55.00");
            for item in &receipt.items {
                assert_eq!(item.quantity, 1);
                assert!(item.line_total >= 0.0);
            }
        }
    }

    #[test]
    fn test_forced_total_ttc_is_kept_to_the_cent() {
        for total in 1..=20_000i64 {
            let overrides = GenerationOverrides {
                total_ttc: Some(total as f64 / 100.0),
                ..Default::default()
            };
            let mut rng = Rng::with_seed(total as u64);
            let receipt =
                generate_receipt(&overrides, GenerationOptions::default(), &mut rng).unwrap();
            let amounts = &receipt.transaction_amount;

            assert_eq!(
                amounts.amount_tendered,
                format!("{:.2}", total as f64 / 100.0),
                "total_ttc {total} cents"
            );

            let ht: i64 = receipt.items.iter().map(|i| cents(i.line_total)).sum();
            let amount: f64 = amounts.amount.parse().unwrap();
            let tax: f64 = amounts.tax_amount.parse().unwrap();
            assert_eq!(cents(amount), ht);
            assert_eq!(cents(amount) + cents(tax), total);
            assert!(cents(tax) >= 0);
        }
    }

    #[test]
    fn test_tiny_forced_totals_have_no_negative_lines() {
        for (total, expected_items) in [(0.0, 1), (0.01, 1), (0.02, 2), (0.05, 3)] {
            let overrides = GenerationOverrides {
                total_ttc: Some(total),
                ..Default::default()
            };
            for seed in 0..10 {
                let mut rng = Rng::with_seed(seed);
                let receipt =
                    generate_receipt(&overrides, GenerationOptions::default(), &mut rng)
                        .unwrap();

                assert_eq!(receipt.items.len(), expected_items, "total_ttc {total}");
                for item in &receipt.items {
                    assert!(item.unit_price >= 0.0, "total_ttc {total}");
                    assert!(item.line_total >= 0.0, "total_ttc {total}");
                }
                assert_eq!(
                    receipt.transaction_amount.amount_tendered,
                    format!("{total:.2}")
                );
            }
        }
    }

    #[test]
    fn test_forced_tax_rate_and_date() {
        let overrides = GenerationOverrides {
            tax_rate: Some(0.2),
            transaction_date_time: Some("2024-01-15T14:30:00Z".into()),
            ..Default::default()
        };
        let mut rng = Rng::with_seed(8);
        let receipt =
            generate_receipt(&overrides, GenerationOptions::default(), &mut rng).unwrap();

        assert_eq!(receipt.transaction_amount.tax_rate, "20%");
        assert_eq!(receipt.transaction_date_time, "2024-01-15T14:30:00Z");
    }

    #[test]
    fn test_negative_total_rejected() {
        let overrides = GenerationOverrides {
            total_ttc: Some(-3.0),
            ..Default::default()
        };
        let mut rng = Rng::with_seed(0);
        assert!(generate_receipt(&overrides, GenerationOptions::default(), &mut rng).is_err());
    }

    #[test]
    fn test_malformed_overrides_rejected() {
        let result = GenerationOverrides::from_value(Some(json!({"items": [{"quantity": 1}]})));
        assert!(matches!(result, Err(ReceiptError::InvalidOverrides(_))));
    }

    #[test]
    fn test_unknown_override_keys_ignored() {
        let overrides =
            GenerationOverrides::from_value(Some(json!({"default_currency": "USD"}))).unwrap();
        assert!(overrides.items.is_none());
    }
}

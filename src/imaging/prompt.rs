use std::fmt::Write;

use serde_json::Value;

use crate::receipt::Receipt;

/// Builds the image prompt for a receipt in the given visual style.
///
/// The style's `description` leads the prompt; every other top-level style
/// key is listed as a rendering directive in file order.
pub fn render_prompt(receipt: &Receipt, style: &Value) -> String {
    let mut prompt = String::from(
        "A realistic photograph of a printed thermal paper card payment receipt.\n",
    );

    if let Some(description) = style.get("description").and_then(Value::as_str) {
        let _ = writeln!(prompt, "Scene: {description}");
    }

    if let Some(directives) = style.as_object() {
        let directives: Vec<_> = directives
            .iter()
            .filter(|(key, _)| key.as_str() != "description")
            .collect();
        if !directives.is_empty() {
            prompt.push_str("Visual style:\n");
            for (key, value) in directives {
                let _ = writeln!(prompt, "- {}: {}", key.replace('_', " "), directive(value));
            }
        }
    }

    let merchant = &receipt.merchant;
    let amounts = &receipt.transaction_amount;

    prompt.push_str("\nThe receipt must legibly show, top to bottom:\n");
    let _ = writeln!(prompt, "{}", merchant.name);
    let _ = writeln!(
        prompt,
        "{}, {} {}",
        merchant.address.line1, merchant.address.postal_code, merchant.address.city
    );
    let _ = writeln!(prompt, "Tel: {}", merchant.phone);
    let _ = writeln!(prompt, "{}", merchant.vat_id);
    let _ = writeln!(prompt, "Date: {}", receipt.transaction_date_time);
    let _ = writeln!(prompt, "Receipt: {}", receipt.receipt_number);

    for item in &receipt.items {
        let _ = writeln!(
            prompt,
            "{} x {} @ {:.2} = {:.2} {}",
            item.quantity, item.description, item.unit_price, item.line_total, amounts.currency
        );
    }

    let _ = writeln!(prompt, "Subtotal: {} {}", amounts.amount, amounts.currency);
    let _ = writeln!(
        prompt,
        "VAT {}: {} {}",
        amounts.tax_rate, amounts.tax_amount, amounts.currency
    );
    let _ = writeln!(
        prompt,
        "TOTAL: {} {}",
        amounts.amount_tendered, amounts.currency
    );
    let _ = writeln!(
        prompt,
        "{} {} {} AUTH {}",
        receipt.card.payment_network,
        receipt.card.card_type,
        receipt.card.card_number_masked,
        receipt.authorization_code
    );
    let _ = writeln!(
        prompt,
        "{} code: {}",
        receipt.barcode.barcode_type, receipt.barcode.barcode_data
    );
    for line in &merchant.custom_footer_lines {
        let _ = writeln!(prompt, "{line}");
    }

    prompt
}

fn directive(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{} {}", k.replace('_', " "), directive(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(values) => values.iter().map(directive).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

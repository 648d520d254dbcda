use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAmount {
    pub amount: String,
    pub currency: String,
    pub tax_rate: String,
    pub tax_amount: String,
    pub amount_tendered: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub name: String,
    pub merchant_id: String,
    pub vat_id: String,
    pub registration_id: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub logo_url: String,
    pub logo_alt_text: String,
    pub custom_footer_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub terminal_id: String,
    pub entry_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub card_number_masked: String,
    pub cardholder_name: String,
    pub payment_network: String,
    pub card_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub barcode_data: String,
    pub barcode_type: String,
}

/// A card payment receipt as produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub authorization_code: String,
    pub transaction_date_time: String,
    pub status: String,
    pub transaction_amount: TransactionAmount,
    pub receipt_number: String,
    pub merchant: Merchant,
    pub terminal: Terminal,
    pub card: Card,
    pub items: Vec<ReceiptItem>,
    pub barcode: Barcode,
}

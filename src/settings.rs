use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "KWD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub arabic_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    #[serde(default = "default_next_invoice_number")]
    pub next_invoice_number: i64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

fn default_next_invoice_number() -> i64 {
    1
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            name: "JAMAL AL-SHUWAIKH".to_string(),
            subtitle: "MEN TAILOR & TEXTILE".to_string(),
            arabic_name: "جمال الشويخ للرجال وفنستها".to_string(),
            phone: "97686004".to_string(),
            address: "Kuwait – Comm. Area No. 9 – Mariam Comp – Basement – Shop No. 8".to_string(),
            currency: default_currency(),
            invoice_prefix: default_invoice_prefix(),
            next_invoice_number: default_next_invoice_number(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub arabic_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub currency: Option<String>,
    pub invoice_prefix: Option<String>,
    pub next_invoice_number: Option<i64>,
}

impl ShopSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.subtitle {
            self.subtitle = v;
        }
        if let Some(v) = patch.arabic_name {
            self.arabic_name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        if let Some(v) = patch.currency {
            let v = v.trim();
            self.currency = if v.is_empty() { default_currency() } else { v.to_string() };
        }
        if let Some(v) = patch.invoice_prefix {
            self.invoice_prefix = v.trim().to_string();
        }
        if let Some(v) = patch.next_invoice_number {
            self.next_invoice_number = v.max(1);
        }
    }
}

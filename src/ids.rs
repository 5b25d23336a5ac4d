use uuid::Uuid;

/// Opaque record identifier. Random v4 UUIDs are unique for the lifetime of any
/// realistic store without coordination.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn format_invoice_number(prefix: &str, next: i64) -> String {
    format!("{}-{:0>4}", prefix, next)
}

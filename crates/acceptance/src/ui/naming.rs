//! Element-id convention shared by every page the harness drives.

/// Container the search button fills with result rows.
pub const SEARCH_RESULTS_ID: &str = "search_results";

/// Area that shows the outcome of the last action.
pub const FLASH_MESSAGE_ID: &str = "flash_message";

/// `"Name"` → `product_name`.
pub fn field_element_id(field: &str) -> String {
    format!("product_{}", field.to_lowercase())
}

/// `"Clear"` → `clear-btn`, `"Add Item"` → `add-item-btn`.
pub fn button_element_id(label: &str) -> String {
    format!("{}-btn", label.to_lowercase().replace(' ', "-"))
}

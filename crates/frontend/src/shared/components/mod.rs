pub mod column_picker;
pub mod contact_input;
pub mod filter_panel;
pub mod form_field;
pub mod list_status;
pub mod pagination_controls;

pub mod admin_key;

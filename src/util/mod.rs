pub mod date;
pub mod path;
pub mod slug;
pub mod toml_date;

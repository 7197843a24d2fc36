pub mod config;
pub mod content;
pub mod css;
pub mod logger;
pub mod manifest;
pub mod project;
pub mod render;
pub mod site_builder;
pub mod sitemap;
pub mod util;
mod test_data;

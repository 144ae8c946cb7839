#[path = "helpers/mod.rs"]
mod helpers;

#[path = "import/mod.rs"]
mod import;

#[path = "driver/mod.rs"]
mod driver;

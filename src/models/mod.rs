pub mod advertisement;
pub mod site_settings;
pub mod welcome_message;

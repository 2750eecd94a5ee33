pub mod criteria;
pub mod record;
pub mod view_config;
pub mod view_model;

pub mod config;
pub mod events;
pub mod model;
pub mod tasks {
    pub mod carousel;
    pub mod display;
    pub mod fetch;
}

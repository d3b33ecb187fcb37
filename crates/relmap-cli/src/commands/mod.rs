pub mod demo;
pub mod inspect;
pub mod schema;

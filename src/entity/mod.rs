pub mod enums;
pub mod products;
pub mod users;

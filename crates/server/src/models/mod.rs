//! Domain models and API payloads.

pub mod category;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use category::Category;
pub use order::{CartSnapshot, Order, OrderDetail, OrderItem, OrderItemDetail};
pub use product::Product;
pub use user::User;

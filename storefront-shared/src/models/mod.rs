/// Entity models
///
/// Plain data types for the three stored entities plus the input shapes the
/// repositories accept. Storage access lives in [`crate::repository`].
///
/// # Models
///
/// - `user`: User accounts
/// - `product`: Catalog products
/// - `order`: Orders and their line items
/// - `pagination`: Page/offset arithmetic shared by list operations

pub mod order;
pub mod pagination;
pub mod product;
pub mod user;

pub use order::{NewOrder, MAX_ORDER_TOTAL, NewOrderItem, Order, OrderItem, OrderStatus};
pub use pagination::Pagination;
pub use product::{NewProduct, MAX_UNIT_PRICE, Product, ProductChanges};
pub use user::{NewUser, User, UserChanges};

mod category;
mod order;
mod product;
mod user;

pub use category::{Category, CategoryRef, NewCategory, UpdateCategory};
pub use order::{Order, OrderItem, OrderStatus, line_total};
pub use product::{NewProduct, NewProductCategory, Product, UpdateProduct};
pub use user::{NewUser, UpdateUser, User};

//! Page objects for the storefront's routes.

mod cart_page;
mod landing;
mod login;
mod sports;

pub use cart_page::{CartPage, CartRow};
pub use landing::LandingPage;
pub use login::LoginPage;
pub use sports::SportsPage;

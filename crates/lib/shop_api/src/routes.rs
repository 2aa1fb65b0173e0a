//! Route paths.

pub const LOGIN: &str = "/login";
pub const REGISTRATION: &str = "/registration";
pub const PROFILE: &str = "/profile";

pub const PRODUCTS: &str = "/products";
pub const PRODUCT_ID: &str = "/products/{id}";

pub const CART: &str = "/cart";
pub const CART_SLASH: &str = "/cart/";
pub const CART_ADD: &str = "/cart/add";
pub const CART_REMOVE: &str = "/cart/remove";
pub const CART_CLEAR: &str = "/cart/clear";

pub const ORDERS: &str = "/orders";
pub const ORDERS_SLASH: &str = "/orders/";
pub const ORDERS_ALL: &str = "/orders/getall";
pub const ORDERS_UPDATE: &str = "/orders/update";
pub const ORDER_ID: &str = "/orders/{id}";

pub mod protected_route;
pub mod user_nav;

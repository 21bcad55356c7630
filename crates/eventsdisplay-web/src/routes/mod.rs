mod health;
mod listing;
mod suggest;

pub use health::health_routes;
pub use listing::listing_routes;
pub use suggest::suggest_routes;

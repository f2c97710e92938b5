pub mod password;
pub mod policy;
pub mod token;

pub use policy::{authorize, Action};
pub use token::{Claims, TokenService};

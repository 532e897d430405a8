pub mod claims;
pub mod role;
pub mod ticket;
pub mod user;

pub use claims::Claims;
pub use role::Role;
pub use ticket::Ticket;
pub use user::{PublicUser, User};

pub mod ticket;
pub mod transport;

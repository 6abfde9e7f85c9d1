pub mod constants;
pub mod pdu;
pub mod q922;
pub mod utils;

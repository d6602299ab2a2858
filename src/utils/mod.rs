pub mod hex_code;

pub use hex_code::{decode, encode, CodeError};

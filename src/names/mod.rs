//! Name registration state
//!
//! Name records and the height-based expiration arithmetic governing
//! their lifetime.

pub mod expiry;
pub mod record;

pub use expiry::{
    expiration_depth, is_name_expired, MAX_NAME_LENGTH, MAX_NAME_VALUE_LENGTH,
    MAX_NAME_VALUE_LENGTH_UI, MEMPOOL_HEIGHT, MIN_FIRST_UPDATE_DEPTH, NAME_LOCKED_AMOUNT,
};
pub use record::{NameInfo, MAX_ADDR_LENGTH};

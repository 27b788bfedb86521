mod account;
mod balance;
mod exchange_info;
mod fill;
mod intent;
mod market;
mod order;
mod payload;
mod position;
mod ticker;
mod user_stream;

pub use account::*;
pub use balance::*;
pub use exchange_info::*;
pub use fill::*;
pub use intent::*;
pub use market::*;
pub use order::*;
pub use payload::*;
pub use position::*;
pub use ticker::*;
pub use user_stream::*;

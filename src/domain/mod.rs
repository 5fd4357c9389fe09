pub mod account;
pub mod balance;
pub mod call;
pub mod cores;
pub mod ledger;
pub mod state;

pub use account::*;
pub use balance::*;
pub use call::*;
pub use cores::*;
pub use ledger::*;
pub use state::*;

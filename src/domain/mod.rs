mod ledger;
mod money;
mod operation;
mod wallet;

pub use ledger::*;
pub use money::*;
pub use operation::*;
pub use wallet::*;

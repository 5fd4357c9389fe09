pub mod simulated;
mod traits;

pub use simulated::{SimulatedChain, SimulatedOutcome, SimulatedWallet};
pub use traits::{ChainClient, PaymentInfo, Signer, TxStatusStream, WalletExtension};

#[cfg(test)]
pub use traits::{MockChainClient, MockWalletExtension};

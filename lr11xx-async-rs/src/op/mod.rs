//! Command parameters and response types of the LR11xx command set.

pub mod airtime;
pub mod err;
pub mod init;
pub mod irq;
pub mod modulation;
pub mod packet;
pub mod rxtx;
pub mod status;
pub mod tcxo;

pub use airtime::*;
pub use err::*;
pub use init::*;
pub use irq::*;
pub use modulation::*;
pub use packet::*;
pub use rxtx::*;
pub use status::*;
pub use tcxo::*;

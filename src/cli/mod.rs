pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod modes;

pub use decrypt::*;
pub use encrypt::*;
pub use keygen::*;
pub use modes::*;

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    Field, Interest, InterestPatch, NewInterest, NewSwap, Swap, SwapPatch, ValidationError,
    INTEREST_FIELDS,
};
pub use ports::{Clock, PortError, PortResult, SwapStore, SystemClock};
pub use service::{SwapBoard, DEFAULT_MUTATION_ATTEMPTS};

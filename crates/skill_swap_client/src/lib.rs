pub mod api;
pub mod model;
pub mod session;
pub mod sync;

pub use api::{ClientError, ClientResult, HttpSwapApi, SwapApi};
pub use model::{ErrorBody, InterestDocument, InterestFields, SwapDocument, SwapFields};
pub use session::SessionContext;
pub use sync::BoardView;

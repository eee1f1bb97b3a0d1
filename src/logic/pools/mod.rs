pub mod constant_product;
pub mod dex;
pub mod mock_dex;
pub mod pool;

pub use constant_product::ConstantProductDex;
pub use dex::{CurveKind, Dex, QuoteError};
pub use mock_dex::MockDex;
pub use pool::{Pool, PoolError, PoolId, TokenId};

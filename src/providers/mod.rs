pub mod privatbank;
pub mod util;

pub use privatbank::PrivatBankProvider;
pub use util::RetryPolicy;

pub mod reward;
pub mod source;
pub mod tensor;

pub use reward::{MeanStd, RewardKind, RewardTriple};
pub use source::{RewardQuery, RewardSource, SourceError};
pub use tensor::RewardTensor;

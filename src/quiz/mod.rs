pub mod question;
pub mod randomizer;
pub mod scorer;
pub mod session;

pub use question::*;
pub use randomizer::{present, present_all, PresentedQuestion};
pub use scorer::{score, QuestionResult, Selection};
pub use session::{TestReport, TestSession};

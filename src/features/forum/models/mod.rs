pub mod answer;
pub mod question;

pub use answer::Answer;
pub use question::Question;

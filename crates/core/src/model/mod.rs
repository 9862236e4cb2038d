mod game_result;
mod movie;
mod question;
mod statistics;

pub use game_result::{GameResult, GameResultError};
pub use movie::{Movie, RatingError};
pub use question::{ImagePayload, Question};
pub use statistics::AggregateStatistics;

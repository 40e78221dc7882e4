pub mod compose;
pub mod dispatcher;
pub mod validator;

pub use crate::domain::model::{
    AccessToken, DeliveryReceipt, NormalizedSubmission, OutboundMessage, Submission,
};
pub use crate::domain::ports::{MailTransport, TokenProvider};
pub use crate::utils::error::Result;

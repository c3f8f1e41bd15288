//! Endpoint catalog.
//!
//! Every method here is pure parameter marshaling: validate required
//! arguments, shape the payload for the documented endpoint, delegate to the
//! matching verb on [`ApiClient`](crate::ApiClient), and return the decoded
//! JSON unchanged. All state and retry behavior lives in the dispatcher.

mod address_books;
mod balance;
mod blacklist;
mod campaigns;
mod emails;
mod events;
mod push;
mod senders;
mod sms;
mod smtp;

pub use address_books::Subscriber;
pub use campaigns::CreateCampaign;
pub use push::PushTask;
pub use smtp::{EmailAddress, SmtpEmail};

pub mod geocoder;
pub mod mailer;

pub use geocoder::{GeocodeError, Geocoder, HttpGeocoder};
pub use mailer::{LogMailer, MailError, Mailer};

pub mod claims;
pub mod device_code;
pub mod session;

pub use device_code::{DeviceCodeAuthenticator, DeviceCodeResponse, INCIDENT_READ_SCOPE};
pub use session::Session;

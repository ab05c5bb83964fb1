/// Session state module
///
/// This module holds everything the display layer drives:
/// - Processing parameters and their JSON form (params.rs)
/// - The select / apply / save session (session.rs)
/// - Status messages reported back to the user (status.rs)

pub mod params;
pub mod session;
pub mod status;

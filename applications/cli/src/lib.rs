/// Lull command-line front end
///
/// Decodes audio with Symphonia, runs the calmness analysis, renders reports
/// and drives the masking controller offline.
pub mod config;
pub mod decode;
pub mod error;
pub mod report;
pub mod simulate;

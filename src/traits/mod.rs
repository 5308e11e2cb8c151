pub mod client;
pub mod output;
pub mod user_input;

pub use client::{DeployClient, DeployRequest, HttpDeployClient};
pub use output::{Output, TerminalOutput};
pub use user_input::{InquireUserInput, UserInput};

#[cfg(test)]
pub use client::MockDeployClient;
#[cfg(test)]
pub use output::MockOutput;
#[cfg(test)]
pub use user_input::{MockResponse, MockUserInput};

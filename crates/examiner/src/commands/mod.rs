mod assign;
mod bank;
mod exams;
mod profile;
mod rearrange;
mod students;
mod token;

use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::de::DeserializeOwned;

use crate::cli::Cmd;
use crate::runtime::Runtime;

pub async fn run(cmd: Cmd, rt: &Runtime) -> Result<()> {
    match cmd {
        Cmd::Token { action } => token::run(action, rt),
        Cmd::Questions { action } => bank::run(action, rt).await,
        Cmd::Tests { action } => exams::run(action, rt).await,
        Cmd::Students { action } => students::run(action, rt).await,
        Cmd::Assign { test, students } => assign::run(test, students, rt).await,
        Cmd::Profile { action } => profile::run(action, rt).await,
        Cmd::Rearrange { action } => rearrange::run(action, rt),
    }
}

/// Read and decode a JSON payload file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("{} is not a valid payload", path.display()))
}

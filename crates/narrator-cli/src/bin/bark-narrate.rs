//! Expressive narration with Bark.

use narrator_cli::{main_with, BarkCli};
use std::process::ExitCode;

fn main() -> ExitCode {
    main_with::<BarkCli>()
}
